mod common;

use common::{slack_body, StubServer};
use hawkshot::client::{AssessmentClient, HttpTransport};
use hawkshot::model::RiskLevel;
use hawkshot::output::{format_assessment, strip_ansi, OutputFormat};
use hawkshot::{normalize, ApiError, Config};
use serde_json::json;
use std::sync::Arc;

fn client_for(server: &StubServer) -> AssessmentClient {
    let config = Config {
        endpoint: server.url("/webhook/assess"),
        compare_endpoint: server.url("/webhook/compare"),
        ..Config::default()
    };
    AssessmentClient::from_config(&config)
}

#[tokio::test]
async fn test_assess_over_http() {
    let server = StubServer::start(vec![("/webhook/assess", 200, slack_body().to_string())]).await;

    let assessment = client_for(&server).assess("Slack").await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/webhook/assess");
    assert_eq!(requests[0].body, json!({ "query": "Slack" }));
    assert_eq!(
        requests[0].headers.get("content-type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(assessment.data.app_name, "Slack");

    let display = normalize(&assessment.raw, &assessment.data);
    assert_eq!(display.risk_level(), RiskLevel::Lower);
    assert_eq!(display.risk_label, "Lower Risk");
    assert_eq!(display.dial_value(), 82);
    assert!(display.low_evidence());

    let text = strip_ansi(&format_assessment(&assessment, OutputFormat::Table).unwrap());
    assert!(text.contains("Trust Score: 82 / 100"));
    assert!(text.contains("Low Evidence Coverage"));
}

#[tokio::test]
async fn test_empty_body_is_not_found() {
    let server = StubServer::start(vec![("/webhook/assess", 200, String::new())]).await;

    let err = client_for(&server).assess("Slakc").await.unwrap_err();

    assert_eq!(err, ApiError::NotFound { status: 200 });
    assert_eq!(
        err.user_message(),
        "Failed to find service with this name. Please try rephrasing your query or check the spelling."
    );
}

#[tokio::test]
async fn test_error_status_uses_server_message() {
    let server = StubServer::start(vec![(
        "/webhook/assess",
        500,
        json!({ "message": "Workflow could not be started" }).to_string(),
    )])
    .await;

    let err = client_for(&server).assess("Slack").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), "Workflow could not be started");
}

#[tokio::test]
async fn test_error_status_without_message() {
    let server = StubServer::start(vec![("/webhook/assess", 503, "gateway down".to_string())]).await;

    let err = client_for(&server).assess("Slack").await.unwrap_err();

    assert_eq!(err.user_message(), "API request failed with status 503");
}

#[tokio::test]
async fn test_blank_query_sends_nothing() {
    let server = StubServer::start(vec![]).await;

    let err = client_for(&server).assess("   ").await.unwrap_err();

    assert_eq!(err, ApiError::EmptyQuery);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Bind and drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = AssessmentClient::new(
        Arc::new(HttpTransport::new()),
        format!("http://{}/webhook/assess", addr),
        format!("http://{}/webhook/compare", addr),
    );

    let err = client.assess("Slack").await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.user_message(), "Failed to assess product. Please try again.");
    assert!(err.detail().is_some());
}
