//! Client for the remote assessment service.
//!
//! One POST per user action, no retries, no timeout, no cancellation. The
//! HTTP layer sits behind [`AssessmentTransport`] so response interpretation
//! can be exercised without a network.
//!
//! # Example
//!
//! ```no_run
//! use hawkshot::client::AssessmentClient;
//! use hawkshot::Config;
//!
//! # async fn run() -> Result<(), hawkshot::ApiError> {
//! let client = AssessmentClient::from_config(&Config::default());
//! let assessment = client.assess("Slack").await?;
//! println!("{} scored {}", assessment.data.app_name, assessment.data.trust_score);
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::model::Assessment;

/// Keys under which a category listing may wrap its array.
const LIST_KEYS: &[&str] = &["tools", "results", "items", "data"];

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait AssessmentTransport: Send + Sync {
    /// Sends `body` as JSON to `url`. Only transport failures are errors;
    /// any HTTP status comes back as a [`RawResponse`].
    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, ApiError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Require the success body to be a JSON object.
    pub strict: bool,
}

#[derive(Clone)]
pub struct AssessmentClient {
    transport: Arc<dyn AssessmentTransport>,
    endpoint: String,
    compare_endpoint: String,
    options: ClientOptions,
}

impl AssessmentClient {
    pub fn new(
        transport: Arc<dyn AssessmentTransport>,
        endpoint: impl Into<String>,
        compare_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            compare_endpoint: compare_endpoint.into(),
            options: ClientOptions::default(),
        }
    }

    /// Builds a reqwest-backed client from the resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(HttpTransport::new()),
            config.endpoint.clone(),
            config.compare_endpoint.clone(),
        )
        .with_options(ClientOptions {
            strict: config.strict,
        })
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Assesses a product by name, domain or URL.
    ///
    /// # Errors
    ///
    /// - [`ApiError::EmptyQuery`] for blank input; nothing is sent.
    /// - [`ApiError::Transport`] when the request never completes.
    /// - [`ApiError::Status`] for non-2xx responses.
    /// - [`ApiError::NotFound`] for an empty or unparsable success body.
    pub async fn assess(&self, query: &str) -> Result<Assessment, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::EmptyQuery);
        }

        debug!(endpoint = %self.endpoint, query, "sending assessment request");
        let response = self
            .transport
            .post_json(&self.endpoint, &json!({ "query": query }))
            .await
            .inspect_err(|e| {
                warn!(
                    query,
                    error = %e,
                    detail = e.detail().unwrap_or_default(),
                    "assessment request failed"
                )
            })?;

        let raw = interpret(response, self.options)
            .inspect_err(|e| warn!(query, error = %e, "assessment response rejected"))?;

        debug!(query, "assessment response accepted");
        Ok(Assessment::from_raw(raw))
    }

    /// Lists previously assessed tools for a category.
    ///
    /// The service may answer with a bare array or with an object wrapping
    /// it under `tools`, `results`, `items` or `data`.
    pub async fn list_category(&self, category: &str) -> Result<Vec<Value>, ApiError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ApiError::EmptyQuery);
        }

        debug!(endpoint = %self.compare_endpoint, category, "requesting category listing");
        let response = self
            .transport
            .post_json(&self.compare_endpoint, &json!({ "category": category }))
            .await?;
        let status = response.status;
        let value = interpret(response, ClientOptions::default())?;

        let items = extract_list(value).ok_or(ApiError::NotFound { status })?;
        debug!(category, count = items.len(), "category listing received");
        Ok(items)
    }
}

/// Turns a completed exchange into a JSON value or the matching error.
pub fn interpret(response: RawResponse, options: ClientOptions) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(ApiError::from_status(response.status, &response.body));
    }

    if response.body.trim().is_empty() {
        return Err(ApiError::NotFound {
            status: response.status,
        });
    }

    let value: Value = serde_json::from_str(&response.body).map_err(|_| ApiError::NotFound {
        status: response.status,
    })?;

    if options.strict && !value.is_object() {
        return Err(ApiError::NotFound {
            status: response.status,
        });
    }

    Ok(value)
}

fn extract_list(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => LIST_KEYS.iter().find_map(|key| match map.remove(*key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NOT_FOUND_MESSAGE;
    use std::sync::Mutex;

    /// Replays canned responses and records every request.
    struct FakeTransport {
        response: Result<RawResponse, ApiError>,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl FakeTransport {
        fn new(response: Result<RawResponse, ApiError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AssessmentTransport for FakeTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, ApiError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), body.clone()));
            self.response.clone()
        }
    }

    fn client(transport: Arc<FakeTransport>) -> AssessmentClient {
        AssessmentClient::new(transport, "https://api.test/assess", "https://api.test/compare")
    }

    #[tokio::test]
    async fn test_assess_sends_trimmed_query() {
        let transport = FakeTransport::new(Ok(RawResponse::new(200, r#"{"trust_score":82}"#)));
        let result = client(transport.clone()).assess("  Slack ").await.unwrap();

        assert_eq!(result.data.trust_score, 82.0);
        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "https://api.test/assess");
        assert_eq!(requests[0].1, json!({ "query": "Slack" }));
    }

    #[tokio::test]
    async fn test_assess_blank_query_sends_nothing() {
        let transport = FakeTransport::new(Ok(RawResponse::new(200, "{}")));
        let err = client(transport.clone()).assess("   ").await.unwrap_err();

        assert_eq!(err, ApiError::EmptyQuery);
        assert!(transport.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assess_keeps_raw_copy() {
        let body = r#"{"product":"Slack","vendor":"Salesforce","trust_score":82,"cveStats":{"total":4}}"#;
        let transport = FakeTransport::new(Ok(RawResponse::new(200, body)));
        let result = client(transport).assess("Slack").await.unwrap();

        assert_eq!(result.raw["product"], "Slack");
        assert_eq!(result.raw["cveStats"]["total"], 4);
        assert_eq!(result.data.app_name, "");
    }

    #[tokio::test]
    async fn test_assess_empty_body() {
        let transport = FakeTransport::new(Ok(RawResponse::new(200, "   ")));
        let err = client(transport).assess("Slack").await.unwrap_err();

        assert_eq!(err.user_message(), NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_assess_malformed_json() {
        let transport = FakeTransport::new(Ok(RawResponse::new(200, "{not json")));
        let err = client(transport).assess("Slack").await.unwrap_err();

        assert_eq!(err, ApiError::NotFound { status: 200 });
    }

    #[tokio::test]
    async fn test_assess_non_2xx() {
        let transport =
            FakeTransport::new(Ok(RawResponse::new(503, r#"{"message":"Workflow offline"}"#)));
        let err = client(transport).assess("Slack").await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 503,
                message: "Workflow offline".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_assess_transport_failure() {
        let transport = FakeTransport::new(Err(ApiError::transport("")));
        let err = client(transport).assess("Slack").await.unwrap_err();

        assert_eq!(err.user_message(), "Failed to assess product. Please try again.");
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_non_object() {
        let transport = FakeTransport::new(Ok(RawResponse::new(200, "[1,2]")));

        let lenient = client(transport.clone()).assess("Slack").await;
        assert!(lenient.is_ok());

        let strict = client(transport)
            .with_options(ClientOptions { strict: true })
            .assess("Slack")
            .await;
        assert_eq!(strict.unwrap_err(), ApiError::NotFound { status: 200 });
    }

    #[tokio::test]
    async fn test_list_category_bare_array() {
        let transport = FakeTransport::new(Ok(RawResponse::new(
            200,
            r#"[{"app_name":"Slack"},{"product":"Teams"}]"#,
        )));
        let items = client(transport.clone())
            .list_category("Team Collaboration")
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].0, "https://api.test/compare");
        assert_eq!(requests[0].1, json!({ "category": "Team Collaboration" }));
    }

    #[tokio::test]
    async fn test_list_category_wrapped() {
        let transport = FakeTransport::new(Ok(RawResponse::new(
            200,
            r#"{"category":"Chat","tools":[{"app_name":"Slack"}]}"#,
        )));
        let items = client(transport).list_category("Chat").await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_list_category_without_list() {
        let transport = FakeTransport::new(Ok(RawResponse::new(200, r#"{"tools":"none"}"#)));
        let err = client(transport).list_category("Chat").await.unwrap_err();
        assert_eq!(err, ApiError::NotFound { status: 200 });
    }

    #[test]
    fn test_interpret_2xx_range() {
        assert!(interpret(RawResponse::new(201, "{}"), ClientOptions::default()).is_ok());
        assert!(interpret(RawResponse::new(299, "{}"), ClientOptions::default()).is_ok());
        assert!(interpret(RawResponse::new(300, "{}"), ClientOptions::default()).is_err());
        assert!(interpret(RawResponse::new(199, "{}"), ClientOptions::default()).is_err());
    }
}
