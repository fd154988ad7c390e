//! Shared fixtures for integration tests.

use async_trait::async_trait;
use hawkshot::client::{AssessmentTransport, RawResponse};
use hawkshot::ApiError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Assessment body in the canonical shape.
#[allow(dead_code)]
pub fn slack_body() -> Value {
    json!({
        "app_name": "Slack",
        "vendor_name": "Slack Technologies",
        "category": "Team Collaboration",
        "trust_score": 82,
        "confidence": 0.78,
        "evidence_coverage": 0.45,
        "risk_label": "Lower Risk",
        "scoring_breakdown": { "identity": 0.9, "controls": 0.65, "cve_risk": 0.2 },
        "brief_markdown": "## Overview\nSlack is a messaging platform."
    })
}

/// Assessment body using the older field names.
#[allow(dead_code)]
pub fn notion_body() -> Value {
    json!({
        "product": "Notion",
        "vendor": "Notion Labs",
        "trust_score": 68,
        "confidence": 0.78,
        "evidence_coverage": 0.6
    })
}

/// One request as the stub server saw it.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
    pub body: Value,
}

/// Minimal HTTP/1.1 server answering each path with a canned status and body.
#[allow(dead_code)]
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl StubServer {
    pub async fn start(routes: Vec<(&str, u16, String)>) -> Self {
        let routes: Arc<HashMap<String, (u16, String)>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, status, body)| (path.to_string(), (status, body)))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let log = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let (path, headers, body) = read_request(&mut socket).await;
                    log.lock().unwrap().push(RecordedRequest {
                        path: path.clone(),
                        headers,
                        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                    });

                    let (status, body) = routes
                        .get(&path)
                        .cloned()
                        .unwrap_or((404, String::new()));
                    let response = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { base_url, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[allow(dead_code)]
async fn read_request(
    socket: &mut tokio::net::TcpStream,
) -> (String, HashMap<String, String>, Vec<u8>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return (String::new(), HashMap::new(), Vec::new());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let headers: HashMap<String, String> = head
        .lines()
        .skip(1)
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            Some((name.trim().to_lowercase(), value.trim().to_string()))
        })
        .collect();
    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    (path, headers, buf[header_end..].to_vec())
}

/// Answers by the `query` field of the request body.
#[allow(dead_code)]
#[derive(Default)]
pub struct RoutingTransport {
    answers: HashMap<String, Result<RawResponse, ApiError>>,
}

#[allow(dead_code)]
impl RoutingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, key: &str, response: Result<RawResponse, ApiError>) -> Self {
        self.answers.insert(key.to_string(), response);
        self
    }

    pub fn json(self, key: &str, body: Value) -> Self {
        self.answer(key, Ok(RawResponse::new(200, body.to_string())))
    }
}

#[async_trait]
impl AssessmentTransport for RoutingTransport {
    async fn post_json(&self, _url: &str, body: &Value) -> Result<RawResponse, ApiError> {
        let key = body
            .get("query")
            .or_else(|| body.get("category"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        self.answers
            .get(key)
            .cloned()
            .unwrap_or_else(|| Ok(RawResponse::new(200, "")))
    }
}
