/// Generic HTTP executor for the diagnostic probes
///
/// Probes describe their request declaratively as an `ApiRequest` and hand
/// it to an `ApiTransport`. The production transport is a thin reqwest
/// wrapper with a fixed timeout; tests substitute mocked transports behind
/// the same trait so probe logic never touches the network.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::DiagError;

/// HTTP methods the remote API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One outbound request, relative to the transport's base origin.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Request method
    pub method: HttpMethod,

    /// Endpoint path, joined onto the base origin
    pub path: String,

    /// Optional JSON body; sets the JSON content type when present
    pub json: Option<Value>,

    /// Additional request headers
    pub headers: Vec<(String, String)>,

    /// Query-string parameters
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: &str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            json: None,
            headers: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }
}

/// Status code and raw body of a completed request.
///
/// Carried verbatim; the probes decide what the pair means.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Boundary between probe logic and the concrete HTTP stack.
///
/// Exactly one outbound call per invocation, no retries. Transport-level
/// failures (DNS, refused connection, timeout) come back as
/// `DiagError::Transport` with a human-readable message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<HttpResponse, DiagError>;
}

/// reqwest-backed transport targeting a fixed base origin.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client with the given base origin and request timeout.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, DiagError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| DiagError::ClientBuild(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl ApiTransport for ApiClient {
    async fn execute(&self, request: ApiRequest) -> Result<HttpResponse, DiagError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("Sending {:?} request to {}", request.method, url);

        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DiagError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DiagError::Transport(e.to_string()))?;

        debug!("Received status {} ({} byte body)", status, body.len());
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::post("/wp-json/subscriber/v1/check-usage")
            .with_json(json!({"license_key": "PK-TEST"}))
            .with_header("X-Timestamp", "1700000000")
            .with_query("debug", "1");

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/wp-json/subscriber/v1/check-usage");
        assert_eq!(request.json.as_ref().unwrap()["license_key"], "PK-TEST");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.query.len(), 1);
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = ApiClient::new("https://oneclickcontent.com/", 45)
            .expect("Client should build");
        assert_eq!(client.base_url, "https://oneclickcontent.com");
    }
}
