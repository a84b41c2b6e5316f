//! HTTP transport to the charger
//!
//! One [`Transport`] wraps one connection pool. The charger binds the
//! authenticated session to the keep-alive connection, so the pool is
//! limited to a single idle connection and reused for every call of a
//! session. [`Connector`] opens a fresh pool for each new session.

use crate::error::{AlfenError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use reqwest::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Content type of every request sent to the charger
pub const API_CONTENT_TYPE: &str = "alfen/json; charset=utf-8";

/// Media types whose body must be valid JSON
const JSON_MEDIA_TYPES: [&str; 2] = ["application/json", "alfen/json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single request relative to the charger base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path including query, e.g. `/api/prop?ids=2201_0`
    pub path: String,
    pub body: Option<String>,
    /// Send `Connection: keep-alive`; cleared for logout
    pub keep_alive: bool,
}

impl ApiRequest {
    pub fn get<S: Into<String>>(path: S) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            keep_alive: true,
        }
    }

    pub fn post<S: Into<String>>(path: S, body: Option<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body,
            keep_alive: true,
        }
    }

    /// Let the peer close the connection after this request
    pub fn closing(mut self) -> Self {
        self.keep_alive = false;
        self
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Structured body, failing when the charger answered with plain text
    pub fn into_json(self) -> Result<Value> {
        match self {
            ResponseBody::Json(v) => Ok(v),
            ResponseBody::Text(t) => Err(AlfenError::parse(format!(
                "Expected a JSON body, got text: {}",
                truncate(&t, 120)
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: ResponseBody,
}

/// Sends requests over one connection pool
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Opens a new connection pool for a session
pub trait Connector: Send + Sync {
    fn connect(&self) -> Result<Arc<dyn Transport>>;
}

/// Decode a response body.
///
/// The body is parsed as JSON whenever possible. When that fails the raw
/// text is returned, unless the content type announced JSON.
pub fn decode_body(content_type: Option<&str>, text: String) -> Result<ResponseBody> {
    match serde_json::from_str::<Value>(&text) {
        Ok(v) => Ok(ResponseBody::Json(v)),
        Err(e) if is_json_content_type(content_type) => Err(AlfenError::parse(format!(
            "Invalid JSON in {} response: {}",
            content_type.unwrap_or_default(),
            e
        ))),
        Err(_) => Ok(ResponseBody::Text(text)),
    }
}

fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|media| {
            let media = media.trim().to_ascii_lowercase();
            JSON_MEDIA_TYPES.contains(&media.as_str())
        })
        .unwrap_or(false)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// reqwest based connector
pub struct HttpConnector {
    base_url: String,
    request_timeout: Duration,
    pool_idle_timeout: Duration,
}

impl HttpConnector {
    pub fn new<S: Into<String>>(
        base_url: S,
        request_timeout: Duration,
        pool_idle_timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout,
            pool_idle_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Connector for HttpConnector {
    fn connect(&self) -> Result<Arc<dyn Transport>> {
        // Charger certificates are self-signed
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .pool_max_idle_per_host(1)
            .pool_idle_timeout(self.pool_idle_timeout)
            .timeout(self.request_timeout)
            .build()?;

        Ok(Arc::new(HttpTransport {
            client,
            base_url: self.base_url.clone(),
            logger: get_logger_with_context(
                LogContext::new("transport").with_field("host", self.base_url.clone()),
            ),
        }))
    }
}

/// One reqwest client, i.e. one keep-alive pool
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    logger: StructuredLogger,
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        }
        .header(CONTENT_TYPE, HeaderValue::from_static(API_CONTENT_TYPE));

        if request.keep_alive {
            builder = builder.header(CONNECTION, HeaderValue::from_static("keep-alive"));
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_LENGTH, body.len()).body(body);
        }

        self.logger
            .trace(&format!("{:?} {}", request.method, request.path));
        let response = builder.send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;

        if status != 200 {
            self.logger.debug(&format!(
                "{} answered {}: {}",
                request.path,
                status,
                truncate(&text, 200)
            ));
            return Err(AlfenError::status(
                status,
                format!("Request to {} failed", request.path),
            ));
        }

        self.logger.trace(&format!(
            "{} answered {} ({} bytes, {})",
            request.path,
            status,
            text.len(),
            content_type.as_deref().unwrap_or("no content type")
        ));
        let body = decode_body(content_type.as_deref(), text)?;

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_json_body() {
        let body = decode_body(Some(API_CONTENT_TYPE), r#"{"a":1}"#.to_string()).unwrap();
        assert_eq!(body, ResponseBody::Json(json!({"a": 1})));
    }

    #[test]
    fn test_decode_text_falls_back_to_raw() {
        let body = decode_body(Some("text/plain"), "ok".to_string()).unwrap();
        assert_eq!(body, ResponseBody::Text("ok".to_string()));

        let body = decode_body(None, "".to_string()).unwrap();
        assert_eq!(body, ResponseBody::Text(String::new()));
    }

    #[test]
    fn test_decode_invalid_json_with_json_content_type() {
        let err = decode_body(Some("alfen/json; charset=utf-8"), "{oops".to_string()).unwrap_err();
        assert!(matches!(err, AlfenError::Parse { .. }));

        let err = decode_body(Some("Application/JSON"), "nope".to_string()).unwrap_err();
        assert!(matches!(err, AlfenError::Parse { .. }));
    }

    #[test]
    fn test_into_json() {
        assert!(ResponseBody::Json(json!([])).into_json().is_ok());
        let err = ResponseBody::Text("x".into()).into_json().unwrap_err();
        assert!(matches!(err, AlfenError::Parse { .. }));
    }

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::post("/api/logout", None).closing();
        assert_eq!(req.method, Method::Post);
        assert!(!req.keep_alive);
        assert!(ApiRequest::get("/api/info").keep_alive);
    }

    #[test]
    fn test_connector_trims_base_url() {
        let c = HttpConnector::new(
            "https://192.168.1.50/",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert_eq!(c.base_url(), "https://192.168.1.50");
    }
}
