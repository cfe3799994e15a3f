//! HTTP transport abstraction.
//!
//! [`HttpTransport`] is the single seam between this crate and the network.
//! [`ReqwestTransport`] is the production implementation, built on
//! `reqwest::blocking`. Everything above it (credentials, error
//! classification, resources, pagination) only sees [`HttpRequest`] and
//! [`HttpResponse`].

use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{ApiResult, CalendlyError};

/// HTTP methods used by the Calendly API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully prepared request, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs, in insertion order.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Returns the value of the first header matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A raw response: status code and body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Undecoded response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response from a status code and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decodes the body as JSON.
    pub fn json(&self) -> ApiResult<Value> {
        serde_json::from_slice(&self.body).map_err(|e| {
            CalendlyError::invalid_response(format!("failed to parse response: {}", e))
                .with_source(e)
        })
    }

    /// Decodes the body as a JSON object, falling back to an empty map when
    /// the body is empty, not JSON, or not an object.
    pub fn json_or_empty(&self) -> Map<String, Value> {
        match serde_json::from_slice(&self.body) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Sends prepared requests and returns raw responses.
///
/// Implementations report only transport-level failures (connection, timeout)
/// as errors. Any status code is a successful `execute`; status
/// interpretation happens in [`Requester`](crate::request::Requester).
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and waits for the response.
    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

/// Settings for the default HTTP transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for API requests.
    pub user_agent: String,
}

impl TransportConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calendly-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// [`HttpTransport`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Builds a transport from the given configuration.
    pub fn new(config: &TransportConfig) -> ApiResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                CalendlyError::network(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(send_error)?;

        let status = response.status().as_u16();
        trace!(method = %request.method, url = %request.url, status, "received response");

        let body = response.bytes().map_err(|e| {
            CalendlyError::network(format!("failed to read response: {}", e)).with_source(e)
        })?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn send_error(e: reqwest::Error) -> CalendlyError {
    let err = if e.is_timeout() {
        CalendlyError::network("request timeout")
    } else if e.is_connect() {
        CalendlyError::network(format!("connection failed: {}", e))
    } else {
        CalendlyError::network(format!("request failed: {}", e))
    };
    err.with_source(e)
}
