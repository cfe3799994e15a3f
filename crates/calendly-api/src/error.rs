//! Error types for Calendly API operations.
//!
//! Every failure surfaced by this crate is a [`CalendlyError`]. HTTP failures
//! (status above 308) are normalized from the response body into one of three
//! kinds: [`ErrorKind::OAuth2Error`], [`ErrorKind::ApiError`] or
//! [`ErrorKind::UnknownError`]. The remaining kinds cover local misuse and
//! transport problems.
//!
//! Errors raised by the OAuth2 helper carry [`ErrorDomain::OAuth2`] so callers
//! can tell them apart from resource API failures.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// The category of a Calendly error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Error body carried OAuth2-style `error` and `error_description` fields.
    OAuth2Error,
    /// Error body carried resource-API-style `title` and `message` fields.
    ApiError,
    /// Error body could not be classified.
    UnknownError,
    /// Client was constructed or used with an invalid configuration.
    Configuration,
    /// Request parameters failed local validation.
    Validation,
    /// Network error - connection failed, timeout, DNS resolution, etc.
    Network,
    /// A successful response could not be decoded.
    InvalidResponse,
    /// Internal error - unexpected state, bug.
    Internal,
}

impl ErrorKind {
    /// Returns true if this kind was produced from an HTTP error response.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::OAuth2Error | Self::ApiError | Self::UnknownError)
    }

    /// Returns a stable name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OAuth2Error => "oauth2_error",
            Self::ApiError => "api_error",
            Self::UnknownError => "unknown_error",
            Self::Configuration => "configuration_error",
            Self::Validation => "validation_error",
            Self::Network => "network_error",
            Self::InvalidResponse => "invalid_response",
            Self::Internal => "internal_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which part of the client raised an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorDomain {
    /// Resource API calls and the shared transport.
    #[default]
    Api,
    /// The OAuth2 authorization and token lifecycle helper.
    OAuth2,
}

/// An error raised while talking to the Calendly API.
#[derive(Debug, Error)]
pub struct CalendlyError {
    kind: ErrorKind,
    message: String,
    details: Vec<Value>,
    domain: ErrorDomain,
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CalendlyError {
    /// Creates a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
            domain: ErrorDomain::Api,
            status: None,
            source: None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidResponse, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Builds the normalized error for an HTTP response with status above 308.
    ///
    /// The body is inspected in order: OAuth2 fields (`error`,
    /// `error_description`), then API fields (`title`, `message`, optional
    /// `details`). Anything else becomes `error: Unknown Error.`.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();
        let object = parsed.as_ref().and_then(Value::as_object);

        let (kind, error_type, description, details) = match object {
            Some(obj) if obj.contains_key("error") && obj.contains_key("error_description") => (
                ErrorKind::OAuth2Error,
                field_text(&obj["error"]),
                field_text(&obj["error_description"]),
                Vec::new(),
            ),
            Some(obj) if obj.contains_key("title") && obj.contains_key("message") => (
                ErrorKind::ApiError,
                field_text(&obj["title"]),
                field_text(&obj["message"]),
                obj.get("details")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
            ),
            _ => (
                ErrorKind::UnknownError,
                "error".to_string(),
                "Unknown Error.".to_string(),
                Vec::new(),
            ),
        };

        let mut err = Self::new(kind, format!("{}: {}", error_type, description))
            .with_details(details);
        err.status = Some(status);
        err
    }

    /// Sets the sub-error records for this error.
    pub fn with_details(mut self, details: Vec<Value>) -> Self {
        self.details = details;
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Re-signals this error in the OAuth2 domain, keeping kind, message and details.
    pub fn into_oauth2(mut self) -> Self {
        self.domain = ErrorDomain::OAuth2;
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the summary message, e.g. `"Resource Not Found: The server could not find the requested resource."`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the sub-error records reported by the service.
    pub fn details(&self) -> &[Value] {
        &self.details
    }

    /// Returns the domain that raised this error.
    pub fn domain(&self) -> ErrorDomain {
        self.domain
    }

    /// Returns true if the OAuth2 helper raised this error.
    pub fn is_oauth2(&self) -> bool {
        self.domain == ErrorDomain::OAuth2
    }

    /// Returns the HTTP status code, for errors built from a response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for CalendlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_oauth2() {
            write!(f, "[oauth2] ")?;
        }
        write!(f, "{}", self.message)?;
        if !self.details.is_empty() {
            write!(f, " - {}", Value::Array(self.details.clone()))?;
        }
        Ok(())
    }
}

/// A specialized Result type for Calendly operations.
pub type ApiResult<T> = Result<T, CalendlyError>;

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
