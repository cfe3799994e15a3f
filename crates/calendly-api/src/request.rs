//! Authenticated request dispatch and error normalization.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiResult, CalendlyError, ErrorKind};
use crate::transport::{
    HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport, TransportConfig,
};

/// Highest status code treated as success (308 Permanent Redirect).
pub const MAX_SUCCESS_STATUS: u16 = 308;

/// How requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Personal access token or OAuth2 access token, sent as `authorization: Bearer {token}`.
    Bearer(String),
    /// Pre-built headers, sent verbatim.
    Headers(BTreeMap<String, String>),
}

impl Credential {
    /// Creates a bearer token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Builds an optional credential from a token and/or a header map.
    ///
    /// Supplying both is a configuration error; supplying neither yields `None`.
    pub fn from_parts(
        token: Option<String>,
        headers: Option<BTreeMap<String, String>>,
    ) -> ApiResult<Option<Self>> {
        match (token, headers) {
            (Some(_), Some(_)) => Err(CalendlyError::configuration(
                "a token and custom headers cannot be supplied at the same time",
            )),
            (Some(token), None) => Ok(Some(Self::Bearer(token))),
            (None, Some(headers)) => Ok(Some(Self::Headers(headers))),
            (None, None) => Ok(None),
        }
    }

    /// Returns the headers this credential adds to every request.
    pub fn headers(&self) -> Vec<(String, String)> {
        match self {
            Self::Bearer(token) => vec![("authorization".to_string(), format!("Bearer {}", token))],
            Self::Headers(headers) => headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Self::Headers(headers) => f
                .debug_tuple("Headers")
                .field(&headers.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Sends authenticated JSON requests and normalizes error responses.
#[derive(Clone)]
pub struct Requester {
    transport: Arc<dyn HttpTransport>,
    credential: Option<Credential>,
}

impl Requester {
    /// Creates a requester over an arbitrary transport.
    pub fn new(transport: Arc<dyn HttpTransport>, credential: Option<Credential>) -> Self {
        Self {
            transport,
            credential,
        }
    }

    /// Creates a requester over the default `reqwest` transport.
    pub fn with_config(config: &TransportConfig, credential: Option<Credential>) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), credential))
    }

    /// Returns the credential attached to every request, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Sends a request and returns the raw response.
    ///
    /// Responses with a status above 308 are turned into a normalized
    /// [`CalendlyError`].
    pub fn send(&self, method: Method, url: &str, payload: Option<Value>) -> ApiResult<HttpResponse> {
        let mut request = HttpRequest::new(method, url);
        if let Some(ref credential) = self.credential {
            request.headers = credential.headers();
        }
        request.body = payload;

        debug!(%method, url, "sending request");
        let response = self.transport.execute(request)?;

        if response.status > MAX_SUCCESS_STATUS {
            let err = CalendlyError::from_response(response.status, &response.body);
            if err.kind() == ErrorKind::UnknownError {
                warn!(status = response.status, url, "unrecognized error response body");
            } else {
                debug!(status = response.status, error = %err, "request failed");
            }
            return Err(err);
        }

        Ok(response)
    }

    /// Sends a request and decodes the JSON response body.
    pub fn request(&self, method: Method, url: &str, payload: Option<Value>) -> ApiResult<Value> {
        self.send(method, url, payload)?.json()
    }

    /// `GET url`, decoded.
    pub fn get(&self, url: &str, payload: Option<Value>) -> ApiResult<Value> {
        self.request(Method::Get, url, payload)
    }

    /// `POST url`, decoded.
    pub fn post(&self, url: &str, payload: Option<Value>) -> ApiResult<Value> {
        self.request(Method::Post, url, payload)
    }

    /// `PUT url`, decoded.
    pub fn put(&self, url: &str, payload: Option<Value>) -> ApiResult<Value> {
        self.request(Method::Put, url, payload)
    }

    /// `DELETE url`, returning the raw response so the caller can read the status.
    pub fn delete(&self, url: &str, payload: Option<Value>) -> ApiResult<HttpResponse> {
        self.send(Method::Delete, url, payload)
    }
}

impl std::fmt::Debug for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Requester")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}
