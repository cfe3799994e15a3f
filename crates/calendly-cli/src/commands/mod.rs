//! Command handlers.
//!
//! Handlers return the JSON document to print; `main` writes it to stdout.

pub mod account;
pub mod config;
pub mod events;
pub mod oauth;
pub mod webhooks;

use std::io::Write;

use calendly_api::{CalendlyClient, CalendlyError, Credential};
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::CliResult;

/// Builds an authenticated API client from config and the `--token` override.
pub fn connect(config: &ClientConfig, token: Option<&str>) -> CliResult<CalendlyClient> {
    let token = config.resolve_token(token)?;
    Ok(CalendlyClient::with_config(
        Credential::bearer(token),
        &config.transport_config(),
    )?)
}

/// Returns `user` if given, else the authenticated user's URI.
pub fn user_or_me(client: &CalendlyClient, user: Option<String>) -> CliResult<String> {
    if let Some(user) = user {
        return Ok(user);
    }
    let me = client.about()?;
    let uri = me
        .pointer("/resource/uri")
        .and_then(Value::as_str)
        .ok_or_else(|| CalendlyError::invalid_response("users/me response has no resource.uri"))?;
    Ok(uri.to_string())
}

/// Writes `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(mut out: W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use calendly_api::{
        ApiResult, CalendlyClient, CalendlyError, Credential, HttpRequest, HttpResponse,
        HttpTransport,
    };
    use serde_json::Value;

    /// Canned-response transport for handler tests.
    #[derive(Debug, Default)]
    pub(crate) struct StubTransport {
        responses: Mutex<VecDeque<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl StubTransport {
        pub(crate) fn with(responses: Vec<(u16, Value)>) -> Arc<Self> {
            let stub = Self::default();
            for (status, body) in responses {
                stub.responses
                    .lock()
                    .unwrap()
                    .push_back(HttpResponse::new(status, body.to_string()));
            }
            Arc::new(stub)
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    pub(crate) fn client(stub: &Arc<StubTransport>) -> CalendlyClient {
        CalendlyClient::with_transport(Some(Credential::bearer("test-token")), stub.clone())
    }

    impl HttpTransport for StubTransport {
        fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
            let url = request.url.clone();
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| CalendlyError::internal(format!("unexpected request to {}", url)))
        }
    }
}
