//! OAuth2 token commands.

use calendly_api::{CalendlyOAuth2, TokenResponse};
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::error::CliResult;

/// Builds the OAuth2 helper from the `[oauth]` config section.
pub fn connect(config: &ClientConfig) -> CliResult<CalendlyOAuth2> {
    Ok(CalendlyOAuth2::new(
        config.oauth_config()?,
        &config.transport_config(),
    )?)
}

/// `calendly oauth url`
pub fn url(oauth: &CalendlyOAuth2) -> CliResult<Value> {
    Ok(json!({ "authorization_url": oauth.authorization_url()? }))
}

/// `calendly oauth exchange <code>`
pub fn exchange(oauth: &CalendlyOAuth2, code: &str) -> CliResult<Value> {
    token_output(oauth.exchange_code_for_token(code, None)?)
}

/// `calendly oauth refresh <refresh_token>`
pub fn refresh(oauth: &CalendlyOAuth2, refresh_token: &str) -> CliResult<Value> {
    token_output(oauth.refresh_token(refresh_token, None)?)
}

/// `calendly oauth revoke <token>`
pub fn revoke(oauth: &CalendlyOAuth2, token: &str) -> CliResult<Value> {
    Ok(Value::Object(oauth.revoke_token(token)?))
}

/// `calendly oauth introspect <token>`
pub fn introspect(oauth: &CalendlyOAuth2, token: &str) -> CliResult<Value> {
    Ok(serde_json::to_value(oauth.introspect_token(token)?)?)
}

/// Token response plus a computed `expires_at` (RFC 3339), when known.
fn token_output(token: TokenResponse) -> CliResult<Value> {
    let expires_at = token.expires_at().map(|at| at.to_rfc3339());
    let mut value = serde_json::to_value(&token)?;
    if let (Some(object), Some(expires_at)) = (value.as_object_mut(), expires_at) {
        object.insert("expires_at".to_string(), Value::String(expires_at));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::StubTransport;
    use crate::error::CliError;
    use calendly_api::OAuth2Config;

    fn helper(stub: &std::sync::Arc<StubTransport>) -> CalendlyOAuth2 {
        let config = OAuth2Config::new("cid", "csecret").with_redirect_uri("https://example.com/cb");
        CalendlyOAuth2::with_transport(config, stub.clone())
    }

    #[test]
    fn url_output() {
        let stub = StubTransport::with(vec![]);
        let body = url(&helper(&stub)).unwrap();
        assert_eq!(
            body["authorization_url"],
            "https://auth.calendly.com/oauth/authorize?client_id=cid&response_type=code&redirect_uri=https://example.com/cb"
        );
    }

    #[test]
    fn exchange_adds_expiry() {
        let stub = StubTransport::with(vec![(
            200,
            json!({
                "access_token": "at",
                "refresh_token": "rt",
                "token_type": "Bearer",
                "expires_in": 7200,
                "created_at": 1_700_000_000
            }),
        )]);

        let body = exchange(&helper(&stub), "the-code").unwrap();
        assert_eq!(body["access_token"], "at");
        assert_eq!(body["expires_at"], "2023-11-15T00:13:20+00:00");
        assert_eq!(stub.requests()[0].body.as_ref().unwrap()["code"], "the-code");
    }

    #[test]
    fn refresh_without_timestamps_has_no_expiry() {
        let stub = StubTransport::with(vec![(200, json!({"access_token": "at2"}))]);
        let body = refresh(&helper(&stub), "rt").unwrap();
        assert!(body.get("expires_at").is_none());
    }

    #[test]
    fn oauth_errors_are_tagged() {
        let stub = StubTransport::with(vec![(
            400,
            json!({"error": "invalid_grant", "error_description": "expired"}),
        )]);
        let err = refresh(&helper(&stub), "rt").unwrap_err();
        assert!(matches!(err, CliError::Api(ref e) if e.is_oauth2()));
        assert_eq!(err.to_string(), "[oauth2] invalid_grant: expired");
    }

    #[test]
    fn revoke_empty_body() {
        let stub = StubTransport::with(vec![(200, json!({}))]);
        assert_eq!(revoke(&helper(&stub), "at").unwrap(), json!({}));
    }
}
