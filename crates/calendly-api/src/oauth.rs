//! OAuth 2.0 authorization code flow for Calendly.
//!
//! [`CalendlyOAuth2`] builds the browser authorization URL and performs the
//! token lifecycle exchanges against `https://auth.calendly.com/oauth`:
//!
//! 1. Send the user to [`CalendlyOAuth2::authorization_url`]
//! 2. Calendly redirects to `redirect_uri` with `?code=...`
//! 3. [`CalendlyOAuth2::exchange_code_for_token`] trades the code for tokens
//! 4. [`CalendlyOAuth2::refresh_token`] renews an expired access token
//! 5. [`CalendlyOAuth2::revoke_token`] / [`CalendlyOAuth2::introspect_token`]
//!
//! Every error returned from this module belongs to
//! [`ErrorDomain::OAuth2`](crate::error::ErrorDomain::OAuth2).

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::endpoints::{OAUTH_AUTHORIZE, OAUTH_INTROSPECT, OAUTH_REVOKE, OAUTH_TOKEN};
use crate::error::{ApiResult, CalendlyError};
use crate::request::Requester;
use crate::transport::{HttpTransport, Method, TransportConfig};

/// Grant type for the authorization code exchange.
pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";

/// Grant type for refreshing an access token.
pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";

/// Default `response_type` for the authorization URL.
pub const DEFAULT_RESPONSE_TYPE: &str = "code";

const MISSING_REDIRECT_URI: &str =
    "a redirect_uri must be configured for this OAuth2 operation";

/// OAuth 2.0 client registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuth2Config {
    /// The OAuth client ID.
    pub client_id: String,
    /// The OAuth client secret.
    pub client_secret: String,
    /// Where Calendly redirects after authorization.
    ///
    /// Required for the authorization URL and the code exchange only.
    pub redirect_uri: Option<String>,
    /// The `response_type` sent to the authorize endpoint.
    pub response_type: String,
}

impl OAuth2Config {
    /// Creates a configuration without a redirect URI.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: None,
            response_type: DEFAULT_RESPONSE_TYPE.to_string(),
        }
    }

    /// Sets the redirect URI.
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the response type.
    pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = response_type.into();
        self
    }

    /// Checks that the client credentials are present.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.is_empty() {
            return Err("client_id is required");
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required");
        }
        if self.response_type.is_empty() {
            return Err("response_type must not be empty");
        }
        Ok(())
    }

    fn require_redirect_uri(&self) -> ApiResult<&str> {
        self.redirect_uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| CalendlyError::configuration(MISSING_REDIRECT_URI).into_oauth2())
    }
}

/// OAuth client for the Calendly authorization server.
#[derive(Debug, Clone)]
pub struct CalendlyOAuth2 {
    config: OAuth2Config,
    requester: Requester,
}

impl CalendlyOAuth2 {
    /// Creates an OAuth client over the default HTTP transport.
    pub fn new(config: OAuth2Config, transport: &TransportConfig) -> ApiResult<Self> {
        let requester = Requester::with_config(transport, None).map_err(CalendlyError::into_oauth2)?;
        Ok(Self { config, requester })
    }

    /// Creates an OAuth client over a custom transport.
    pub fn with_transport(config: OAuth2Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            requester: Requester::new(transport, None),
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &OAuth2Config {
        &self.config
    }

    /// Builds the URL the user must visit to authorize this client.
    ///
    /// Parameters are substituted as-is, in the order `client_id`,
    /// `response_type`, `redirect_uri`.
    pub fn authorization_url(&self) -> ApiResult<String> {
        let redirect_uri = self.config.require_redirect_uri()?;
        Ok(format!(
            "{}?client_id={}&response_type={}&redirect_uri={}",
            OAUTH_AUTHORIZE, self.config.client_id, self.config.response_type, redirect_uri
        ))
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// `grant_type` defaults to `authorization_code`.
    pub fn exchange_code_for_token(
        &self,
        code: &str,
        grant_type: Option<&str>,
    ) -> ApiResult<TokenResponse> {
        let redirect_uri = self.config.require_redirect_uri()?;
        let payload = json!({
            "grant_type": grant_type.unwrap_or(GRANT_AUTHORIZATION_CODE),
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "code": code,
            "redirect_uri": redirect_uri,
        });

        let token: TokenResponse = self.post_decoded(OAUTH_TOKEN, payload)?;
        info!("successfully obtained tokens");
        Ok(token)
    }

    /// Obtains a new access token from a refresh token.
    ///
    /// `grant_type` defaults to `refresh_token`.
    pub fn refresh_token(
        &self,
        refresh_token: &str,
        grant_type: Option<&str>,
    ) -> ApiResult<TokenResponse> {
        let payload = json!({
            "grant_type": grant_type.unwrap_or(GRANT_REFRESH_TOKEN),
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "refresh_token": refresh_token,
        });

        let token: TokenResponse = self.post_decoded(OAUTH_TOKEN, payload)?;
        info!("successfully refreshed access token");
        Ok(token)
    }

    /// Revokes an access or refresh token.
    ///
    /// Calendly answers with an empty body on success, which decodes to an
    /// empty map.
    pub fn revoke_token(&self, token: &str) -> ApiResult<Map<String, Value>> {
        let payload = self.token_payload(token);
        let response = self
            .requester
            .send(Method::Post, OAUTH_REVOKE, Some(payload))
            .map_err(CalendlyError::into_oauth2)?;

        debug!(status = response.status, "token revoked");
        Ok(response.json_or_empty())
    }

    /// Returns the server's view of a token.
    pub fn introspect_token(&self, token: &str) -> ApiResult<TokenIntrospection> {
        let payload = self.token_payload(token);
        self.post_decoded(OAUTH_INTROSPECT, payload)
    }

    fn token_payload(&self, token: &str) -> Value {
        json!({
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "token": token,
        })
    }

    fn post_decoded<T>(&self, url: &str, payload: Value) -> ApiResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let body = self
            .requester
            .post(url, Some(payload))
            .map_err(CalendlyError::into_oauth2)?;

        serde_json::from_value(body).map_err(|e| {
            CalendlyError::invalid_response(format!("invalid token response: {}", e))
                .with_source(e)
                .into_oauth2()
        })
    }
}

/// Response from the token endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The access token for API requests.
    pub access_token: String,
    /// The refresh token for obtaining new access tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Usually `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of the access token, in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Issue time, as a Unix timestamp.
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    /// URI of the user the token belongs to.
    #[serde(default)]
    pub owner: Option<String>,
    /// URI of the user's organization.
    #[serde(default)]
    pub organization: Option<String>,
    /// Fields not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenResponse {
    /// When the access token expires, if the response says.
    ///
    /// Out-of-range timestamps or lifetimes yield `None`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let created = DateTime::from_timestamp(self.created_at?, 0)?;
        created.checked_add_signed(Duration::try_seconds(self.expires_in?)?)
    }

    /// Returns true if the access token has expired at `now`.
    ///
    /// Tokens without expiry information are treated as valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| now >= expires_at)
    }

    /// Returns true if the access token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Response from the introspection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenIntrospection {
    /// Whether the token is currently valid.
    pub active: bool,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Expiry, as a Unix timestamp.
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issue time, as a Unix timestamp.
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::MockTransport;
    use crate::transport::HttpResponse;

    fn config() -> OAuth2Config {
        OAuth2Config::new("cid", "csecret")
    }

    fn token_body() -> Value {
        json!({
            "token_type": "Bearer",
            "access_token": "eyJraWQiOiIx",
            "refresh_token": "b77a76ff",
            "expires_in": 7200,
            "created_at": 1548689183,
            "scope": "default",
            "owner": "https://api.calendly.com/users/EBHAAFHDCAEQTSEZ",
            "organization": "https://api.calendly.com/organizations/EDBCUGPEDLHQ"
        })
    }

    #[test]
    fn authorization_url_requires_redirect_uri() {
        let mock = MockTransport::new();
        let oauth = CalendlyOAuth2::with_transport(config(), mock.clone());

        let err = oauth.authorization_url().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.is_oauth2());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn authorization_url_format() {
        let oauth = CalendlyOAuth2::with_transport(
            config().with_redirect_uri("https://app.example.com/cb"),
            MockTransport::new(),
        );

        let url = oauth.authorization_url().unwrap();
        assert_eq!(
            url,
            "https://auth.calendly.com/oauth/authorize?client_id=cid&response_type=code&redirect_uri=https://app.example.com/cb"
        );

        let positions: Vec<usize> = ["client_id=", "response_type=", "redirect_uri="]
            .iter()
            .map(|key| {
                assert_eq!(url.matches(key).count(), 1);
                url.find(key).unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn custom_response_type() {
        let oauth = CalendlyOAuth2::with_transport(
            config()
                .with_redirect_uri("https://r")
                .with_response_type("token"),
            MockTransport::new(),
        );
        assert!(oauth.authorization_url().unwrap().contains("response_type=token&"));
    }

    #[test]
    fn exchange_code_requires_redirect_uri() {
        let mock = MockTransport::new();
        let oauth = CalendlyOAuth2::with_transport(config(), mock.clone());

        let err = oauth.exchange_code_for_token("code123", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.is_oauth2());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn exchange_code_posts_payload() {
        let mock = MockTransport::new();
        mock.push_json(200, token_body());
        let oauth = CalendlyOAuth2::with_transport(config().with_redirect_uri("https://r"), mock.clone());

        let token = oauth.exchange_code_for_token("code123", None).unwrap();
        assert_eq!(token.access_token, "eyJraWQiOiIx");
        assert_eq!(token.refresh_token.as_deref(), Some("b77a76ff"));

        let sent = &mock.requests()[0];
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.url, OAUTH_TOKEN);
        assert!(sent.header("authorization").is_none());
        assert_eq!(
            sent.body,
            Some(json!({
                "grant_type": "authorization_code",
                "client_id": "cid",
                "client_secret": "csecret",
                "code": "code123",
                "redirect_uri": "https://r"
            }))
        );
    }

    #[test]
    fn refresh_does_not_need_redirect_uri() {
        let mock = MockTransport::new();
        mock.push_json(200, token_body());
        let oauth = CalendlyOAuth2::with_transport(config(), mock.clone());

        oauth.refresh_token("b77a76ff", None).unwrap();

        let sent = &mock.requests()[0];
        assert_eq!(sent.url, OAUTH_TOKEN);
        assert_eq!(
            sent.body,
            Some(json!({
                "grant_type": "refresh_token",
                "client_id": "cid",
                "client_secret": "csecret",
                "refresh_token": "b77a76ff"
            }))
        );
    }

    #[test]
    fn custom_grant_type() {
        let mock = MockTransport::new();
        mock.push_json(200, token_body());
        let oauth = CalendlyOAuth2::with_transport(config(), mock.clone());

        oauth.refresh_token("r", Some("custom_grant")).unwrap();
        assert_eq!(mock.requests()[0].body.as_ref().unwrap()["grant_type"], "custom_grant");
    }

    #[test]
    fn revoke_tolerates_empty_body() {
        let mock = MockTransport::new();
        mock.push(HttpResponse::new(200, Vec::new()));
        let oauth = CalendlyOAuth2::with_transport(config(), mock.clone());

        let body = oauth.revoke_token("tok").unwrap();
        assert!(body.is_empty());

        let sent = &mock.requests()[0];
        assert_eq!(sent.url, OAUTH_REVOKE);
        assert_eq!(
            sent.body,
            Some(json!({"client_id": "cid", "client_secret": "csecret", "token": "tok"}))
        );
    }

    #[test]
    fn introspect_decodes() {
        let mock = MockTransport::new();
        mock.push_json(
            200,
            json!({
                "active": true,
                "scope": "default",
                "client_id": "cid",
                "token_type": "Bearer",
                "exp": 1601596800,
                "iat": 1601589600,
                "owner": "https://api.calendly.com/users/U",
                "organization": "https://api.calendly.com/organizations/O"
            }),
        );
        let oauth = CalendlyOAuth2::with_transport(config(), mock.clone());

        let info = oauth.introspect_token("tok").unwrap();
        assert!(info.active);
        assert_eq!(info.exp, Some(1601596800));
        assert_eq!(mock.requests()[0].url, OAUTH_INTROSPECT);
    }

    #[test]
    fn transport_errors_become_oauth2_errors() {
        let mock = MockTransport::new();
        mock.push_json(
            400,
            json!({"error": "invalid_grant", "error_description": "The provided authorization grant is invalid"}),
        );
        let oauth = CalendlyOAuth2::with_transport(config(), mock);

        let err = oauth.refresh_token("bad", None).unwrap_err();
        assert!(err.is_oauth2());
        assert_eq!(err.kind(), ErrorKind::OAuth2Error);
        assert_eq!(
            err.message(),
            "invalid_grant: The provided authorization grant is invalid"
        );
    }

    #[test]
    fn api_style_errors_keep_details() {
        let mock = MockTransport::new();
        mock.push_json(
            422,
            json!({"title": "Invalid", "message": "bad", "details": [{"parameter": "token"}]}),
        );
        let oauth = CalendlyOAuth2::with_transport(config(), mock);

        let err = oauth.introspect_token("tok").unwrap_err();
        assert!(err.is_oauth2());
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert_eq!(err.details().len(), 1);
    }

    #[test]
    fn token_expiry() {
        let token: TokenResponse = serde_json::from_value(token_body()).unwrap();
        let expires_at = token.expires_at().unwrap();
        assert_eq!(expires_at.timestamp(), 1548689183 + 7200);
        assert!(token.is_expired());
        assert!(!token.is_expired_at(DateTime::from_timestamp(1548689183, 0).unwrap()));

        let no_expiry: TokenResponse =
            serde_json::from_value(json!({"access_token": "a"})).unwrap();
        assert!(no_expiry.expires_at().is_none());
        assert!(!no_expiry.is_expired());
    }

    #[test]
    fn token_expiry_out_of_range_is_unknown() {
        let token: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "created_at": 1548689183,
            "expires_in": 9_000_000_000_000_000i64
        }))
        .unwrap();
        assert!(token.expires_at().is_none());
        assert!(!token.is_expired());

        let far_future: TokenResponse = serde_json::from_value(json!({
            "access_token": "a",
            "created_at": i64::MAX,
            "expires_in": 60
        }))
        .unwrap();
        assert!(far_future.expires_at().is_none());
    }

    #[test]
    fn token_response_keeps_unknown_fields() {
        let mut body = token_body();
        body["new_field"] = json!("x");
        let token: TokenResponse = serde_json::from_value(body).unwrap();
        assert_eq!(token.extra["new_field"], "x");
    }

    #[test]
    fn config_validation() {
        assert!(config().validate().is_ok());
        assert!(OAuth2Config::new("", "s").validate().is_err());
        assert!(OAuth2Config::new("c", "").validate().is_err());
        assert!(config().with_response_type("").validate().is_err());
    }
}
