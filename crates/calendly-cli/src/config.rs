//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calendly/config.toml` by default:
//!
//! ```toml
//! token = "pass::calendly/personal-access-token"
//! timeout = 30
//!
//! [oauth]
//! client_id = "env::CALENDLY_CLIENT_ID"
//! client_secret = "env::CALENDLY_CLIENT_SECRET"
//! redirect_uri = "https://example.com/callback"
//! ```
//!
//! `token`, `oauth.client_id` and `oauth.client_secret` support secret
//! references (see [`crate::secret`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use calendly_api::{OAuth2Config, TransportConfig};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};
use crate::secret;

const REDACTED: &str = "********";

/// Configuration for the `calendly` CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Personal access token or OAuth2 access token.
    pub token: Option<String>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// User-Agent header override.
    pub user_agent: Option<String>,

    /// OAuth2 application settings.
    pub oauth: Option<OAuthSettings>,

    /// File this configuration was read from.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// OAuth2 application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub response_type: Option<String>,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if the file
    /// does not exist.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Returns the file this configuration came from, or the default
    /// location when none was read.
    pub fn path(&self) -> PathBuf {
        self.source.clone().unwrap_or_else(Self::default_path)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calendly")
    }

    /// Builds transport settings from `timeout` and `user_agent`.
    pub fn transport_config(&self) -> TransportConfig {
        let mut config = TransportConfig::default();
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(ref agent) = self.user_agent {
            config = config.with_user_agent(agent);
        }
        config
    }

    /// Resolves the access token.
    ///
    /// `override_token` (from `--token` / `CALENDLY_TOKEN`) wins over the file.
    pub fn resolve_token(&self, override_token: Option<&str>) -> CliResult<String> {
        let raw = override_token.or(self.token.as_deref()).ok_or_else(|| {
            CliError::Config(format!(
                "no access token. Pass --token, set CALENDLY_TOKEN, or add to {}:\n  \
                 token = \"YOUR_PERSONAL_ACCESS_TOKEN\"",
                self.path().display()
            ))
        })?;
        secret::resolve("token", raw)
    }

    /// Builds the OAuth2 helper configuration from the `[oauth]` section.
    pub fn oauth_config(&self) -> CliResult<OAuth2Config> {
        let settings = self.oauth.as_ref().ok_or_else(|| {
            CliError::Config(format!(
                "no [oauth] section in {}",
                self.path().display()
            ))
        })?;
        settings.to_oauth_config()
    }

    /// Returns a copy safe to print: literal secrets are masked, secret
    /// references are kept.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.token = copy.token.as_deref().map(redact);
        if let Some(ref mut oauth) = copy.oauth {
            oauth.client_secret = oauth.client_secret.as_deref().map(redact);
        }
        copy
    }
}

impl OAuthSettings {
    /// Resolves credentials and builds an [`OAuth2Config`].
    pub fn to_oauth_config(&self) -> CliResult<OAuth2Config> {
        let raw_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| CliError::Config("client_id is missing from [oauth]".to_string()))?;
        let raw_secret = self.client_secret.as_deref().ok_or_else(|| {
            CliError::Config("client_secret is missing from [oauth]".to_string())
        })?;

        let mut config = OAuth2Config::new(
            secret::resolve("oauth.client_id", raw_id)?,
            secret::resolve("oauth.client_secret", raw_secret)?,
        );
        if let Some(ref uri) = self.redirect_uri {
            config = config.with_redirect_uri(uri);
        }
        if let Some(ref response_type) = self.response_type {
            config = config.with_response_type(response_type);
        }
        config
            .validate()
            .map_err(|e| CliError::Config(format!("invalid [oauth] settings: {}", e)))?;
        Ok(config)
    }
}

fn redact(value: &str) -> String {
    if secret::is_reference(value) {
        value.to_string()
    } else {
        REDACTED.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_from_file() {
        let file = write_config(
            r#"
token = "pat-123"
timeout = 5
user_agent = "my-app/1.0"

[oauth]
client_id = "cid"
client_secret = "csecret"
redirect_uri = "https://example.com/cb"
"#,
        );

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.token.as_deref(), Some("pat-123"));
        assert_eq!(config.timeout, Some(5));

        let transport = config.transport_config();
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.user_agent, "my-app/1.0");

        let oauth = config.oauth_config().unwrap();
        assert_eq!(oauth.client_id, "cid");
        assert_eq!(oauth.redirect_uri.as_deref(), Some("https://example.com/cb"));
        assert_eq!(oauth.response_type, "code");
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_config("");
        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(
            config,
            ClientConfig {
                source: Some(file.path().to_path_buf()),
                ..Default::default()
            }
        );
        assert_eq!(
            config.transport_config().timeout,
            Duration::from_secs(TransportConfig::DEFAULT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn invalid_toml_errors() {
        let file = write_config("token = [");
        let err = ClientConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn errors_name_the_loaded_file() {
        let file = write_config("timeout = 5\n");
        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.path(), file.path());

        let err = config.resolve_token(None).unwrap_err().to_string();
        assert!(err.contains(&file.path().display().to_string()));
        assert!(!err.contains(&ClientConfig::default_path().display().to_string()));

        let err = config.oauth_config().unwrap_err().to_string();
        assert!(err.contains(&file.path().display().to_string()));

        assert_eq!(ClientConfig::default().path(), ClientConfig::default_path());
    }

    #[test]
    fn token_override_wins() {
        let config = ClientConfig {
            token: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_token(Some("from-flag")).unwrap(), "from-flag");
        assert_eq!(config.resolve_token(None).unwrap(), "from-file");
    }

    #[test]
    fn missing_token_errors() {
        let err = ClientConfig::default().resolve_token(None).unwrap_err();
        assert!(err.to_string().contains("no access token"));
    }

    #[test]
    fn token_env_reference() {
        unsafe {
            std::env::set_var("_CALENDLY_CFG_TEST_TOKEN", "env-pat");
        }
        let config = ClientConfig {
            token: Some("env::_CALENDLY_CFG_TEST_TOKEN".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_token(None).unwrap(), "env-pat");
        unsafe {
            std::env::remove_var("_CALENDLY_CFG_TEST_TOKEN");
        }
    }

    #[test]
    fn oauth_section_required() {
        let err = ClientConfig::default().oauth_config().unwrap_err();
        assert!(err.to_string().contains("[oauth]"));

        let config: ClientConfig = toml::from_str("[oauth]\nclient_id = \"cid\"\n").unwrap();
        let err = config.oauth_config().unwrap_err();
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn redacted_masks_literals_only() {
        let config = ClientConfig {
            token: Some("pat-123".to_string()),
            oauth: Some(OAuthSettings {
                client_id: Some("cid".to_string()),
                client_secret: Some("env::SECRET".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let redacted = config.redacted();
        assert_eq!(redacted.token.as_deref(), Some(REDACTED));
        let oauth = redacted.oauth.unwrap();
        assert_eq!(oauth.client_id.as_deref(), Some("cid"));
        assert_eq!(oauth.client_secret.as_deref(), Some("env::SECRET"));
    }
}
