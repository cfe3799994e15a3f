//! Configuration commands.

use std::path::Path;

use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::error::CliResult;

/// Dump the configuration with literal secrets masked.
pub fn dump(config: &ClientConfig) -> CliResult<Value> {
    Ok(serde_json::to_value(config.redacted())?)
}

/// Show the configuration file in use.
pub fn path(explicit: Option<&Path>) -> CliResult<Value> {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(ClientConfig::default_path);
    Ok(json!({ "exists": path.is_file(), "config": path }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_masks_token() {
        let config = ClientConfig {
            token: Some("secret-pat".to_string()),
            timeout: Some(10),
            ..Default::default()
        };
        let body = dump(&config).unwrap();
        assert_eq!(body["token"], "********");
        assert_eq!(body["timeout"], 10);
    }

    #[test]
    fn path_reports_existence() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");

        let body = path(Some(file.as_path())).unwrap();
        assert_eq!(body["exists"], false);

        std::fs::write(&file, "timeout = 5\n").unwrap();
        let body = path(Some(file.as_path())).unwrap();
        assert_eq!(body["exists"], true);
        assert_eq!(body["config"], file.display().to_string());
    }
}
