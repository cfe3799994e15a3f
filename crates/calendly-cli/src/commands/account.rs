//! Account commands.

use calendly_api::CalendlyClient;
use serde_json::Value;

use crate::error::CliResult;

/// `calendly me`
pub fn me(client: &CalendlyClient) -> CliResult<Value> {
    Ok(client.about()?)
}
