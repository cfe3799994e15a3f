//! Webhook subscription commands.

use calendly_api::{CalendlyClient, CreateWebhook, ListWebhooks, WebhookEvent, WebhookScope};
use serde_json::Value;
use tracing::info;

use crate::error::{CliError, CliResult};

/// `calendly webhooks list`
pub fn list(
    client: &CalendlyClient,
    organization: &str,
    scope: WebhookScope,
    user: Option<String>,
) -> CliResult<Value> {
    let mut params = ListWebhooks::new(organization, scope);
    if let Some(user) = user {
        params = params.with_user(user);
    }
    Ok(client.list_webhooks(&params)?)
}

/// `calendly webhooks get <webhook>`
pub fn get(client: &CalendlyClient, webhook: &str) -> CliResult<Value> {
    Ok(client.get_webhook(webhook)?)
}

/// Arguments of `calendly webhooks create`.
#[derive(Debug, Clone)]
pub struct CreateArgs {
    pub url: String,
    pub organization: String,
    pub scope: WebhookScope,
    pub user: Option<String>,
    pub events: Vec<String>,
    pub signing_key: Option<String>,
}

impl CreateArgs {
    fn into_params(self) -> CliResult<CreateWebhook> {
        let mut params = CreateWebhook::new(self.url, self.scope, self.organization);
        if !self.events.is_empty() {
            let events = self
                .events
                .iter()
                .map(|name| {
                    WebhookEvent::parse(name)
                        .ok_or_else(|| CliError::Usage(format!("unknown webhook event: {}", name)))
                })
                .collect::<CliResult<Vec<_>>>()?;
            params = params.with_events(events);
        }
        if let Some(user) = self.user {
            params = params.with_user(user);
        }
        if let Some(key) = self.signing_key {
            params = params.with_signing_key(key);
        }
        Ok(params)
    }
}

/// `calendly webhooks create`
pub fn create(client: &CalendlyClient, args: CreateArgs) -> CliResult<Value> {
    let params = args.into_params()?;
    let created = client.create_webhook(&params)?;
    info!(url = %params.url, "webhook subscription created");
    Ok(created)
}

/// `calendly webhooks delete <webhook>`
pub fn delete(client: &CalendlyClient, webhook: &str) -> CliResult<Value> {
    Ok(Value::Object(client.delete_webhook(webhook)?))
}
