//! Calendly API and OAuth endpoints.

use url::Url;

// Calendly API v2 resources.
pub const WEBHOOK_SUBSCRIPTIONS: &str = "https://api.calendly.com/webhook_subscriptions";
pub const USERS: &str = "https://api.calendly.com/users";
pub const ME: &str = "https://api.calendly.com/users/me";
pub const EVENT_TYPES: &str = "https://api.calendly.com/event_types";
pub const SCHEDULED_EVENTS: &str = "https://api.calendly.com/scheduled_events";
pub const SCHEDULING_LINKS: &str = "https://api.calendly.com/scheduling_links";
pub const ORGANIZATIONS: &str = "https://api.calendly.com/organizations/";
pub const ORGANIZATION_MEMBERSHIPS: &str = "https://api.calendly.com/organization_memberships";
pub const DATA_COMPLIANCE_INVITEES: &str =
    "https://api.calendly.com/data_compliance/deletion/invitees";

// Calendly OAuth2 authorization server.
pub const OAUTH_AUTHORIZE: &str = "https://auth.calendly.com/oauth/authorize";
pub const OAUTH_TOKEN: &str = "https://auth.calendly.com/oauth/token";
pub const OAUTH_REVOKE: &str = "https://auth.calendly.com/oauth/revoke";
pub const OAUTH_INTROSPECT: &str = "https://auth.calendly.com/oauth/introspect";

/// Returns the URL of a single resource under `collection`.
///
/// Calendly hands out resource references as absolute URIs
/// (`https://api.calendly.com/scheduled_events/ABC`); those are used as-is.
/// Anything else is treated as a bare UUID and appended to `collection`.
pub fn resource_url(collection: &str, id_or_uri: &str) -> String {
    match Url::parse(id_or_uri) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => id_or_uri.to_string(),
        _ => format!("{}/{}", collection.trim_end_matches('/'), id_or_uri),
    }
}

/// `/scheduled_events/{uuid}/invitees`
pub fn event_invitees(event: &str) -> String {
    format!("{}/invitees", resource_url(SCHEDULED_EVENTS, event))
}

/// `/scheduled_events/{event_uuid}/invitees/{invitee_uuid}`
pub fn event_invitee(event: &str, invitee_uuid: &str) -> String {
    format!("{}/{}", event_invitees(event), invitee_uuid)
}
