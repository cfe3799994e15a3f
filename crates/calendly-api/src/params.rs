//! Request payloads for resource endpoints.
//!
//! Every struct serializes to exactly the JSON the endpoint expects. Unset
//! optional fields are skipped, never sent as `null`.

use serde::{Deserialize, Serialize};

use crate::error::{ApiResult, CalendlyError};

/// Default number of rows per listing request.
pub const DEFAULT_COUNT: u32 = 20;

/// Rows per request when collecting every page.
pub const COLLECT_ALL_COUNT: u32 = 100;

/// Default sort order for invitee listings.
pub const DEFAULT_INVITEE_SORT: &str = "created_at:asc";

/// Webhook events Calendly can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    /// An invitee canceled a scheduled event.
    #[serde(rename = "invitee.canceled")]
    InviteeCanceled,
    /// An invitee scheduled an event.
    #[serde(rename = "invitee.created")]
    InviteeCreated,
}

impl WebhookEvent {
    /// Returns the wire name, e.g. `invitee.created`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InviteeCanceled => "invitee.canceled",
            Self::InviteeCreated => "invitee.created",
        }
    }

    /// Parses a short (`created`) or full (`invitee.created`) event name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "canceled" | "invitee.canceled" => Some(Self::InviteeCanceled),
            "created" | "invitee.created" => Some(Self::InviteeCreated),
            _ => None,
        }
    }
}

/// Events subscribed to when none are given.
pub const DEFAULT_WEBHOOK_EVENTS: &[WebhookEvent] =
    &[WebhookEvent::InviteeCanceled, WebhookEvent::InviteeCreated];

/// Webhook subscription scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookScope {
    /// Events for the whole organization.
    Organization,
    /// Events for a single user; requires `user`.
    User,
}

/// Ensures a user reference is present for user-scoped webhooks.
fn require_user(scope: WebhookScope, user: Option<&str>) -> ApiResult<()> {
    if scope == WebhookScope::User && user.is_none() {
        return Err(CalendlyError::validation(
            "a user reference is required when the webhook scope is \"user\"",
        ));
    }
    Ok(())
}

/// Payload for `POST /webhook_subscriptions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWebhook {
    pub url: String,
    pub events: Vec<WebhookEvent>,
    pub organization: String,
    pub scope: WebhookScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl CreateWebhook {
    /// Creates a subscription request for the default events.
    pub fn new(url: impl Into<String>, scope: WebhookScope, organization: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events: DEFAULT_WEBHOOK_EVENTS.to_vec(),
            organization: organization.into(),
            scope,
            signing_key: None,
            user: None,
        }
    }

    /// Sets the events to subscribe to.
    pub fn with_events(mut self, events: impl IntoIterator<Item = WebhookEvent>) -> Self {
        self.events = events.into_iter().collect();
        self
    }

    /// Sets the key used to sign webhook deliveries.
    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(key.into());
        self
    }

    /// Sets the user reference (required for [`WebhookScope::User`]).
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Checks the scope/user combination.
    pub fn validate(&self) -> ApiResult<()> {
        require_user(self.scope, self.user.as_deref())
    }
}

/// Payload for `GET /webhook_subscriptions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListWebhooks {
    pub organization: String,
    pub scope: WebhookScope,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ListWebhooks {
    pub fn new(organization: impl Into<String>, scope: WebhookScope) -> Self {
        Self {
            organization: organization.into(),
            scope,
            count: DEFAULT_COUNT,
            sort: None,
            user: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Sets the sort order, e.g. `created_at:desc`.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Checks the scope/user combination.
    pub fn validate(&self) -> ApiResult<()> {
        require_user(self.scope, self.user.as_deref())
    }
}

/// Payload for `GET /event_types`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEventTypes {
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Default for ListEventTypes {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            organization: None,
            page_token: None,
            sort: None,
            user: None,
        }
    }
}

impl ListEventTypes {
    /// Event types owned by `user`.
    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            ..Self::default()
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// Scheduled event status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Canceled,
}

/// Payload for `GET /scheduled_events`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEvents {
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

impl Default for ListEvents {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            organization: None,
            sort: None,
            user: None,
            status: None,
        }
    }
}

impl ListEvents {
    /// Scheduled events for `user`.
    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            ..Self::default()
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Payload for `GET /scheduled_events/{uuid}/invitees`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEventInvitees {
    pub count: u32,
    pub sort: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
}

impl Default for ListEventInvitees {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            sort: DEFAULT_INVITEE_SORT.to_string(),
            email: None,
            page_token: None,
            status: None,
        }
    }
}

impl ListEventInvitees {
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Payload for `GET /organization_memberships`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListOrganizationMemberships {
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Default for ListOrganizationMemberships {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            email: None,
            organization: None,
            page_token: None,
            user: None,
        }
    }
}

impl ListOrganizationMemberships {
    pub fn for_organization(organization: impl Into<String>) -> Self {
        Self {
            organization: Some(organization.into()),
            ..Self::default()
        }
    }

    pub fn for_user(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }
}

/// Payload for `POST /scheduling_links`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateSchedulingLink {
    pub max_event_count: u32,
    pub owner: String,
    pub owner_type: String,
}

impl CreateSchedulingLink {
    /// A single-use link for the event type at `event_type_uri`.
    pub fn single_use(event_type_uri: impl Into<String>) -> Self {
        Self {
            max_event_count: 1,
            owner: event_type_uri.into(),
            owner_type: "EventType".to_string(),
        }
    }
}

/// Payload for `POST /data_compliance/deletion/invitees`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteInviteeData {
    pub emails: Vec<String>,
}
