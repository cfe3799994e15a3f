//! Calendly API v2 resource client.
//!
//! [`CalendlyClient`] exposes one method per API resource. Each method
//! returns the decoded JSON body untouched; the aggregation helpers
//! ([`CalendlyClient::get_all_event_types`],
//! [`CalendlyClient::resolve_scheduling_url`], ...) are built on
//! [`crate::pagination`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::endpoints::{self, resource_url};
use crate::error::{ApiResult, CalendlyError};
use crate::pagination::{self, Page, Record};
use crate::params::{
    COLLECT_ALL_COUNT, CreateSchedulingLink, CreateWebhook, DeleteInviteeData, ListEventInvitees,
    ListEventTypes, ListEvents, ListOrganizationMemberships, ListWebhooks,
};
use crate::request::{Credential, Requester};
use crate::transport::{HttpResponse, HttpTransport, Method, TransportConfig};

/// Client for the Calendly REST API.
#[derive(Debug, Clone)]
pub struct CalendlyClient {
    requester: Requester,
}

impl CalendlyClient {
    /// Creates a client authenticated with a personal access token (or an
    /// OAuth2 access token), using default transport settings.
    pub fn new(token: impl Into<String>) -> ApiResult<Self> {
        Self::with_config(Credential::bearer(token), &TransportConfig::default())
    }

    /// Creates a client with an explicit credential and transport settings.
    pub fn with_config(credential: Credential, config: &TransportConfig) -> ApiResult<Self> {
        Ok(Self {
            requester: Requester::with_config(config, Some(credential))?,
        })
    }

    /// Creates a client over a custom transport.
    pub fn with_transport(credential: Option<Credential>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            requester: Requester::new(transport, credential),
        }
    }

    /// Returns the underlying requester, for raw calls.
    pub fn requester(&self) -> &Requester {
        &self.requester
    }

    // ---------------------------------------------------------------------
    // Webhook subscriptions
    // ---------------------------------------------------------------------

    /// Creates a webhook subscription.
    ///
    /// # Errors
    ///
    /// Fails with a validation error, before any request, when the scope is
    /// `user` and no user is set.
    pub fn create_webhook(&self, params: &CreateWebhook) -> ApiResult<Value> {
        params.validate()?;
        self.requester
            .post(endpoints::WEBHOOK_SUBSCRIPTIONS, Some(to_payload(params)?))
    }

    /// Lists webhook subscriptions for an organization or user.
    ///
    /// # Errors
    ///
    /// Fails with a validation error, before any request, when the scope is
    /// `user` and no user is set.
    pub fn list_webhooks(&self, params: &ListWebhooks) -> ApiResult<Value> {
        params.validate()?;
        self.requester
            .get(endpoints::WEBHOOK_SUBSCRIPTIONS, Some(to_payload(params)?))
    }

    /// Returns a single webhook subscription.
    pub fn get_webhook(&self, uuid: &str) -> ApiResult<Value> {
        self.requester
            .get(&resource_url(endpoints::WEBHOOK_SUBSCRIPTIONS, uuid), None)
    }

    /// Deletes a webhook subscription.
    ///
    /// Returns `{"success": <status == 200>}` merged with whatever JSON object
    /// the service sent back. Empty or non-JSON bodies are tolerated.
    pub fn delete_webhook(&self, uuid: &str) -> ApiResult<Map<String, Value>> {
        let response = self
            .requester
            .delete(&resource_url(endpoints::WEBHOOK_SUBSCRIPTIONS, uuid), None)?;
        Ok(status_flagged(&response))
    }

    // ---------------------------------------------------------------------
    // Users and organizations
    // ---------------------------------------------------------------------

    /// Returns basic information about the authenticated user.
    pub fn about(&self) -> ApiResult<Value> {
        self.requester.get(endpoints::ME, None)
    }

    /// Returns a user by UUID or URI.
    pub fn get_user(&self, uuid: &str) -> ApiResult<Value> {
        self.requester.get(&resource_url(endpoints::USERS, uuid), None)
    }

    /// Returns an organization by UUID or URI.
    pub fn get_organization(&self, uuid: &str) -> ApiResult<Value> {
        self.requester
            .get(&resource_url(endpoints::ORGANIZATIONS, uuid), None)
    }

    /// Lists organization memberships.
    pub fn list_organization_memberships(
        &self,
        params: &ListOrganizationMemberships,
    ) -> ApiResult<Value> {
        self.requester
            .get(endpoints::ORGANIZATION_MEMBERSHIPS, Some(to_payload(params)?))
    }

    // ---------------------------------------------------------------------
    // Event types
    // ---------------------------------------------------------------------

    /// Lists event types.
    pub fn list_event_types(&self, params: &ListEventTypes) -> ApiResult<Value> {
        self.requester
            .get(endpoints::EVENT_TYPES, Some(to_payload(params)?))
    }

    /// Returns a single event type by UUID or URI.
    pub fn get_event_type(&self, uuid: &str) -> ApiResult<Value> {
        self.requester
            .get(&resource_url(endpoints::EVENT_TYPES, uuid), None)
    }

    /// Creates a scheduling link for an event type.
    pub fn create_scheduling_link(&self, params: &CreateSchedulingLink) -> ApiResult<Value> {
        self.requester
            .post(endpoints::SCHEDULING_LINKS, Some(to_payload(params)?))
    }

    // ---------------------------------------------------------------------
    // Scheduled events and invitees
    // ---------------------------------------------------------------------

    /// Lists scheduled events.
    pub fn list_events(&self, params: &ListEvents) -> ApiResult<Value> {
        self.requester
            .get(endpoints::SCHEDULED_EVENTS, Some(to_payload(params)?))
    }

    /// Returns a scheduled event by UUID or URI.
    pub fn get_event_details(&self, uuid: &str) -> ApiResult<Value> {
        self.requester
            .get(&resource_url(endpoints::SCHEDULED_EVENTS, uuid), None)
    }

    /// Lists the invitees of a scheduled event.
    pub fn list_event_invitees(&self, uuid: &str, params: &ListEventInvitees) -> ApiResult<Value> {
        self.requester
            .get(&endpoints::event_invitees(uuid), Some(to_payload(params)?))
    }

    /// Returns a single invitee of a scheduled event.
    pub fn get_event_invitee(&self, event_uuid: &str, invitee_uuid: &str) -> ApiResult<Value> {
        self.requester
            .get(&endpoints::event_invitee(event_uuid, invitee_uuid), None)
    }

    /// Requests deletion of all data for the given invitee emails.
    ///
    /// Returns the same status-flagged map as [`CalendlyClient::delete_webhook`].
    pub fn delete_invitee_data(&self, emails: &[String]) -> ApiResult<Map<String, Value>> {
        let payload = to_payload(&DeleteInviteeData {
            emails: emails.to_vec(),
        })?;
        let response = self.requester.send(
            Method::Post,
            endpoints::DATA_COMPLIANCE_INVITEES,
            Some(payload),
        )?;
        Ok(status_flagged(&response))
    }

    // ---------------------------------------------------------------------
    // Aggregation
    // ---------------------------------------------------------------------

    /// Returns every event type of `user_uri`, across all pages.
    pub fn get_all_event_types(&self, user_uri: &str) -> ApiResult<Vec<Record>> {
        let params = ListEventTypes::for_user(user_uri).with_count(COLLECT_ALL_COUNT);
        let first = Page::from_value(self.list_event_types(&params)?)?;
        pagination::collect_all(&self.requester, first)
    }

    /// Returns every scheduled event of `user_uri`, across all pages.
    pub fn get_all_scheduled_events(&self, user_uri: &str) -> ApiResult<Vec<Record>> {
        let params = ListEvents::for_user(user_uri).with_count(COLLECT_ALL_COUNT);
        let first = Page::from_value(self.list_events(&params)?)?;
        pagination::collect_all(&self.requester, first)
    }

    /// Returns every invitee of a scheduled event, across all pages.
    pub fn get_all_event_invitees(&self, event_uuid: &str) -> ApiResult<Vec<Record>> {
        let params = ListEventInvitees::default().with_count(COLLECT_ALL_COUNT);
        let first = Page::from_value(self.list_event_invitees(event_uuid, &params)?)?;
        pagination::collect_all(&self.requester, first)
    }

    /// Resolves a scheduled event to the public scheduling URL of its event type.
    ///
    /// Reads the event's `event_type` URI, then scans `user_uri`'s event
    /// types page by page and returns the first match's `scheduling_url`.
    /// Returns `None` once every page has been scanned without a match.
    pub fn resolve_scheduling_url(&self, event_uri: &str, user_uri: &str) -> ApiResult<Option<String>> {
        let details = self.get_event_details(event_uri)?;
        let event_type_uri = details
            .pointer("/resource/event_type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CalendlyError::invalid_response("event details are missing resource.event_type")
            })?
            .to_string();

        debug!(event_type = %event_type_uri, "looking up scheduling url");
        let first = Page::from_value(self.list_event_types(&ListEventTypes::for_user(user_uri))?)?;

        let found = pagination::find_by_uri(&self.requester, first, &event_type_uri)?;
        let url = found.and_then(|record| {
            record
                .get("scheduling_url")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        match url {
            Some(ref url) => info!(scheduling_url = %url, "resolved scheduling url"),
            None => info!(event_type = %event_type_uri, "no event type matched"),
        }
        Ok(url)
    }
}

fn to_payload<T: Serialize>(params: &T) -> ApiResult<Value> {
    serde_json::to_value(params).map_err(|e| {
        CalendlyError::internal(format!("failed to serialize request: {}", e)).with_source(e)
    })
}

/// `{"success": status == 200}` overlaid with the response's JSON object, if any.
fn status_flagged(response: &HttpResponse) -> Map<String, Value> {
    let mut result = Map::new();
    result.insert("success".to_string(), Value::Bool(response.status == 200));
    result.extend(response.json_or_empty());
    result
}
