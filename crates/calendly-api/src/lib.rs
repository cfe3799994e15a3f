//! Blocking client for the Calendly API v2 and its OAuth2 endpoints.
//!
//! This crate provides:
//!
//! - [`CalendlyClient`] - One method per API resource (webhooks, users,
//!   event types, scheduled events, invitees) plus pagination helpers
//! - [`CalendlyOAuth2`] - Authorization URL, token exchange, refresh,
//!   revocation and introspection
//! - [`CalendlyError`] - Normalized errors for HTTP and local failures
//! - [`HttpTransport`] - The seam between request logic and the network
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐
//! │  CalendlyClient  │    │  CalendlyOAuth2  │
//! └────────┬─────────┘    └────────┬─────────┘
//!          │  params / pagination  │
//!          └──────────┬────────────┘
//!                     ▼
//!              ┌─────────────┐
//!              │  Requester  │  auth headers, status > 308 → CalendlyError
//!              └──────┬──────┘
//!                     ▼
//!           ┌───────────────────┐
//!           │  HttpTransport    │  ReqwestTransport (blocking)
//!           └───────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use calendly_api::CalendlyClient;
//!
//! let client = CalendlyClient::new("personal-access-token")?;
//! let me = client.about()?;
//! let user = me["resource"]["uri"].as_str().unwrap_or_default();
//! for event_type in client.get_all_event_types(user)? {
//!     println!("{}", event_type["name"]);
//! }
//! # Ok::<(), calendly_api::CalendlyError>(())
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod oauth;
pub mod pagination;
pub mod params;
pub mod request;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use client::CalendlyClient;
pub use error::{ApiResult, CalendlyError, ErrorDomain, ErrorKind};
pub use oauth::{CalendlyOAuth2, OAuth2Config, TokenIntrospection, TokenResponse};
pub use pagination::{Page, Pages, Pagination, Record};
pub use params::{
    CreateSchedulingLink, CreateWebhook, EventStatus, ListEventInvitees, ListEventTypes,
    ListEvents, ListOrganizationMemberships, ListWebhooks, WebhookEvent, WebhookScope,
};
pub use request::{Credential, Requester};
pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport, TransportConfig,
};
