//! Command-line interface definition.

use std::path::PathBuf;

use calendly_api::{EventStatus, WebhookScope};
use clap::{Parser, Subcommand, ValueEnum};

/// calendly - Query and manage a Calendly account from the terminal
#[derive(Debug, Parser)]
#[command(name = "calendly")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALENDLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Access token (overrides `token` in config.toml)
    #[arg(long, env = "CALENDLY_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the authenticated user
    Me,

    /// List event types
    EventTypes {
        /// User URI (defaults to the authenticated user)
        #[arg(long)]
        user: Option<String>,

        /// Follow pagination and print every event type
        #[arg(long)]
        all: bool,
    },

    /// List scheduled events
    Events {
        /// User URI (defaults to the authenticated user)
        #[arg(long)]
        user: Option<String>,

        /// Only events with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Follow pagination and print every event
        #[arg(long)]
        all: bool,
    },

    /// Show a scheduled event
    Event {
        /// Event UUID or URI
        event: String,
    },

    /// List the invitees of a scheduled event
    Invitees {
        /// Event UUID or URI
        event: String,

        /// Follow pagination and print every invitee
        #[arg(long)]
        all: bool,
    },

    /// Print the scheduling URL of a scheduled event's event type
    SchedulingUrl {
        /// Event UUID or URI
        event: String,

        /// User URI owning the event type (defaults to the authenticated user)
        #[arg(long)]
        user: Option<String>,
    },

    /// Webhook subscription commands
    Webhooks {
        #[command(subcommand)]
        action: WebhookAction,
    },

    /// OAuth2 token commands
    Oauth {
        #[command(subcommand)]
        action: OAuthAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Webhook subscription actions.
#[derive(Debug, Subcommand)]
pub enum WebhookAction {
    /// List webhook subscriptions
    List {
        /// Organization URI
        #[arg(long)]
        organization: String,

        #[arg(long, value_enum, default_value_t = ScopeArg::Organization)]
        scope: ScopeArg,

        /// User URI (required with --scope user)
        #[arg(long)]
        user: Option<String>,
    },

    /// Show a webhook subscription
    Get {
        /// Webhook UUID or URI
        webhook: String,
    },

    /// Create a webhook subscription
    Create {
        /// Callback URL
        #[arg(long)]
        url: String,

        /// Organization URI
        #[arg(long)]
        organization: String,

        #[arg(long, value_enum, default_value_t = ScopeArg::Organization)]
        scope: ScopeArg,

        /// User URI (required with --scope user)
        #[arg(long)]
        user: Option<String>,

        /// Event to subscribe to (can be repeated; defaults to both invitee events)
        #[arg(long = "event", action = clap::ArgAction::Append)]
        events: Vec<String>,

        /// Key used to sign webhook payloads
        #[arg(long)]
        signing_key: Option<String>,
    },

    /// Delete a webhook subscription
    Delete {
        /// Webhook UUID or URI
        webhook: String,
    },
}

/// OAuth2 actions. Credentials come from the `[oauth]` config section.
#[derive(Debug, Subcommand)]
pub enum OAuthAction {
    /// Print the authorization URL
    Url,

    /// Exchange an authorization code for tokens
    Exchange {
        code: String,
    },

    /// Obtain a new access token from a refresh token
    Refresh {
        refresh_token: String,
    },

    /// Revoke a token
    Revoke {
        token: String,
    },

    /// Show token metadata
    Introspect {
        token: String,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration, with literal secrets masked
    Dump,

    /// Show configuration file path
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    Organization,
    User,
}

impl From<ScopeArg> for WebhookScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Organization => WebhookScope::Organization,
            ScopeArg::User => WebhookScope::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Active,
    Canceled,
}

impl From<StatusArg> for EventStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Active => EventStatus::Active,
            StatusArg::Canceled => EventStatus::Canceled,
        }
    }
}
