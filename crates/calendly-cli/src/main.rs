//! calendly CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;

use calendly_cli::cli::{Cli, Command, ConfigAction, OAuthAction, WebhookAction};
use calendly_cli::commands::{self, account, events, oauth, webhooks};
use calendly_cli::config::ClientConfig;
use calendly_cli::error::CliResult;
use calendly_cli::logging::{LogFormat, TracingConfig, init_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if cli.log_json {
        tracing_config = tracing_config.with_format(LogFormat::Json);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    // `config path` must work even when the file is missing or broken.
    if let Command::Config {
        action: ConfigAction::Path,
    } = cli.command
    {
        let output = commands::config::path(cli.config.as_deref())?;
        return commands::write_json(std::io::stdout().lock(), &output);
    }

    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };

    let output = dispatch(&cli, &config)?;
    commands::write_json(std::io::stdout().lock(), &output)
}

fn dispatch(cli: &Cli, config: &ClientConfig) -> CliResult<Value> {
    let token = cli.token.as_deref();

    match cli.command {
        Command::Me => account::me(&commands::connect(config, token)?),
        Command::EventTypes { ref user, all } => {
            events::event_types(&commands::connect(config, token)?, user.clone(), all)
        }
        Command::Events {
            ref user,
            status,
            all,
        } => events::events(
            &commands::connect(config, token)?,
            user.clone(),
            status.map(Into::into),
            all,
        ),
        Command::Event { ref event } => events::event(&commands::connect(config, token)?, event),
        Command::Invitees { ref event, all } => {
            events::invitees(&commands::connect(config, token)?, event, all)
        }
        Command::SchedulingUrl {
            ref event,
            ref user,
        } => events::scheduling_url(&commands::connect(config, token)?, event, user.clone()),
        Command::Webhooks { ref action } => {
            let client = commands::connect(config, token)?;
            match action {
                WebhookAction::List {
                    organization,
                    scope,
                    user,
                } => webhooks::list(&client, organization, (*scope).into(), user.clone()),
                WebhookAction::Get { webhook } => webhooks::get(&client, webhook),
                WebhookAction::Create {
                    url,
                    organization,
                    scope,
                    user,
                    events,
                    signing_key,
                } => webhooks::create(
                    &client,
                    webhooks::CreateArgs {
                        url: url.clone(),
                        organization: organization.clone(),
                        scope: (*scope).into(),
                        user: user.clone(),
                        events: events.clone(),
                        signing_key: signing_key.clone(),
                    },
                ),
                WebhookAction::Delete { webhook } => webhooks::delete(&client, webhook),
            }
        }
        Command::Oauth { ref action } => {
            let helper = oauth::connect(config)?;
            match action {
                OAuthAction::Url => oauth::url(&helper),
                OAuthAction::Exchange { code } => oauth::exchange(&helper, code),
                OAuthAction::Refresh { refresh_token } => oauth::refresh(&helper, refresh_token),
                OAuthAction::Revoke { token } => oauth::revoke(&helper, token),
                OAuthAction::Introspect { token } => oauth::introspect(&helper, token),
            }
        }
        Command::Config { ref action } => match action {
            ConfigAction::Dump => commands::config::dump(config),
            ConfigAction::Path => commands::config::path(cli.config.as_deref()),
        },
    }
}
