//! Bookstand CLI - drive the storefront and back-office from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in to the storefront (password from BOOKSTAND_PASSWORD or --password)
//! bookstand login reader
//!
//! # Browse and buy
//! bookstand books search --query 编程
//! bookstand cart add 5 --quantity 2
//! bookstand cart checkout
//!
//! # Back-office
//! bookstand login admin --app admin
//! bookstand books low-stock
//! bookstand orders cancel 9
//!
//! # Check what the route guard would do
//! bookstand navigate admin /home/book-manage
//! ```
//!
//! The login is persisted to a session file between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

use commands::{App, Context};
use config::CliConfig;

#[derive(Parser)]
#[command(name = "bookstand")]
#[command(author, version, about = "Bookstand storefront and back-office client")]
struct Cli {
    /// Backend base URL (overrides `BOOKSTAND_API_BASE_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides `BOOKSTAND_SESSION_FILE`)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        username: String,

        #[arg(long, env = "BOOKSTAND_PASSWORD", hide_env_values = true)]
        password: String,

        /// Which application to log in to (admin requires the admin role)
        #[arg(long, value_enum, default_value_t = App::Storefront)]
        app: App,
    },
    /// Clear the persisted session
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Create a storefront account
    Register {
        username: String,

        email: bookstand_core::Email,

        #[arg(long, env = "BOOKSTAND_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Browse and manage books
    Books {
        #[command(subcommand)]
        action: commands::books::BooksAction,
    },
    /// List book categories
    Categories,
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Place and manage orders
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrdersAction,
    },
    /// Manage user accounts and profiles
    Users {
        #[command(subcommand)]
        action: commands::users::UsersAction,
    },
    /// Manage shipping addresses
    Addresses {
        #[command(subcommand)]
        action: commands::addresses::AddressesAction,
    },
    /// Run the navigation guard for a path
    Navigate {
        #[arg(value_enum)]
        app: App,

        path: String,
    },
}

fn init_sentry(config: &CliConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.api_url.as_deref(), cli.session_file.clone()) {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bookstand=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::new(config)?;

    match command {
        Commands::Login {
            username,
            password,
            app,
        } => commands::auth::login(&ctx, &username, password.into(), app).await?,
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Whoami => commands::auth::whoami(&ctx).await?,
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(&ctx, username, email, password.into()).await?,
        Commands::Books { action } => commands::books::run(&ctx, action).await?,
        Commands::Categories => commands::books::categories(&ctx).await?,
        Commands::Cart { action } => commands::cart::run(&ctx, action).await?,
        Commands::Orders { action } => commands::orders::run(&ctx, action).await?,
        Commands::Users { action } => commands::users::run(&ctx, action).await?,
        Commands::Addresses { action } => commands::addresses::run(&ctx, action).await?,
        Commands::Navigate { app, path } => commands::navigate::run(&ctx, app, &path)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_nested_command() {
        let cli = Cli::try_parse_from([
            "bookstand",
            "--api-url",
            "http://127.0.0.1:9000/api",
            "orders",
            "cancel",
            "9",
        ]);
        assert!(cli.is_ok());
    }
}
