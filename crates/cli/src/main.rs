//! Facet CLI - run the marketplace checkout from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show totals for a cart file
//! facet totals --cart cart.json
//!
//! # Manage saved addresses
//! facet addresses list
//! facet addresses add -n "Jane Doe" -p 555-0100 -l "1 Gem St" -c Chicago
//! facet addresses delete 12
//!
//! # Check out a cart and place the order
//! facet checkout --cart cart.json --payment card
//! ```
//!
//! # Commands
//!
//! - `totals` - Price breakdown for a cart, no network access
//! - `addresses` - List, add and delete saved shipping addresses
//! - `checkout` - Walk the three checkout steps and place the order
//!
//! Everything except `totals` needs `FACET_API_BASE_URL` (see
//! `facet_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use facet_storefront::config::{ConfigError, LogFormat, StorefrontConfig};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod terminal;

#[derive(Parser)]
#[command(name = "facet")]
#[command(author, version, about = "Facet marketplace checkout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the price breakdown for a cart file
    Totals {
        /// Cart file (JSON array of cart lines)
        #[arg(short, long)]
        cart: PathBuf,
    },
    /// Manage saved shipping addresses
    Addresses {
        #[command(subcommand)]
        action: commands::addresses::AddressAction,
    },
    /// Check out a cart and place the order
    Checkout(commands::checkout::CheckoutArgs),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "facet_storefront=info,facet_cli=info".into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter));

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configuration is needed for Sentry and log format, but `totals` runs without it
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing(config.as_ref().map_or(LogFormat::default(), |c| c.log_format));

    if let Ok(config) = &config {
        tracing::debug!(api = ?config.api, "Configuration loaded");
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    cli: Cli,
    config: Result<StorefrontConfig, ConfigError>,
) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Totals { cart } => commands::totals::show(&cart).await?,
        Commands::Addresses { action } => commands::addresses::run(&config?, action).await?,
        Commands::Checkout(args) => commands::checkout::run(&config?, args).await?,
    }
    Ok(())
}
