//! # Ward - Disruption Case Lifecycle Client
//!
//! Command-line front end for advancing disruption cases through their
//! lifecycle against the Ward REST backend.
//!
//! ## Usage
//!
//! ```bash
//! # Inspect a case and the step on offer
//! ward show 65f1c0ffee
//!
//! # Advance it (asks for confirmation)
//! ward advance 65f1c0ffee --reason "Carrier confirmed reroute"
//!
//! # Hand it to someone else
//! ward assign 65f1c0ffee ops-lead@example.com
//! ```
//!
//! ## Logging
//!
//! Logs go to stderr. `RUST_LOG` overrides the default filter and
//! `WARD_LOG_FORMAT=json` switches to machine-parseable output.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ward::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let log_format = std::env::var("WARD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ward=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    // User-facing failures are printed regardless of the log filter.
    if let Err(e) = cli::execute(cli).await {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
