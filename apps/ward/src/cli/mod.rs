//! # Ward CLI Module
//!
//! This module implements the CLI interface for Ward.
//!
//! ## Available Commands
//!
//! - `show` - Show a case, its decision owner and the transition on offer
//! - `advance` - Advance a case to its next status (asks for confirmation)
//! - `assign` - Assign the decision owner of a case
//! - `whoami` - Show the identity commands act as
//! - `transitions` - Print the lifecycle transition table

mod commands;

use crate::client::WardClient;
use crate::config::WardConfig;
use crate::error::AppError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Ward - disruption case lifecycle client
///
/// Moves cases through REPORTED → CLARIFIED → DECISION_REQUIRED → DECIDED →
/// IN_PROGRESS → RESOLVED on behalf of their decision owner.
#[derive(Parser, Debug)]
#[command(name = "ward")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show timeline and derived fields
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: ./ward.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8000/api
    #[arg(short = 'U', long, global = true)]
    pub url: Option<String>,

    /// Bearer token for the backend
    #[arg(short = 'T', long, global = true)]
    pub token: Option<String>,

    /// Act as this identity instead of the token's
    #[arg(short = 'I', long, global = true)]
    pub identity: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a case and the transition available to you
    Show {
        /// Case identifier
        case_id: String,
    },

    /// Advance a case to its next status
    Advance {
        /// Case identifier
        case_id: String,

        /// Reason recorded with the transition
        #[arg(short, long)]
        reason: Option<String>,

        /// Skip the interactive confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Assign the decision owner of a case
    Assign {
        /// Case identifier
        case_id: String,

        /// Email of the new decision owner
        owner_email: String,
    },

    /// Show the identity commands act as
    Whoami,

    /// Print the lifecycle transition table
    Transitions,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Output switches shared by all commands.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub json: bool,
    pub verbose: bool,
    pub quiet: bool,
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let output = OutputMode {
        json: cli.json_mode,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    if let Commands::Transitions = cli.command {
        return cmd_transitions(output);
    }

    let config = WardConfig::load(cli.config.as_deref())?
        .with_env()
        .with_overrides(cli.url, cli.token, cli.identity);
    let client = WardClient::new(config.base_url(), config.token.clone())?;
    tracing::debug!(base_url = client.base_url(), "backend configured");

    match cli.command {
        Commands::Show { case_id } => cmd_show(&client, &config, output, &case_id).await,
        Commands::Advance {
            case_id,
            reason,
            yes,
        } => cmd_advance(&client, &config, output, &case_id, reason, yes).await,
        Commands::Assign {
            case_id,
            owner_email,
        } => cmd_assign(&client, &config, output, &case_id, &owner_email).await,
        Commands::Whoami => cmd_whoami(&client, &config, output).await,
        Commands::Transitions => cmd_transitions(output),
    }
}
