//! # Ward
//!
//! Client side of the Ward case lifecycle: the REST client, the driver that
//! runs a transition end to end, configuration, the acting-identity session
//! and the CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    apps/ward (THE BINARY)                 │
//! │                                                           │
//! │  ┌───────────┐    ┌────────────┐    ┌─────────────────┐   │
//! │  │   CLI     │───►│   driver   │───►│  WardClient     │───┼──► Ward REST backend
//! │  │  (clap)   │    │  (tokio)   │    │  (reqwest)      │   │
//! │  └───────────┘    └─────┬──────┘    └─────────────────┘   │
//! │                         ▼                                 │
//! │                 ┌───────────────┐                         │
//! │                 │   ward-core   │                         │
//! │                 │  (THE LOGIC)  │                         │
//! │                 └───────────────┘                         │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod session;

pub use client::{CaseBackend, ClientError, WardClient};
pub use config::WardConfig;
pub use driver::{AdvanceOutcome, Confirm};
pub use error::AppError;
pub use session::{IdentitySource, Session};
