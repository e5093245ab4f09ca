//! Catalog client and validation engine for YAML entity descriptors.
//!
//! descry gates CI on a set of declarative YAML entity descriptors: each
//! file is checked against the remote catalog's blueprint schema (required
//! fields) and against the update-only policy (the entity must already
//! exist). Per-file failures are aggregated into one report; only
//! configuration and authentication failures abort a run.
//!
//! # Quick Start
//!
//! ```no_run
//! use descry_core::{CatalogConfig, Runner};
//!
//! # async fn example() -> descry_core::CatalogResult<()> {
//! let config = CatalogConfig::from_env();
//! let runner = Runner::new(&config)?;
//! let outcome = runner.run(&[]).await?;
//! if outcome.failed() {
//!     std::process::exit(1);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod descriptor;
pub mod discover;
pub mod error;
pub mod runner;

// Re-export main types
pub use auth::TokenManager;
pub use client::CatalogClient;
pub use config::CatalogConfig;
pub use descriptor::{Descriptor, DescriptorError};
pub use discover::{find_descriptor_files, Discovery};
pub use error::{CatalogError, CatalogResult};
pub use runner::{FileReport, Issue, IssueKind, RunOutcome, Runner};
