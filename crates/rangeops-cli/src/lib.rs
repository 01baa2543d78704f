//! # rangeops-cli — Command-Line Interface
//!
//! Provides the `rangeops` binary for working with organization snapshots
//! outside the mobile client.
//!
//! ## Subcommands
//!
//! - `rangeops resolve`: print one user's access view.
//! - `rangeops check`: audit a snapshot for structural anomalies.
//!
//! ```bash
//! rangeops resolve --snapshot org.yaml --user 6f1c1f7e-2f0a-4c59-9d1e-3b2f0a9c7d11
//! rangeops -v check --snapshot org.json --strict
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; resolution logic lives in `rangeops-access`.
//! - Diagnostics go to stderr through `tracing`; results go to stdout.

pub mod check;
pub mod config;
pub mod resolve;
pub mod snapshot;
