//! # Resolve Subcommand
//!
//! Prints one user's access view from a snapshot file, either as JSON for
//! tooling or as an indented table for people.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use rangeops_access::{AccessResolver, AccessView, ResolverConfig};
use rangeops_core::UserId;

use crate::snapshot::load_snapshot;

/// Arguments for `rangeops resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Snapshot file (JSON or YAML).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// User whose view to resolve.
    #[arg(long)]
    pub user: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// How `resolve` renders the view.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// The full view, including diagnostics, as pretty JSON.
    Json,
    /// One line per organization, indented by depth.
    Table,
}

/// Run `rangeops resolve`.
///
/// Returns exit code 0 on success. Data anomalies do not change the exit
/// code; use `rangeops check --strict` for that.
pub fn run_resolve(args: &ResolveArgs, config: &ResolverConfig) -> Result<u8> {
    let user = UserId::parse(&args.user)
        .with_context(|| format!("invalid user id: {}", args.user))?;
    let source = load_snapshot(&args.snapshot)?;

    let view = AccessResolver::new(config.clone())
        .resolve_for_user(&source, &user)
        .with_context(|| format!("failed to resolve access for user {user}"))?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&view).context("failed to serialize view")?;
            println!("{json}");
        }
        OutputFormat::Table => print!("{}", render_table(&view, &config.breadcrumb_separator)),
    }
    Ok(0)
}

/// Render `view` as plain text.
///
/// Each row is indented two spaces per depth level and tagged with the
/// effective role. Full-permission rows are starred; inherited grants and
/// context-only rows are labelled. Diagnostics follow the rows.
pub fn render_table(view: &AccessView, separator: &str) -> String {
    let mut out = String::new();
    if view.is_empty() {
        out.push_str("no visible organizations\n");
    }
    for org in &view.organizations {
        let marker = if org.has_full_permission { '*' } else { ' ' };
        let mut tags = Vec::new();
        if org.inherited {
            tags.push("inherited");
        }
        if org.is_context_only {
            tags.push("context");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        let _ = writeln!(
            out,
            "{marker} {indent}{name} ({id}, {role}, {children} children){tags}  {path}",
            indent = "  ".repeat(org.depth),
            name = org.name,
            id = org.id,
            role = org.role,
            children = org.child_count,
            path = org.breadcrumb_label(separator),
        );
    }
    if !view.diagnostics.is_empty() {
        out.push('\n');
        for anomaly in &view.diagnostics {
            let _ = writeln!(out, "{}: {}", anomaly.severity(), anomaly);
        }
    }
    out
}
