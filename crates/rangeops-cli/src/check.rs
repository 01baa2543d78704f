//! # Check Subcommand
//!
//! Audits a snapshot file without resolving any particular user: duplicate
//! ids, dangling parents, parent cycles, the nesting-depth limit, and
//! memberships that name organizations missing from the snapshot.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use rangeops_access::{Anomaly, OrgIndex, ResolverConfig, Severity, Snapshot};

use crate::snapshot::load_snapshot;

/// Arguments for `rangeops check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Snapshot file (JSON or YAML).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Exit with code 2 if any error-severity anomaly is found.
    #[arg(long)]
    pub strict: bool,
}

/// Run `rangeops check`.
///
/// Returns 0 when the snapshot is clean or only warnings were found, and 2
/// under `--strict` when at least one error-severity anomaly was found.
pub fn run_check(args: &CheckArgs, config: &ResolverConfig) -> Result<u8> {
    let source = load_snapshot(&args.snapshot)?;
    let anomalies = audit_snapshot(source.snapshot(), config);

    for anomaly in &anomalies {
        println!("{}[{}]: {}", anomaly.severity(), anomaly.code(), anomaly);
    }

    let errors = anomalies
        .iter()
        .filter(|a| a.severity() == Severity::Error)
        .count();
    let warnings = anomalies.len() - errors;
    println!(
        "{}: {} organizations, {} users, {errors} errors, {warnings} warnings",
        args.snapshot.display(),
        source.snapshot().organizations.len(),
        source.snapshot().memberships.len(),
    );

    if args.strict && errors > 0 {
        return Ok(2);
    }
    Ok(0)
}

/// Every structural anomaly in `snapshot`, sorted and de-duplicated.
pub fn audit_snapshot(snapshot: &Snapshot, config: &ResolverConfig) -> Vec<Anomaly> {
    let index = OrgIndex::build(snapshot.organizations.iter().cloned());
    let mut anomalies = index.audit(config);

    for membership in snapshot.memberships.values().flatten() {
        if !index.contains(&membership.org_id) {
            anomalies.push(Anomaly::UnknownOrganization {
                id: membership.org_id.clone(),
            });
        }
    }
    anomalies.sort();
    anomalies.dedup();
    anomalies
}
