//! Snapshot file loading.
//!
//! `.json` files are decoded as JSON; everything else as YAML.

use std::path::Path;

use anyhow::{Context, Result};

use rangeops_access::{Snapshot, SnapshotSource};

/// Load a snapshot file into an in-memory source.
pub fn load_snapshot(path: &Path) -> Result<SnapshotSource> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let snapshot: Snapshot = if is_json {
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON snapshot: {}", path.display()))?
    } else {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse YAML snapshot: {}", path.display()))?
    };

    tracing::debug!(
        path = %path.display(),
        organizations = snapshot.organizations.len(),
        users = snapshot.memberships.len(),
        "snapshot loaded"
    );
    Ok(SnapshotSource::new(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
organizations:
  - id: hq
    name: HQ
    org_type: range
    created_at: "2025-01-01T00:00:00Z"
  - id: alpha
    name: Alpha
    org_type: team
    parent_id: hq
    created_at: "2025-01-02T00:00:00+00:00"
memberships:
  6f1c1f7e-2f0a-4c59-9d1e-3b2f0a9c7d11:
    - org_id: alpha
      role: commander
"#;

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.yaml");
        std::fs::write(&path, YAML).unwrap();

        let source = load_snapshot(&path).unwrap();
        assert_eq!(source.snapshot().organizations.len(), 2);
        assert_eq!(source.users().count(), 1);
    }

    #[test]
    fn loads_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.JSON");
        std::fs::write(
            &path,
            r#"{"organizations": [{"id": "hq", "name": "HQ", "org_type": "range", "created_at": "2025-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();

        let source = load_snapshot(&path).unwrap();
        assert_eq!(source.snapshot().organizations.len(), 1);
        assert!(source.snapshot().memberships.is_empty());
    }

    #[test]
    fn invalid_role_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.yaml");
        std::fs::write(&path, YAML.replace("commander", "general")).unwrap();
        let err = load_snapshot(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse YAML snapshot"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_snapshot(&dir.path().join("nope.json")).is_err());
    }
}
