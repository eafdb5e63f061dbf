// ABOUTME: Backup bundle layout and the metadata document written next to it.
// ABOUTME: Bundle files share a base path and differ only by suffix.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const COMPOSE_SUFFIX: &str = "_compose.yml";
pub const ENV_SUFFIX: &str = "_env";
pub const STATE_SUFFIX: &str = "_state.json";
pub const METADATA_SUFFIX: &str = "_metadata.json";

pub const BUNDLE_SUFFIXES: [&str; 4] = [COMPOSE_SUFFIX, ENV_SUFFIX, STATE_SUFFIX, METADATA_SUFFIX];

/// `<base><suffix>` without treating the suffix as an extension.
pub fn bundle_file(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

/// Contents of `<name>_metadata.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BackupMetadata {
    pub name: String,
    pub timestamp: DateTime<Local>,
    pub environment: String,
    pub compose_file: PathBuf,
    #[serde(default)]
    pub env_file: Option<PathBuf>,
    #[serde(default)]
    pub hostname: Option<String>,
    /// Bundle files actually written, relative to the destination.
    #[serde(default)]
    pub files: Vec<String>,
}

/// A bundle found on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupEntry {
    /// Base path to hand to `rollback` / `verify`.
    pub path: PathBuf,
    #[serde(flatten)]
    pub metadata: BackupMetadata,
}

/// Result of `verify`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackupValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_appended_verbatim() {
        let base = Path::new("./backups/pre_deploy");
        assert_eq!(
            bundle_file(base, COMPOSE_SUFFIX),
            PathBuf::from("./backups/pre_deploy_compose.yml")
        );
        let dotted = Path::new("/b/release.v2");
        assert_eq!(bundle_file(dotted, ENV_SUFFIX), PathBuf::from("/b/release.v2_env"));
    }

    #[test]
    fn metadata_tolerates_missing_optional_fields() {
        let meta: BackupMetadata = serde_json::from_str(
            r#"{"name":"b1","timestamp":"2026-01-02T03:04:05+00:00","environment":"dev","compose_file":"docker-compose.yml"}"#,
        )
        .unwrap();
        assert_eq!(meta.name, "b1");
        assert!(meta.env_file.is_none());
        assert!(meta.files.is_empty());
    }
}
