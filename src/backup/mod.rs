// ABOUTME: File-copy backups of the active environment and rollback from them.
// ABOUTME: Also lists, prunes by retention and verifies bundles in the destination directory.

mod error;
mod metadata;

pub use error::BackupError;
pub use metadata::{
    BUNDLE_SUFFIXES, BackupEntry, BackupMetadata, BackupValidation, COMPOSE_SUFFIX, ENV_SUFFIX,
    METADATA_SUFFIX, STATE_SUFFIX, bundle_file,
};

use crate::compose::{ComposeCommand, ComposeManager};
use crate::exec::Executor;
use crate::types::check_path;
use chrono::{Local, TimeDelta};
use error::{
    CopySnafu, CreateDirSnafu, DisabledSnafu, InvalidPathSnafu, MetadataSnafu, NoEnvFileTargetSnafu,
    ReadSnafu, RemoveSnafu, RestartSnafu, SetAsideSnafu, WriteSnafu,
};
use snafu::{OptionExt, ResultExt, ensure};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Creates and restores bundles for the manager's active environment.
pub struct BackupManager<'a, E> {
    manager: &'a ComposeManager<E>,
}

impl<'a, E: Executor> BackupManager<'a, E> {
    pub fn new(manager: &'a ComposeManager<E>) -> Self {
        Self { manager }
    }

    fn destination(&self) -> &Path {
        &self.manager.config().backup.destination
    }

    /// Create a bundle named `name` (default `backup_<timestamp>`) and return
    /// its base path `<destination>/<name>`.
    pub async fn create(&self, name: Option<&str>) -> Result<PathBuf, BackupError> {
        ensure!(self.manager.config().backup.enabled, DisabledSnafu);

        let now = Local::now();
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("backup_{}", now.format("%Y%m%d_%H%M%S")),
        };
        ensure!(
            !name.is_empty() && !name.contains('/') && check_path(Path::new(&name)).is_ok(),
            InvalidPathSnafu { path: &name }
        );

        let dest = self.destination();
        std::fs::create_dir_all(dest).context(CreateDirSnafu { path: dest })?;

        let base = dest.join(&name);
        let mut files = Vec::new();

        let compose_file = self.manager.compose_file();
        if compose_file.exists() {
            copy_into(compose_file, &base, COMPOSE_SUFFIX, &name, &mut files)?;
        }

        let env_file = self.manager.env_file();
        if let Some(env_file) = env_file
            && env_file.exists()
        {
            copy_into(env_file, &base, ENV_SUFFIX, &name, &mut files)?;
        }

        let state_path = bundle_file(&base, STATE_SUFFIX);
        let snapshot_cmd = ComposeCommand::new(compose_file, "ps")
            .arg("--format")
            .arg("json")
            .to_string();
        let state = match self
            .manager
            .executor()
            .run(&snapshot_cmd, &HashMap::new())
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Could not capture container state for backup: {}", e);
                String::new()
            }
        };
        std::fs::write(&state_path, state).context(WriteSnafu { path: &state_path })?;
        files.push(format!("{name}{STATE_SUFFIX}"));

        let metadata = BackupMetadata {
            name: name.clone(),
            timestamp: now,
            environment: self.manager.environment().to_string(),
            compose_file: compose_file.to_path_buf(),
            env_file: env_file.map(Path::to_path_buf),
            hostname: gethostname::gethostname().into_string().ok(),
            files,
        };
        let metadata_path = bundle_file(&base, METADATA_SUFFIX);
        let json = serde_json::to_string_pretty(&metadata).context(MetadataSnafu)?;
        std::fs::write(&metadata_path, json).context(WriteSnafu {
            path: &metadata_path,
        })?;

        tracing::info!("Backup created: {}", base.display());
        Ok(base)
    }

    /// Restore the compose and env files of the bundle at `base`, then
    /// restart services. Current files are kept as `<file>.failed`.
    ///
    /// Partially applied restores are not undone.
    pub async fn rollback(&self, base: &Path) -> Result<(), BackupError> {
        tracing::info!("Rolling back to: {}", base.display());

        let compose_backup = bundle_file(base, COMPOSE_SUFFIX);
        if compose_backup.exists() {
            restore(&compose_backup, self.manager.compose_file())?;
        }

        let env_backup = bundle_file(base, ENV_SUFFIX);
        if env_backup.exists() {
            let target = self.manager.env_file().context(NoEnvFileTargetSnafu)?;
            restore(&env_backup, target)?;
        }

        if let Err(e) = self.manager.stop(None).await {
            tracing::warn!("Stopping services during rollback failed: {}", e);
        }
        self.manager.start(None).await.context(RestartSnafu)?;

        tracing::info!("Rollback completed successfully");
        Ok(())
    }

    /// Bundles in the destination, newest first. Unreadable metadata is
    /// skipped.
    pub fn list(&self) -> Result<Vec<BackupEntry>, BackupError> {
        let dest = self.destination();
        if !dest.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(dest).context(ReadSnafu { path: dest })? {
            let entry = entry.context(ReadSnafu { path: dest })?;
            let file_name = entry.file_name();
            let Some(base_name) = file_name
                .to_str()
                .and_then(|n| n.strip_suffix(METADATA_SUFFIX))
            else {
                continue;
            };

            match read_metadata(&entry.path()) {
                Ok(metadata) => entries.push(BackupEntry {
                    path: dest.join(base_name),
                    metadata,
                }),
                Err(e) => tracing::debug!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        entries.sort_by(|a, b| b.metadata.timestamp.cmp(&a.metadata.timestamp));
        Ok(entries)
    }

    /// Delete bundles older than `backup.retention` days. Returns the number
    /// of files removed; a retention of 0 disables pruning.
    pub fn prune(&self) -> Result<usize, BackupError> {
        let retention = self.manager.config().backup.retention;
        if retention == 0 {
            tracing::info!("Backup retention is disabled");
            return Ok(0);
        }

        let Some(cutoff) = TimeDelta::try_days(i64::from(retention))
            .and_then(|age| Local::now().checked_sub_signed(age))
        else {
            return Ok(0);
        };
        let mut removed = 0;
        for entry in self.list()? {
            if entry.metadata.timestamp >= cutoff {
                continue;
            }
            for suffix in BUNDLE_SUFFIXES {
                let path = bundle_file(&entry.path, suffix);
                if path.exists() {
                    std::fs::remove_file(&path).context(RemoveSnafu { path: &path })?;
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            tracing::info!("Cleaned up {} old backup files", removed);
        }
        Ok(removed)
    }

    /// Check that the bundle at `base` can be restored.
    pub fn verify(&self, base: &Path) -> BackupValidation {
        let mut validation = BackupValidation {
            valid: true,
            ..Default::default()
        };

        for suffix in [COMPOSE_SUFFIX, METADATA_SUFFIX] {
            let path = bundle_file(base, suffix);
            if !path.exists() {
                validation.valid = false;
                validation
                    .errors
                    .push(format!("Missing required file: {}", path.display()));
            }
        }

        let metadata_path = bundle_file(base, METADATA_SUFFIX);
        if metadata_path.exists() {
            match read_metadata(&metadata_path) {
                Ok(metadata) if !metadata.compose_file.exists() => {
                    validation.warnings.push(format!(
                        "Compose file referenced in metadata not found: {}",
                        metadata.compose_file.display()
                    ));
                }
                Ok(_) => {}
                Err(_) => {
                    validation.valid = false;
                    validation.errors.push("Invalid metadata JSON".to_string());
                }
            }
        }

        validation
    }
}

fn copy_into(
    source: &Path,
    base: &Path,
    suffix: &str,
    name: &str,
    files: &mut Vec<String>,
) -> Result<(), BackupError> {
    let target = bundle_file(base, suffix);
    std::fs::copy(source, &target).context(CopySnafu {
        from: source,
        to: &target,
    })?;
    files.push(format!("{name}{suffix}"));
    Ok(())
}

fn restore(backup: &Path, target: &Path) -> Result<(), BackupError> {
    if target.exists() {
        let failed = bundle_file(target, ".failed");
        std::fs::rename(target, &failed).context(SetAsideSnafu { path: target })?;
    }
    std::fs::copy(backup, target).context(CopySnafu {
        from: backup,
        to: target,
    })?;
    Ok(())
}

fn read_metadata(path: &Path) -> Result<BackupMetadata, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}
