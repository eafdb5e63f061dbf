// ABOUTME: Backup, rollback and backup maintenance commands.
// ABOUTME: Wraps BackupManager for the active environment.

use dcm::backup::BackupManager;
use dcm::compose::ComposeManager;
use dcm::error::{Error, Result};
use dcm::exec::Executor;
use dcm::output::{Output, OutputMode};
use std::path::Path;

pub async fn create<E: Executor>(
    manager: &ComposeManager<E>,
    name: Option<&str>,
    output: &Output,
) -> Result<()> {
    let path = BackupManager::new(manager).create(name).await?;
    output.success(&format!("Backup created: {}", path.display()));
    Ok(())
}

pub async fn rollback<E: Executor>(
    manager: &ComposeManager<E>,
    path: &Path,
    output: &Output,
) -> Result<()> {
    output.progress(&format!("🔄 Rolling back to: {}", path.display()));
    BackupManager::new(manager).rollback(path).await?;
    output.success("Rollback completed successfully");
    Ok(())
}

pub fn list<E: Executor>(manager: &ComposeManager<E>, output: &Output) -> Result<()> {
    let entries = BackupManager::new(manager).list()?;

    if output.mode() == OutputMode::Json {
        output.data("backups", &entries);
        return Ok(());
    }

    if entries.is_empty() {
        output.progress("No backups found");
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{}  {}  {}",
            entry.metadata.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.metadata.environment,
            entry.path.display()
        );
    }
    Ok(())
}

pub fn prune<E: Executor>(manager: &ComposeManager<E>, output: &Output) -> Result<()> {
    let removed = BackupManager::new(manager).prune()?;
    if removed > 0 {
        output.success(&format!("🧹 Cleaned up {removed} old backup files"));
    } else {
        output.success("No old backups to clean up");
    }
    Ok(())
}

pub fn verify<E: Executor>(manager: &ComposeManager<E>, path: &Path, output: &Output) -> Result<()> {
    let validation = BackupManager::new(manager).verify(path);

    if output.mode() == OutputMode::Json {
        output.data("verify", &validation);
    } else {
        for error in &validation.errors {
            output.error(error);
        }
        for warning in &validation.warnings {
            output.warning(warning);
        }
    }

    if validation.valid {
        output.success(&format!("Backup {} is valid", path.display()));
        Ok(())
    } else {
        Err(Error::InvalidBackup(path.to_path_buf()))
    }
}
