// ABOUTME: Deploy command implementation.
// ABOUTME: Reports the deploy outcome, its warnings and any rollback result.

use dcm::compose::ComposeManager;
use dcm::deploy::{DeployOutcome, Deployer, RollbackOutcome};
use dcm::error::{Error, Result};
use dcm::exec::Executor;
use dcm::output::Output;

pub async fn deploy<E: Executor>(
    manager: &ComposeManager<E>,
    strategy: Option<&str>,
    output: &Output,
) -> Result<()> {
    output.progress(&format!(
        "🚀 Deploying {} environment",
        manager.environment()
    ));

    match Deployer::new(manager).deploy(strategy).await {
        DeployOutcome::Deployed => {
            output.success("Deployment completed successfully");
            Ok(())
        }
        DeployOutcome::DeployedWithWarnings(warnings) => {
            for warning in &warnings {
                output.warning(&warning.message);
            }
            output.success("Deployment completed with warnings");
            Ok(())
        }
        DeployOutcome::Failed { error, rollback } => {
            match rollback {
                RollbackOutcome::NotAttempted => {}
                RollbackOutcome::Succeeded => output.progress("🔄 Rolled back to pre-deploy backup"),
                RollbackOutcome::Failed(reason) => {
                    output.warning(&format!("Rollback failed: {reason}"))
                }
            }
            Err(Error::Deploy(error))
        }
    }
}
