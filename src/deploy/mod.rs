// ABOUTME: Deployment orchestration over the compose manager.
// ABOUTME: Exports the deployer, its outcome types and strategy selection.

mod deployment;
mod error;
mod strategy;

pub use deployment::{DeployOutcome, Deployer, PRE_DEPLOY_BACKUP, RollbackOutcome};
pub use error::{DeployError, DeployErrorKind, DeployStep};
pub use strategy::{DeployStrategy, UnknownStrategy};
