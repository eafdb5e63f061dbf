// ABOUTME: docker-compose project management for the active environment.
// ABOUTME: Exposes the command builder and the manager that owns config, environment and executor.

mod command;
mod manager;

pub use command::ComposeCommand;
pub use manager::{ComposeManager, LogOptions};
