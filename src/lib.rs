// ABOUTME: Library root for dcm - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod backup;
pub mod compose;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod exec;
pub mod health;
pub mod hooks;
pub mod monitor;
pub mod output;
pub mod status;
pub mod types;
