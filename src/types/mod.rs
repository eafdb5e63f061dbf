// ABOUTME: Validated domain types.
// ABOUTME: Names, ports, and paths that end up interpolated into shell commands.

mod port;
mod safe_path;
mod service_name;

pub use port::PortSpec;
pub use safe_path::{PathError, check_path};
pub use service_name::{EnvironmentName, NameError, ServiceName};
