// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create an unknown-strategy warning.
    pub fn unknown_strategy(label: &str) -> Self {
        Self {
            kind: WarningKind::UnknownStrategy,
            message: format!("Unknown deployment strategy '{label}', using recreate"),
        }
    }

    /// Create a post-deploy hook failure warning.
    pub fn post_deploy_hook(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PostDeployHook,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Strategy label not recognised; deployed as recreate.
    UnknownStrategy,
    /// A post-deploy hook failed after services were started.
    PostDeployHook,
}
