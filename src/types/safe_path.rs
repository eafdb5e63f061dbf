// ABOUTME: Shell-safe file path checks.
// ABOUTME: Paths are interpolated unquoted into command lines, so metacharacters are refused.

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("file path cannot be empty")]
    Empty,

    #[error("unsafe file path '{path}': contains '{sequence}'")]
    Unsafe {
        path: String,
        sequence: &'static str,
    },
}

const DANGEROUS_SEQUENCES: [&str; 8] = ["..", "|", "&", ";", "$", ">", "<", "`"];

/// Reject paths containing parent traversal or shell metacharacters.
pub fn check_path(path: &Path) -> Result<(), PathError> {
    let text = path.to_string_lossy();
    if text.is_empty() {
        return Err(PathError::Empty);
    }

    match DANGEROUS_SEQUENCES
        .into_iter()
        .find(|seq| text.contains(seq))
    {
        Some(sequence) => Err(PathError::Unsafe {
            path: text.into_owned(),
            sequence,
        }),
        None => Ok(()),
    }
}
