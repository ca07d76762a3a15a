use thiserror::Error;

/// Errors produced while parsing path text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid path syntax in {input:?} at byte {position}: {reason}")]
    InvalidPathSyntax {
        input: String,
        position: usize,
        reason: String,
    },
}

/// Result alias for path operations.
pub type Result<T> = std::result::Result<T, PathError>;
