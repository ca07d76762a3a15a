use crumb_path::Path;
use thiserror::Error;

use crate::value::ValueKind;

/// Errors from reading or writing a tree at a path.
///
/// `path` is the prefix of the requested path up to and including the crumb
/// that could not be followed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("key not found at {path}")]
    KeyNotFound { path: Path },

    #[error("index {index} out of bounds for list of length {len} at {path}")]
    IndexOutOfBounds { path: Path, index: i64, len: usize },

    #[error("type mismatch at {path}: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
        path: Path,
    },

    /// A write would pad a list by more than the accessor's padding limit.
    #[error("index {index} at {path} is too far past the end of a list of length {len}")]
    PaddingLimit { path: Path, index: i64, len: usize },
}

impl AccessError {
    /// The path prefix at which access failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::KeyNotFound { path }
            | Self::IndexOutOfBounds { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::PaddingLimit { path, .. } => path,
        }
    }
}

/// Result alias for tree access.
pub type Result<T> = std::result::Result<T, AccessError>;
