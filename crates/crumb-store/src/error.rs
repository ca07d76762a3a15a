use crumb_path::{Path, PathError};
use crumb_tree::AccessError;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Path text did not parse.
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// Nothing is stored at the path.
    #[error("nothing stored at {0}")]
    DoesNotExist(Path),

    /// An index crumb fell outside a list.
    #[error("index out of bounds at {0}")]
    IndexOutOfBounds(Path),

    /// The node at the path is not the kind the operation needs.
    #[error("type mismatch at {path}: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: String,
        actual: String,
        path: Path,
    },

    /// `delete` was called with the empty path.
    #[error("cannot delete at the empty path; call delete_all to remove everything")]
    EmptyPathDelete,

    /// The backend cannot represent this crumb.
    #[error("segment {segment:?} is not storable: {reason}")]
    InvalidSegment { segment: String, reason: String },

    /// Opaque failure reported by a native backend.
    #[error("backend failure ({code}): {message}")]
    Backend { code: i32, message: String },

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding failed; the codec's own error is carried as is.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Store configuration is invalid or unreadable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<AccessError> for StoreError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::KeyNotFound { path } => Self::DoesNotExist(path),
            AccessError::IndexOutOfBounds { path, .. }
            | AccessError::PaddingLimit { path, .. } => Self::IndexOutOfBounds(path),
            AccessError::TypeMismatch {
                expected,
                actual,
                path,
            } => Self::TypeMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
                path,
            },
        }
    }
}

/// Errors from a [`Codec`](crate::Codec).
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
