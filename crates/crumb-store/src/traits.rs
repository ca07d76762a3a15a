use crumb_path::{Crumb, Path};

use crate::error::{StoreError, StoreResult};

/// Path-addressed byte store.
///
/// All implementations must satisfy these invariants:
/// - `read` of an absent leaf returns [`StoreError::DoesNotExist`].
/// - `write` succeeds even when intermediate levels do not exist yet.
/// - `delete` removes exactly the leaf at the path. The empty path is
///   rejected with [`StoreError::EmptyPathDelete`]; an absent leaf is not an
///   error.
/// - `delete_all` removes everything owned by this handle.
/// - Failures are always returned, never swallowed.
pub trait Store: Send + Sync {
    /// Read the payload stored at `path`.
    fn read(&self, path: &Path) -> StoreResult<Vec<u8>>;

    /// Create or overwrite the payload at `path`.
    fn write(&self, path: &Path, data: &[u8]) -> StoreResult<()>;

    /// Remove the payload at `path`.
    fn delete(&self, path: &Path) -> StoreResult<()>;

    /// Remove every payload owned by this handle.
    fn delete_all(&self) -> StoreResult<()>;

    /// Check whether a payload is stored at `path`.
    ///
    /// Default implementation reads the payload and discards it. Backends
    /// may override when they can answer without reading.
    fn exists(&self, path: &Path) -> StoreResult<bool> {
        match self.read(path) {
            Ok(_) => Ok(true),
            Err(StoreError::DoesNotExist(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// [`Store::read`] addressed by a crumb sequence instead of a `Path`.
pub fn read_at<S, I>(store: &S, crumbs: I) -> StoreResult<Vec<u8>>
where
    S: Store + ?Sized,
    I: IntoIterator,
    I::Item: Into<Crumb>,
{
    store.read(&Path::from_crumbs(crumbs))
}

/// [`Store::write`] addressed by a crumb sequence instead of a `Path`.
pub fn write_at<S, I>(store: &S, crumbs: I, data: &[u8]) -> StoreResult<()>
where
    S: Store + ?Sized,
    I: IntoIterator,
    I::Item: Into<Crumb>,
{
    store.write(&Path::from_crumbs(crumbs), data)
}

/// [`Store::delete`] addressed by a crumb sequence instead of a `Path`.
pub fn delete_at<S, I>(store: &S, crumbs: I) -> StoreResult<()>
where
    S: Store + ?Sized,
    I: IntoIterator,
    I::Item: Into<Crumb>,
{
    store.delete(&Path::from_crumbs(crumbs))
}
