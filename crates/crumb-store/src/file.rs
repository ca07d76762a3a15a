use std::fs;
use std::io::{self, Write};
use std::path::{Path as FsPath, PathBuf};

use crumb_path::{Crumb, Path};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::traits::Store;

/// Prefix of in-flight temp files; skipped by [`FileStore::paths`].
const TEMP_PREFIX: &str = ".crumb-tmp-";

/// Filesystem store: one file per leaf under a root directory.
///
/// Each crumb becomes one path component. Index crumbs print as decimal, so
/// `Index(1)` and `Key("1")` address the same file. Negative indices are
/// rejected with [`StoreError::InvalidSegment`]: a directory has no length to
/// count back from. So are keys that are empty, `.` or `..`, or that contain
/// a path separator.
///
/// Writes go to a temp file in the target directory and are renamed into
/// place. Like the in-memory tree, a write replaces whatever node kind is in
/// its way: a file blocking an intermediate directory is removed, and a
/// directory at the leaf position is removed with its contents.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a handle rooted at `root` without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a handle rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root)?;
        debug!(root = %store.root.display(), "file store opened");
        Ok(store)
    }

    pub fn root(&self) -> &FsPath {
        &self.root
    }

    /// Filesystem location of `path`.
    pub fn locate(&self, path: &Path) -> StoreResult<PathBuf> {
        let mut location = self.root.clone();
        for crumb in path {
            location.push(segment(crumb)?);
        }
        Ok(location)
    }

    /// Every stored leaf, sorted.
    ///
    /// Components that read as integers are reported as index crumbs.
    pub fn paths(&self) -> StoreResult<Vec<Path>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut paths: Vec<Path> = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file()
                || entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX)
            {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            paths.push(
                relative
                    .components()
                    .map(|c| crumb_for_component(&c.as_os_str().to_string_lossy()))
                    .collect::<Path>(),
            );
        }
        Ok(paths)
    }

    /// The shortest proper prefix of `path` that is a regular file.
    fn file_ancestor(&self, path: &Path) -> StoreResult<Option<Path>> {
        for len in 1..path.len() {
            let prefix = path.prefix(len);
            if self.locate(&prefix)?.is_file() {
                return Ok(Some(prefix));
            }
        }
        Ok(None)
    }
}

impl Store for FileStore {
    fn read(&self, path: &Path) -> StoreResult<Vec<u8>> {
        let location = self.locate(path)?;
        trace!(path = %path, file = %location.display(), "file store read");
        match fs::metadata(&location) {
            Ok(meta) if meta.is_dir() => Err(StoreError::TypeMismatch {
                expected: "file".into(),
                actual: "directory".into(),
                path: path.clone(),
            }),
            Ok(_) => Ok(fs::read(&location)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::DoesNotExist(path.clone()))
            }
            Err(e) => match self.file_ancestor(path)? {
                Some(prefix) => Err(StoreError::TypeMismatch {
                    expected: "directory".into(),
                    actual: "file".into(),
                    path: prefix,
                }),
                None => Err(e.into()),
            },
        }
    }

    fn write(&self, path: &Path, data: &[u8]) -> StoreResult<()> {
        if path.is_empty() {
            return Err(StoreError::InvalidSegment {
                segment: String::new(),
                reason: "the root directory cannot hold a payload".into(),
            });
        }
        let location = self.locate(path)?;

        if let Some(prefix) = self.file_ancestor(path)? {
            warn!(path = %path, replaced = %prefix, "file in the way of write; replacing it");
            fs::remove_file(self.locate(&prefix)?)?;
        }
        if location.is_dir() {
            warn!(path = %path, "directory in the way of write; replacing it");
            fs::remove_dir_all(&location)?;
        }

        let parent = location.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(parent)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(parent)?;
        tmp.write_all(data)?;
        tmp.persist(&location).map_err(|e| e.error)?;

        debug!(path = %path, len = data.len(), "file store write");
        Ok(())
    }

    fn delete(&self, path: &Path) -> StoreResult<()> {
        if path.is_empty() {
            return Err(StoreError::EmptyPathDelete);
        }
        let location = self.locate(path)?;
        match fs::symlink_metadata(&location) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&location)?,
            Ok(_) => fs::remove_file(&location)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(path = %path, "file store delete of absent leaf");
                return Ok(());
            }
            Err(e) => {
                if self.file_ancestor(path)?.is_some() {
                    return Ok(());
                }
                return Err(e.into());
            }
        }
        debug!(path = %path, "file store delete");
        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
            } else {
                fs::remove_file(entry.path())?;
            }
        }
        debug!(root = %self.root.display(), "file store cleared");
        Ok(())
    }

    fn exists(&self, path: &Path) -> StoreResult<bool> {
        Ok(self.locate(path)?.is_file())
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("root", &self.root)
            .finish()
    }
}

fn segment(crumb: &Crumb) -> StoreResult<String> {
    match crumb {
        Crumb::Index(i) if *i < 0 => Err(StoreError::InvalidSegment {
            segment: i.to_string(),
            reason: "negative indices count from a list end, which directories do not have"
                .into(),
        }),
        Crumb::Index(i) => Ok(i.to_string()),
        Crumb::Key(key) => {
            let reason = if key.is_empty() {
                Some("empty keys have no file name")
            } else if key == "." || key == ".." {
                Some("relative directory names are reserved")
            } else if key.contains(['/', '\\', '\0']) {
                Some("keys cannot contain path separators")
            } else if key.starts_with(TEMP_PREFIX) {
                Some("prefix is reserved for temp files")
            } else {
                None
            };
            match reason {
                Some(reason) => Err(StoreError::InvalidSegment {
                    segment: key.clone(),
                    reason: reason.into(),
                }),
                None => Ok(key.clone()),
            }
        }
    }
}

/// Only components that an index crumb would produce read back as indices.
fn crumb_for_component(component: &str) -> Crumb {
    if component.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = component.parse::<i64>() {
            if i.to_string() == component {
                return Crumb::Index(i);
            }
        }
    }
    Crumb::Key(component.to_string())
}
