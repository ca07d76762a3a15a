use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::{CacheLimits, CacheStore};
use crate::error::{StoreError, StoreResult};
use crate::file::FileStore;
use crate::traits::Store;
use crate::tree::TreeStore;

/// Which backend [`open_store`] builds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    File,
    Cache,
}

/// Store selection, loadable from TOML.
///
/// ```toml
/// backend = "file"
/// root = "/var/lib/crumb"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Root directory; required by the file backend.
    pub root: Option<PathBuf>,
    /// Entry limit for the cache backend.
    pub count_limit: Option<usize>,
    /// Byte limit for the cache backend.
    pub total_cost_limit: Option<usize>,
}

impl StoreConfig {
    /// A file backend rooted at `root`.
    pub fn file(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File,
            root: Some(root.into()),
            ..Default::default()
        }
    }

    /// A cache backend with the given limits.
    pub fn cache(limits: CacheLimits) -> Self {
        Self {
            backend: Backend::Cache,
            count_limit: limits.count_limit,
            total_cost_limit: limits.total_cost_limit,
            ..Default::default()
        }
    }

    pub fn from_toml(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &FsPath) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn cache_limits(&self) -> CacheLimits {
        CacheLimits {
            count_limit: self.count_limit,
            total_cost_limit: self.total_cost_limit,
        }
    }

    /// Shorthand for [`open_store`].
    pub fn open(&self) -> StoreResult<Arc<dyn Store>> {
        open_store(self)
    }
}

/// Build the backend described by `config`.
pub fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn Store>> {
    debug!(backend = ?config.backend, root = ?config.root, "opening store");
    let store: Arc<dyn Store> = match config.backend {
        Backend::Memory => Arc::new(TreeStore::new()),
        Backend::Cache => Arc::new(CacheStore::with_limits(config.cache_limits())),
        Backend::File => {
            let root = config.root.as_ref().ok_or_else(|| {
                StoreError::Config("the file backend requires `root`".into())
            })?;
            Arc::new(FileStore::open(root.clone())?)
        }
    };
    Ok(store)
}
