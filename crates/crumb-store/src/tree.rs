use std::sync::RwLock;

use crumb_path::Path;
use crumb_tree::Value;
use tracing::{debug, trace};

use crate::error::{StoreError, StoreResult};
use crate::traits::Store;

/// In-memory store backed by a nested [`Value`] tree.
///
/// Each payload is a byte leaf in the tree, addressed through the
/// `crumb-tree` accessor, so writes coerce and pad intermediate containers
/// exactly as [`crumb_tree::set`] does. The tree sits behind a `RwLock`;
/// payloads are cloned on read and write.
pub struct TreeStore {
    root: RwLock<Value>,
}

impl TreeStore {
    /// Create a store with an empty map at the root.
    pub fn new() -> Self {
        Self::from_value(Value::map())
    }

    /// Create a store over an existing tree.
    pub fn from_value(root: Value) -> Self {
        Self {
            root: RwLock::new(root),
        }
    }

    /// A copy of the whole tree.
    pub fn snapshot(&self) -> Value {
        self.root.read().expect("lock poisoned").clone()
    }

    /// Returns `true` if the root holds nothing.
    pub fn is_empty(&self) -> bool {
        match &*self.root.read().expect("lock poisoned") {
            Value::Map(map) => map.is_empty(),
            Value::List(list) => list.is_empty(),
            Value::Null => true,
            Value::Scalar(_) => false,
        }
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for TreeStore {
    fn read(&self, path: &Path) -> StoreResult<Vec<u8>> {
        let root = self.root.read().expect("lock poisoned");
        let node = root.get(path)?;
        trace!(path = %path, kind = %node.kind(), "tree store read");
        match node {
            Value::Null => Err(StoreError::DoesNotExist(path.clone())),
            node => node
                .as_bytes()
                .map(<[u8]>::to_vec)
                .ok_or_else(|| StoreError::TypeMismatch {
                    expected: "bytes".into(),
                    actual: node.kind().to_string(),
                    path: path.clone(),
                }),
        }
    }

    fn write(&self, path: &Path, data: &[u8]) -> StoreResult<()> {
        debug!(path = %path, len = data.len(), "tree store write");
        self.root
            .write()
            .expect("lock poisoned")
            .set(path, Value::bytes(data))?;
        Ok(())
    }

    fn delete(&self, path: &Path) -> StoreResult<()> {
        if path.is_empty() {
            return Err(StoreError::EmptyPathDelete);
        }
        let removed = self.root.write().expect("lock poisoned").delete(path);
        debug!(path = %path, existed = removed.is_some(), "tree store delete");
        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        *self.root.write().expect("lock poisoned") = Value::map();
        debug!("tree store cleared");
        Ok(())
    }
}

impl std::fmt::Debug for TreeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeStore")
            .field("root", &self.snapshot().kind())
            .finish()
    }
}
