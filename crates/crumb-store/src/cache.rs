use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crumb_path::Path;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{StoreError, StoreResult};
use crate::traits::Store;

/// Bounds for a [`CacheStore`]. `None` means unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheLimits {
    /// Maximum number of entries.
    pub count_limit: Option<usize>,
    /// Maximum sum of payload lengths in bytes.
    pub total_cost_limit: Option<usize>,
}

struct Entry {
    data: Vec<u8>,
    last_used: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<Path, Entry>,
    /// Recency index: tick of last use -> path. Oldest first.
    recency: BTreeMap<u64, Path>,
    tick: u64,
    total_cost: usize,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn remove(&mut self, key: &Path) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        self.recency.remove(&entry.last_used);
        self.total_cost -= entry.data.len();
        Some(entry)
    }

    fn evict_over(&mut self, limits: &CacheLimits) {
        loop {
            let over_count = limits
                .count_limit
                .is_some_and(|limit| self.entries.len() > limit);
            let over_cost = limits
                .total_cost_limit
                .is_some_and(|limit| self.total_cost > limit);
            if !over_count && !over_cost {
                break;
            }
            let Some((_, key)) = self.recency.pop_first() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                self.total_cost -= entry.data.len();
                trace!(key = %key, cost = entry.data.len(), "cache eviction");
            }
        }
    }
}

/// Bounded in-memory cache keyed by [`Path`].
///
/// When either limit in [`CacheLimits`] is exceeded the least recently used
/// entries are evicted. A payload larger than the cost limit is never
/// retained. Reads count as use. Entries are independent: there is no tree
/// structure, so writing `a` does not affect `a.b`.
pub struct CacheStore {
    limits: CacheLimits,
    state: Mutex<CacheState>,
}

impl CacheStore {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::with_limits(CacheLimits::default())
    }

    pub fn with_limits(limits: CacheLimits) -> Self {
        Self {
            limits,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn limits(&self) -> CacheLimits {
        self.limits
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.state.lock().expect("lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes across all cached payloads.
    pub fn total_cost(&self) -> usize {
        self.state.lock().expect("lock poisoned").total_cost
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for CacheStore {
    fn read(&self, path: &Path) -> StoreResult<Vec<u8>> {
        let mut state = self.state.lock().expect("lock poisoned");
        let tick = state.next_tick();
        let CacheState {
            entries, recency, ..
        } = &mut *state;
        let entry = entries
            .get_mut(path)
            .ok_or_else(|| StoreError::DoesNotExist(path.clone()))?;
        recency.remove(&entry.last_used);
        recency.insert(tick, path.clone());
        entry.last_used = tick;
        Ok(entry.data.clone())
    }

    fn write(&self, path: &Path, data: &[u8]) -> StoreResult<()> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.remove(path);

        if self
            .limits
            .total_cost_limit
            .is_some_and(|limit| data.len() > limit)
        {
            debug!(path = %path, len = data.len(), "payload exceeds cache cost limit; not retained");
            return Ok(());
        }

        let tick = state.next_tick();
        state.recency.insert(tick, path.clone());
        state.total_cost += data.len();
        state.entries.insert(
            path.clone(),
            Entry {
                data: data.to_vec(),
                last_used: tick,
            },
        );
        state.evict_over(&self.limits);
        debug!(path = %path, len = data.len(), entries = state.entries.len(), "cache write");
        Ok(())
    }

    fn delete(&self, path: &Path) -> StoreResult<()> {
        if path.is_empty() {
            return Err(StoreError::EmptyPathDelete);
        }
        let removed = self
            .state
            .lock()
            .expect("lock poisoned")
            .remove(path);
        debug!(path = %path, existed = removed.is_some(), "cache delete");
        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        *self.state.lock().expect("lock poisoned") = CacheState::default();
        debug!("cache cleared");
        Ok(())
    }

    fn exists(&self, path: &Path) -> StoreResult<bool> {
        let state = self.state.lock().expect("lock poisoned");
        Ok(state.entries.contains_key(path))
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("limits", &self.limits)
            .field("entry_count", &self.len())
            .finish()
    }
}
