//! Path-addressed byte storage.
//!
//! Every backend implements the [`Store`] trait: four operations over opaque
//! byte payloads keyed by a [`Path`]. The typed layer ([`TypedStore`]) is
//! built on top of the trait alone and never sees backend internals.
//!
//! # Storage Backends
//!
//! - [`TreeStore`] -- in-memory nested map; routes every call through the
//!   `crumb-tree` accessor and stores payloads as byte leaves
//! - [`FileStore`] -- one file per leaf under a root directory, one directory
//!   level per crumb
//! - [`CacheStore`] -- bounded in-memory cache with least-recently-used
//!   eviction by entry count and total byte cost
//!
//! # Contract
//!
//! 1. `read` of an absent leaf fails with [`StoreError::DoesNotExist`].
//! 2. `write` creates missing intermediate levels and overwrites leaves.
//! 3. `delete` removes exactly one leaf; the empty path is rejected with
//!    [`StoreError::EmptyPathDelete`]; an absent leaf is not an error.
//! 4. `delete_all` removes everything owned by the handle.
//! 5. Handles are `Send + Sync` and shared as `Arc<dyn Store>`. There is no
//!    multi-key atomicity.
//!
//! `TreeStore` and `FileStore` are read-after-write consistent within one
//! process. `CacheStore` is too, until an entry is evicted.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod file;
pub mod traits;
pub mod tree;
pub mod typed;

pub use cache::{CacheLimits, CacheStore};
pub use codec::{BincodeCodec, Codec, JsonCodec};
pub use config::{open_store, Backend, StoreConfig};
pub use error::{CodecError, StoreError, StoreResult};
pub use file::FileStore;
pub use traits::{delete_at, read_at, write_at, Store};
pub use tree::TreeStore;
pub use typed::TypedStore;

pub use crumb_path::{path, Crumb, Path};
