//! Typed bindings to a single leaf of a crumb store.
//!
//! A [`Binding`] pairs a [`Path`](crumb_path::Path) and a shared store handle
//! with a default value and a codec. Reads never fail: a missing or
//! undecodable payload yields the default. Every outcome is also published
//! on a broadcast channel as a [`BindingEvent`], so observers see reads,
//! writes, deletes, and errors without polling.
//!
//! ```
//! use std::sync::Arc;
//! use crumb_bind::{Binding, BindingEvent};
//! use crumb_store::{path, Store, TreeStore};
//!
//! let store: Arc<dyn Store> = Arc::new(TreeStore::new());
//! let name = Binding::new(store, path!["user", "name"], "anonymous".to_string());
//! let mut events = name.subscribe();
//!
//! assert_eq!(name.get(), "anonymous");
//! assert!(matches!(events.try_recv(), Ok(BindingEvent::Error(_))));
//!
//! name.set("Dorothy".to_string()).unwrap();
//! assert_eq!(name.get(), "Dorothy");
//! ```

pub mod binding;
pub mod event;

pub use binding::{Binding, DEFAULT_EVENT_CAPACITY};
pub use event::{BindingEvent, BindingResult, EventStream};
