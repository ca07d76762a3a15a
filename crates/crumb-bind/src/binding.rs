use std::sync::Arc;

use crumb_path::Path;
use crumb_store::{Codec, JsonCodec, Store, StoreResult, TypedStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::event::{BindingEvent, BindingResult, EventStream};

/// Capacity of the event channel created by [`Binding::new`].
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// A typed value living at one path in a shared store.
///
/// Reads go through [`get`](Self::get), which substitutes the default on any
/// failure, or [`try_get`](Self::try_get), which returns the failure. Writes
/// and deletes always propagate failures, returning the same shared error
/// that was published on the event channel. Every call publishes exactly
/// the events it produced, synchronously, before returning.
///
/// Events are best-effort: with no subscribers they are dropped, and a slow
/// subscriber sees `RecvError::Lagged` once it falls more than the channel
/// capacity behind.
pub struct Binding<T, C = JsonCodec> {
    path: Path,
    store: Arc<dyn Store>,
    default: T,
    codec: C,
    events: broadcast::Sender<BindingEvent<T>>,
}

impl<T> Binding<T, JsonCodec>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Bind `path` in `store`, storing JSON payloads.
    pub fn new(store: Arc<dyn Store>, path: Path, default: T) -> Self {
        Self::with_codec(store, path, default, JsonCodec)
    }

    /// Bind a path given in text form.
    pub fn at(store: Arc<dyn Store>, path: &str, default: T) -> StoreResult<Self> {
        Ok(Self::new(store, path.parse()?, default))
    }
}

impl<U> Binding<Option<U>, JsonCodec>
where
    U: Serialize + DeserializeOwned + Clone,
{
    /// A binding whose default is `None`. Setting `None` stores `null`.
    pub fn nullable(store: Arc<dyn Store>, path: Path) -> Self {
        Self::new(store, path, None)
    }
}

impl<T, C> Binding<T, C>
where
    T: Serialize + DeserializeOwned + Clone,
    C: Codec,
{
    pub fn with_codec(store: Arc<dyn Store>, path: Path, default: T, codec: C) -> Self {
        Self::with_capacity(store, path, default, codec, DEFAULT_EVENT_CAPACITY)
    }

    /// Like [`with_codec`](Self::with_codec) with an explicit event channel
    /// capacity. A capacity of zero is raised to one.
    pub fn with_capacity(
        store: Arc<dyn Store>,
        path: Path,
        default: T,
        codec: C,
        capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            path,
            store,
            default,
            codec,
            events,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> EventStream<T> {
        self.events.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// The stored value, or the default if it is missing or undecodable.
    pub fn get(&self) -> T {
        self.try_get().unwrap_or_else(|_| self.default.clone())
    }

    /// The stored value, or the failure that prevented reading it.
    pub fn try_get(&self) -> BindingResult<T> {
        match self.store.read_value::<T, C>(&self.path, &self.codec) {
            Ok(value) => {
                trace!(path = %self.path, "binding read");
                self.emit(BindingEvent::Read(value.clone()));
                Ok(value)
            }
            Err(e) => {
                debug!(path = %self.path, error = %e, "binding read failed");
                let e = Arc::new(e);
                self.emit(BindingEvent::Error(Arc::clone(&e)));
                Err(e)
            }
        }
    }

    /// Encode and store `value`.
    pub fn set(&self, value: T) -> BindingResult<()> {
        match self.store.write_value(&self.path, &value, &self.codec) {
            Ok(()) => {
                debug!(path = %self.path, "binding write");
                self.emit(BindingEvent::Write(value));
                Ok(())
            }
            Err(e) => {
                debug!(path = %self.path, error = %e, "binding write failed");
                let e = Arc::new(e);
                self.emit(BindingEvent::Error(Arc::clone(&e)));
                Err(e)
            }
        }
    }

    /// Remove the stored value.
    ///
    /// The current value is read first, publishing `Read` or `Error` like
    /// [`get`](Self::get), and is carried by the `Delete` event. When
    /// nothing was stored that value is the default.
    pub fn delete(&self) -> BindingResult<()> {
        let old = self.get();
        match self.store.delete(&self.path) {
            Ok(()) => {
                debug!(path = %self.path, "binding delete");
                self.emit(BindingEvent::Delete(old));
                Ok(())
            }
            Err(e) => {
                debug!(path = %self.path, error = %e, "binding delete failed");
                let e = Arc::new(e);
                self.emit(BindingEvent::Error(Arc::clone(&e)));
                Err(e)
            }
        }
    }

    fn emit(&self, event: BindingEvent<T>) {
        // Err only means there are no receivers.
        let delivered = self.events.send(event).unwrap_or(0);
        trace!(path = %self.path, delivered, "binding event");
    }
}

impl<T: std::fmt::Debug, C: std::fmt::Debug> std::fmt::Debug for Binding<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("path", &self.path)
            .field("default", &self.default)
            .field("codec", &self.codec)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}
