use std::sync::Arc;

use crumb_store::StoreError;
use tokio::sync::broadcast;

/// One observable outcome of a [`Binding`](crate::Binding) operation.
#[derive(Clone, Debug)]
pub enum BindingEvent<T> {
    /// A value was read and decoded.
    Read(T),
    /// A value was encoded and written.
    Write(T),
    /// The leaf was deleted; carries the value seen just before.
    Delete(T),
    /// Any storage or codec failure.
    Error(Arc<StoreError>),
}

impl<T> BindingEvent<T> {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The value carried by a read, write, or delete event.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Read(v) | Self::Write(v) | Self::Delete(v) => Some(v),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&StoreError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of a fallible binding call. The error is shared with the
/// [`BindingEvent::Error`] published for it.
pub type BindingResult<T> = Result<T, Arc<StoreError>>;

/// A broadcast channel receiver for binding events.
pub type EventStream<T> = broadcast::Receiver<BindingEvent<T>>;
