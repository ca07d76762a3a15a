//! Path-addressed access into dynamic trees.
//!
//! A tree is a [`Value`]: maps keyed by string, lists indexed by integer,
//! scalars, and null. The accessor functions walk a [`Path`] through a tree
//! to read, replace, or remove exactly one node.
//!
//! # Semantics
//!
//! - **Reads** are strict. A missing key is [`AccessError::KeyNotFound`], an
//!   index outside the list is [`AccessError::IndexOutOfBounds`], and a crumb
//!   of the wrong kind (or any crumb applied to a scalar) is
//!   [`AccessError::TypeMismatch`].
//! - **Writes** coerce. A key crumb turns the node it lands on into a map
//!   and an index crumb turns it into a list, replacing whatever was there.
//!   Lists are padded with `Null` up to the written index, at most
//!   [`MAX_PADDING`] slots per list; a write past that is
//!   [`AccessError::PaddingLimit`] and changes nothing.
//! - **Negative indices** count from the end of the list
//!   ([`bidirectional_index`]).
//! - **Deletes** remove map entries and null out list slots in place, so
//!   later indices never shift.
//!
//! The accessor does no locking. Callers sharing one tree across threads
//! must serialize access themselves.

pub mod access;
pub mod error;
pub mod value;

pub use access::{bidirectional_index, delete, get, get_mut, set, MAX_PADDING};
pub use error::{AccessError, Result};
pub use value::{Scalar, Value, ValueKind};

pub use crumb_path::{path, Crumb, Path};
