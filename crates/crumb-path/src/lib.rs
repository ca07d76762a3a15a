//! Paths into nested trees of maps, lists, and scalars.
//!
//! A [`Path`] is an ordered sequence of [`Crumb`]s, root to leaf. Each crumb
//! is either a string key (descends into a map) or an integer index
//! (descends into a list). Every other crate in the workspace addresses data
//! with a `Path`.
//!
//! # Text Form
//!
//! Paths have one canonical textual form, used wherever a path is persisted
//! or typed by a person:
//!
//! ```text
//! a.b[0].c      => [Key("a"), Key("b"), Index(0), Key("c")]
//! [0]           => [Index(0)]
//! a..           => [Key("a"), Key(""), Key("")]
//! .-2           => [Key(""), Key("-2")]
//! ```
//!
//! # Key Types
//!
//! - [`Crumb`] -- one segment: `Key(String)` or `Index(i64)`
//! - [`Path`] -- immutable crumb sequence with parse/print
//! - [`PathError`] -- text that does not match the grammar

pub mod crumb;
pub mod error;
pub mod parse;
pub mod path;

pub use crumb::Crumb;
pub use error::{PathError, Result};
pub use path::Path;

/// Build a [`Path`] from a list of crumb-convertible values.
///
/// ```
/// use crumb_path::{path, Crumb, Path};
///
/// let p = path!["a", 0, "b"];
/// assert_eq!(p.to_string(), "a[0].b");
/// assert_eq!(path![], Path::new());
/// assert_eq!(p.last(), Some(&Crumb::from("b")));
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::new()
    };
    ($($crumb:expr),+ $(,)?) => {
        $crate::Path::from_crumbs([$($crate::Crumb::from($crumb)),+])
    };
}
