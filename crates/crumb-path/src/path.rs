use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::crumb::Crumb;
use crate::error::PathError;
use crate::parse;

/// Ordered crumb sequence identifying one node in a nested tree.
///
/// The empty path denotes the root. Two paths are equal iff their crumbs are
/// element-wise equal. Paths serialize as their canonical text form.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path(Vec<Crumb>);

impl Path {
    /// The root path.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_crumbs<I>(crumbs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Crumb>,
    {
        Self(crumbs.into_iter().map(Into::into).collect())
    }

    /// Parse the canonical text form.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        parse::parse(text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Crumb> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Crumb> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Crumb> {
        self.0.last()
    }

    /// Split into the head crumb and the remaining path.
    pub fn head(&self) -> Option<(&Crumb, Path)> {
        self.0
            .split_first()
            .map(|(head, tail)| (head, Path(tail.to_vec())))
    }

    /// The path with its last crumb removed, or `None` at the root.
    pub fn parent(&self) -> Option<Path> {
        self.0
            .split_last()
            .map(|(_, init)| Path(init.to_vec()))
    }

    /// The first `len` crumbs of this path.
    pub fn prefix(&self, len: usize) -> Path {
        Path(self.0[..len.min(self.0.len())].to_vec())
    }

    pub fn starts_with(&self, other: &Path) -> bool {
        self.0.starts_with(&other.0)
    }

    pub fn appending(&self, crumb: impl Into<Crumb>) -> Path {
        let mut crumbs = self.0.clone();
        crumbs.push(crumb.into());
        Path(crumbs)
    }

    pub fn join(&self, other: &Path) -> Path {
        let mut crumbs = self.0.clone();
        crumbs.extend(other.0.iter().cloned());
        Path(crumbs)
    }

    pub fn push(&mut self, crumb: impl Into<Crumb>) {
        self.0.push(crumb.into());
    }
}

/// Canonical text form: the first key is bare, later keys are prefixed with
/// `.`, and indices always print as `[i]`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (offset, crumb) in self.0.iter().enumerate() {
            match crumb {
                Crumb::Index(i) => write!(f, "[{i}]")?,
                Crumb::Key(k) if offset == 0 => f.write_str(k)?,
                Crumb::Key(k) => write!(f, ".{k}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse(s)
    }
}

impl TryFrom<String> for Path {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse::parse(&value)
    }
}

impl TryFrom<&str> for Path {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse::parse(value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

impl From<Vec<Crumb>> for Path {
    fn from(crumbs: Vec<Crumb>) -> Self {
        Self(crumbs)
    }
}

impl From<&[Crumb]> for Path {
    fn from(crumbs: &[Crumb]) -> Self {
        Self(crumbs.to_vec())
    }
}

impl From<Crumb> for Path {
    fn from(crumb: Crumb) -> Self {
        Self(vec![crumb])
    }
}

impl FromIterator<Crumb> for Path {
    fn from_iter<I: IntoIterator<Item = Crumb>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Crumb;
    type IntoIter = std::vec::IntoIter<Crumb>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Crumb;
    type IntoIter = std::slice::Iter<'a, Crumb>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
