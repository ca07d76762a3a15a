use std::fmt;

use serde::{Deserialize, Serialize};

/// One segment of a [`Path`](crate::Path).
///
/// Equality is variant-sensitive: `Index(1)` and `Key("1")` are different
/// crumbs and address different places in a tree.
///
/// Serializes untagged: keys as strings, indices as integers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Crumb {
    /// List position. Negative values count from the end of the list.
    Index(i64),
    /// Map key. The empty string is a valid key.
    Key(String),
}

impl Crumb {
    /// The first element of a list.
    pub const FIRST: Crumb = Crumb::Index(0);

    /// The last element of a list.
    pub const fn last() -> Self {
        Crumb::Index(-1)
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Crumb::Index(_))
    }

    pub fn is_key(&self) -> bool {
        matches!(self, Crumb::Key(_))
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            Crumb::Index(i) => Some(*i),
            Crumb::Key(_) => None,
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Crumb::Key(k) => Some(k),
            Crumb::Index(_) => None,
        }
    }
}

impl fmt::Display for Crumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crumb::Index(i) => write!(f, "{i}"),
            Crumb::Key(k) => f.write_str(k),
        }
    }
}

impl From<&str> for Crumb {
    fn from(key: &str) -> Self {
        Crumb::Key(key.to_string())
    }
}

impl From<String> for Crumb {
    fn from(key: String) -> Self {
        Crumb::Key(key)
    }
}

impl From<&String> for Crumb {
    fn from(key: &String) -> Self {
        Crumb::Key(key.clone())
    }
}

impl From<i64> for Crumb {
    fn from(index: i64) -> Self {
        Crumb::Index(index)
    }
}

impl From<i32> for Crumb {
    fn from(index: i32) -> Self {
        Crumb::Index(i64::from(index))
    }
}

impl From<usize> for Crumb {
    fn from(index: usize) -> Self {
        Crumb::Index(index as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_variant_sensitive() {
        assert_ne!(Crumb::Index(1), Crumb::Key("1".into()));
        assert_eq!(Crumb::from(1), Crumb::Index(1));
        assert_eq!(Crumb::from("1"), Crumb::Key("1".into()));
    }

    #[test]
    fn hashing_follows_equality() {
        use std::collections::HashSet;
        let set: HashSet<Crumb> = [Crumb::from(1), Crumb::from("1"), Crumb::from(1)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn named_constructors() {
        assert_eq!(Crumb::FIRST, Crumb::Index(0));
        assert_eq!(Crumb::last(), Crumb::Index(-1));
    }

    #[test]
    fn accessors() {
        let idx = Crumb::from(3usize);
        assert!(idx.is_index());
        assert_eq!(idx.as_index(), Some(3));
        assert_eq!(idx.as_key(), None);

        let key = Crumb::from("name");
        assert!(key.is_key());
        assert_eq!(key.as_key(), Some("name"));
        assert_eq!(key.as_index(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Crumb::from(-4).to_string(), "-4");
        assert_eq!(Crumb::from("abc").to_string(), "abc");
    }

    #[test]
    fn serde_untagged() {
        assert_eq!(serde_json::to_string(&Crumb::from(2)).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Crumb::from("k")).unwrap(), "\"k\"");
        let back: Vec<Crumb> = serde_json::from_str(r#"["a", 0, "2"]"#).unwrap();
        assert_eq!(
            back,
            vec![Crumb::from("a"), Crumb::from(0), Crumb::from("2")]
        );
    }
}
