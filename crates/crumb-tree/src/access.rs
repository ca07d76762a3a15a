use crumb_path::{Crumb, Path};

use crate::error::{AccessError, Result};
use crate::value::{Value, ValueKind};

/// Map a possibly negative index onto a list of length `len`.
///
/// Negative indices count from the end: `-1` is the last element. An empty
/// list cannot be wrapped, so the index is returned unchanged and any later
/// bounds check fails.
pub fn bidirectional_index(len: usize, index: i64) -> i64 {
    if index >= 0 || len == 0 {
        return index;
    }
    let len = len as i64;
    (len + index).rem_euclid(len)
}

/// Resolve `index` against a list of length `len`, or `None` if out of range.
fn resolve(len: usize, index: i64) -> Option<usize> {
    usize::try_from(bidirectional_index(len, index))
        .ok()
        .filter(|&i| i < len)
}

/// Read the node at `path`. The empty path returns `tree` itself.
pub fn get<'a>(tree: &'a Value, path: &Path) -> Result<&'a Value> {
    let mut node = tree;
    for (depth, crumb) in path.iter().enumerate() {
        node = match (node, crumb) {
            (Value::Map(map), Crumb::Key(key)) => map
                .get(key)
                .ok_or_else(|| key_not_found(path, depth))?,
            (Value::List(list), Crumb::Index(index)) => resolve(list.len(), *index)
                .map(|i| &list[i])
                .ok_or_else(|| out_of_bounds(path, depth, *index, list.len()))?,
            (other, crumb) => return Err(mismatch(path, depth, crumb, other)),
        };
    }
    Ok(node)
}

/// Mutable counterpart of [`get`] with the same failure modes.
pub fn get_mut<'a>(tree: &'a mut Value, path: &Path) -> Result<&'a mut Value> {
    let mut node = tree;
    for (depth, crumb) in path.iter().enumerate() {
        node = match (node, crumb) {
            (Value::Map(map), Crumb::Key(key)) => map
                .get_mut(key)
                .ok_or_else(|| key_not_found(path, depth))?,
            (Value::List(list), Crumb::Index(index)) => {
                let len = list.len();
                resolve(len, *index)
                    .map(move |i| &mut list[i])
                    .ok_or_else(|| out_of_bounds(path, depth, *index, len))?
            }
            (other, crumb) => return Err(mismatch(path, depth, crumb, other)),
        };
    }
    Ok(node)
}

/// Largest number of `Null` slots a single write may add to one list.
///
/// Indices further past the end are rejected with
/// [`AccessError::PaddingLimit`] before anything is modified.
pub const MAX_PADDING: usize = 1 << 16;

/// Write `value` at `path`, building or coercing containers along the way.
///
/// The empty path replaces the whole tree. A key crumb landing on anything
/// but a map replaces that node with a fresh map; an index crumb does the
/// same with a list, padding it with `Null` up to the index. The value goes
/// through `Into<Value>` exactly once at the leaf, which is where nested
/// options collapse to a single `Null`.
///
/// The only failure is an index that would pad a list by more than
/// [`MAX_PADDING`] slots; the tree is left untouched in that case.
pub fn set(tree: &mut Value, path: &Path, value: impl Into<Value>) -> Result<()> {
    check_padding(tree, path)?;
    let mut node = tree;
    for crumb in path {
        node = match crumb {
            Crumb::Key(key) => node
                .coerce_map()
                .entry(key.clone())
                .or_insert(Value::Null),
            Crumb::Index(index) => {
                let list = node.coerce_list();
                let i = write_slot(list.len(), *index);
                if list.len() <= i {
                    list.resize(i + 1, Value::Null);
                }
                &mut list[i]
            }
        };
    }
    *node = value.into();
    Ok(())
}

/// Slot an index crumb writes to. Only an empty list leaves a negative
/// index negative; that write lands at its head.
fn write_slot(len: usize, index: i64) -> usize {
    usize::try_from(bidirectional_index(len, index)).unwrap_or(0)
}

/// Walk `path` read-only and reject any index that would over-pad a list.
fn check_padding(tree: &Value, path: &Path) -> Result<()> {
    let mut node = Some(tree);
    for (depth, crumb) in path.iter().enumerate() {
        node = match (node, crumb) {
            (Some(Value::Map(map)), Crumb::Key(key)) => map.get(key),
            (node, Crumb::Index(index)) => {
                let list = match node {
                    Some(Value::List(list)) => list.as_slice(),
                    _ => &[][..],
                };
                if write_slot(list.len(), *index) > list.len().saturating_add(MAX_PADDING) {
                    return Err(AccessError::PaddingLimit {
                        path: path.prefix(depth + 1),
                        index: *index,
                        len: list.len(),
                    });
                }
                resolve(list.len(), *index).map(|i| &list[i])
            }
            _ => None,
        };
    }
    Ok(())
}

/// Remove the node at `path` and return it.
///
/// Map entries are removed. List slots are set to `Null` in place so later
/// indices keep their positions. Missing or mismatched parents make this a
/// no-op returning `None`; nothing is created or coerced. The empty path
/// resets the whole tree to `Null`.
pub fn delete(tree: &mut Value, path: &Path) -> Option<Value> {
    let Some((last, parents)) = path.crumbs().split_last() else {
        return Some(std::mem::take(tree));
    };
    let parent = get_mut(tree, &Path::from(parents)).ok()?;
    match (parent, last) {
        (Value::Map(map), Crumb::Key(key)) => map.remove(key),
        (Value::List(list), Crumb::Index(index)) => {
            let i = resolve(list.len(), *index)?;
            Some(std::mem::take(&mut list[i]))
        }
        _ => None,
    }
}

fn key_not_found(path: &Path, depth: usize) -> AccessError {
    AccessError::KeyNotFound {
        path: path.prefix(depth + 1),
    }
}

fn out_of_bounds(path: &Path, depth: usize, index: i64, len: usize) -> AccessError {
    AccessError::IndexOutOfBounds {
        path: path.prefix(depth + 1),
        index,
        len,
    }
}

fn mismatch(path: &Path, depth: usize, crumb: &Crumb, found: &Value) -> AccessError {
    AccessError::TypeMismatch {
        expected: ValueKind::required_by(crumb),
        actual: found.kind(),
        path: path.prefix(depth + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crumb_path::path;
    use proptest::prelude::*;
    use serde_json::json;

    fn tree(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn p(text: &str) -> Path {
        text.parse().unwrap()
    }

    // -----------------------------------------------------------------------
    // Bidirectional indexing
    // -----------------------------------------------------------------------

    #[test]
    fn negative_index_wraps() {
        assert_eq!(bidirectional_index(6, -1), 5);
        assert_eq!(bidirectional_index(11, -1), 10);
        assert_eq!(bidirectional_index(6, -6), 0);
        assert_eq!(bidirectional_index(6, 5), 5);
    }

    #[test]
    fn empty_list_keeps_index() {
        assert_eq!(bidirectional_index(0, -1), -1);
        assert_eq!(bidirectional_index(0, 4), 4);
        assert_eq!(bidirectional_index(0, 11), 11);
    }

    #[test]
    fn positive_index_is_unchanged() {
        assert_eq!(bidirectional_index(11, 4), 4);
        assert_eq!(bidirectional_index(11, 10), 10);
        assert_eq!(bidirectional_index(3, 7), 7);
    }

    // -----------------------------------------------------------------------
    // get
    // -----------------------------------------------------------------------

    #[test]
    fn empty_path_returns_tree() {
        let t = tree(json!({"a": 1}));
        assert_eq!(get(&t, &Path::new()).unwrap(), &t);
        let scalar = Value::from(7);
        assert_eq!(get(&scalar, &Path::new()).unwrap(), &scalar);
    }

    #[test]
    fn reads_nested_values() {
        let t = tree(json!({"a": {"b": [10, 20, {"c": "deep"}]}}));
        assert_eq!(get(&t, &p("a.b[1]")).unwrap(), &Value::from(20));
        assert_eq!(get(&t, &p("a.b[-1].c")).unwrap(), &Value::from("deep"));
        assert_eq!(
            get(&t, &p("a.b")).unwrap().as_list().map(<[Value]>::len),
            Some(3)
        );
    }

    #[test]
    fn missing_key() {
        let t = tree(json!({"a": {"b": 1}}));
        let err = get(&t, &p("a.x.y")).unwrap_err();
        assert_eq!(err, AccessError::KeyNotFound { path: p("a.x") });
    }

    #[test]
    fn index_out_of_bounds() {
        let t = tree(json!({"a": [1, 2]}));
        let err = get(&t, &p("a[2]")).unwrap_err();
        assert_eq!(
            err,
            AccessError::IndexOutOfBounds {
                path: p("a[2]"),
                index: 2,
                len: 2
            }
        );
    }

    #[test]
    fn negative_index_into_empty_list_fails() {
        let t = tree(json!({"a": []}));
        assert!(matches!(
            get(&t, &p("a[-1]")),
            Err(AccessError::IndexOutOfBounds { index: -1, len: 0, .. })
        ));
    }

    #[test]
    fn index_crumb_into_map_is_mismatch() {
        let t = tree(json!({"a": {"0": 1}}));
        let err = get(&t, &p("a[0]")).unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch {
                expected: ValueKind::List,
                actual: ValueKind::Map,
                path: p("a[0]"),
            }
        );
    }

    #[test]
    fn key_crumb_into_list_is_mismatch() {
        let t = tree(json!({"a": [1]}));
        assert!(matches!(
            get(&t, &p("a.b")),
            Err(AccessError::TypeMismatch {
                expected: ValueKind::Map,
                actual: ValueKind::List,
                ..
            })
        ));
    }

    #[test]
    fn descending_into_scalar_is_always_mismatch() {
        let t = tree(json!({"a": 1, "n": null}));
        for path in ["a.b", "a[0]", "a[99]", "n.x"] {
            assert!(
                matches!(get(&t, &p(path)), Err(AccessError::TypeMismatch { .. })),
                "{path}"
            );
        }
    }

    #[test]
    fn error_reports_failing_prefix() {
        let t = tree(json!({"a": {"b": 1}}));
        let err = get(&t, &p("a.b.c.d")).unwrap_err();
        assert_eq!(err.path(), &p("a.b.c"));
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut t = tree(json!({"a": [1, 2, 3]}));
        *get_mut(&mut t, &p("a[-1]")).unwrap() = Value::from("last");
        assert_eq!(t, tree(json!({"a": [1, 2, "last"]})));
        assert!(get_mut(&mut t, &p("a[3]")).is_err());
    }

    // -----------------------------------------------------------------------
    // set
    // -----------------------------------------------------------------------

    #[test]
    fn set_builds_maps() {
        let mut t = Value::map();
        set(&mut t, &p("a.b"), 1).unwrap();
        assert_eq!(t, tree(json!({"a": {"b": 1}})));
        assert_eq!(get(&t, &p("a.b")).unwrap(), &Value::from(1));
    }

    #[test]
    fn set_builds_lists_of_maps() {
        let mut t = Value::map();
        set(&mut t, &p("a[0].b"), 1).unwrap();
        assert_eq!(t, tree(json!({"a": [{"b": 1}]})));
    }

    #[test]
    fn set_pads_lists_with_null() {
        let mut t = Value::map();
        set(&mut t, &p("a[2]"), 1).unwrap();
        assert_eq!(t, tree(json!({"a": [null, null, 1]})));

        let mut list = Value::list();
        set(&mut list, &path![2], "x").unwrap();
        assert_eq!(list, tree(json!([null, null, "x"])));
    }

    #[test]
    fn set_nested_padding() {
        let mut t = Value::map();
        set(&mut t, &p(".[2].[2]"), 1).unwrap();
        assert_eq!(t, tree(json!([null, null, [null, null, 1]])));

        let mut t = Value::map();
        set(&mut t, &p("a[2].b[2]"), 1).unwrap();
        assert_eq!(t, tree(json!({"a": [null, null, {"b": [null, null, 1]}]})));
    }

    #[test]
    fn numeric_looking_key_is_never_an_index() {
        let mut t = Value::map();
        set(&mut t, &path!["-2"], 1).unwrap();
        assert_eq!(t, tree(json!({"-2": 1})));

        let mut t = Value::map();
        set(&mut t, &p(".-2"), 1).unwrap();
        assert_eq!(t, tree(json!({"": {"-2": 1}})));
    }

    #[test]
    fn empty_keys_nest() {
        let mut t = Value::map();
        set(&mut t, &p("a.."), 1).unwrap();
        assert_eq!(t, tree(json!({"a": {"": {"": 1}}})));
    }

    #[test]
    fn set_negative_index_overwrites_from_end() {
        let mut t = tree(json!({"a": [1, 2, 3]}));
        set(&mut t, &p("a[-1]"), 9).unwrap();
        assert_eq!(t, tree(json!({"a": [1, 2, 9]})));
    }

    #[test]
    fn set_negative_index_on_empty_list_writes_head() {
        let mut t = Value::list();
        set(&mut t, &path![-1], 9).unwrap();
        assert_eq!(t, tree(json!([9])));
    }

    #[test]
    fn set_empty_path_replaces_wholesale() {
        let mut t = tree(json!({"a": 1}));
        set(&mut t, &Path::new(), tree(json!({"b": 2}))).unwrap();
        assert_eq!(t, tree(json!({"b": 2})));
    }

    #[test]
    fn key_write_destroys_list() {
        let mut t = tree(json!({"a": [1, 2, 3]}));
        set(&mut t, &p("a.b"), 1).unwrap();
        assert_eq!(t, tree(json!({"a": {"b": 1}})));
    }

    #[test]
    fn index_write_destroys_map_and_scalar() {
        let mut t = tree(json!({"a": {"x": 1}, "s": "str"}));
        set(&mut t, &p("a[0]"), 1).unwrap();
        set(&mut t, &p("s[1]"), 2).unwrap();
        assert_eq!(t, tree(json!({"a": [1], "s": [null, 2]})));
    }

    #[test]
    fn set_preserves_siblings() {
        let mut t = tree(json!({"a": {"keep": true}, "b": [1, 2]}));
        set(&mut t, &p("a.new"), 1).unwrap();
        set(&mut t, &p("b[0]"), 0).unwrap();
        assert_eq!(
            t,
            tree(json!({"a": {"keep": true, "new": 1}, "b": [0, 2]}))
        );
    }

    #[test]
    fn set_flattens_nested_options() {
        let mut t = Value::map();
        set(&mut t, &p("a"), Some(None::<i64>)).unwrap();
        assert_eq!(t, tree(json!({"a": null})));
        set(&mut t, &p("b"), Some(Some(5))).unwrap();
        assert_eq!(get(&t, &p("b")).unwrap(), &Value::from(5));
    }

    #[test]
    fn huge_index_is_rejected_without_touching_tree() {
        let mut t = tree(json!({"keep": 1, "a": [1, 2]}));
        let before = t.clone();
        for text in ["a[9223372036854775807]", "a[100000000000]", "b.c[70000]"] {
            let err = set(&mut t, &p(text), 1).unwrap_err();
            assert!(matches!(err, AccessError::PaddingLimit { .. }), "{text}: {err}");
            assert_eq!(t, before, "{text}");
        }
        match set(&mut t, &p("a[9223372036854775807]"), 1) {
            Err(AccessError::PaddingLimit { path, index, len }) => {
                assert_eq!(path, p("a[9223372036854775807]"));
                assert_eq!(index, i64::MAX);
                assert_eq!(len, 2);
            }
            other => panic!("expected padding limit, got {other:?}"),
        }
    }

    #[test]
    fn padding_up_to_the_limit_is_allowed() {
        let mut t = Value::list();
        set(&mut t, &path![MAX_PADDING], 1).unwrap();
        assert_eq!(t.as_list().map(<[Value]>::len), Some(MAX_PADDING + 1));
        assert!(set(&mut t, &path![2 * MAX_PADDING + 2], 1).is_err());
    }

    #[test]
    fn padding_limit_applies_below_coerced_nodes() {
        // `s` is a scalar and would become an empty list.
        let mut t = tree(json!({"s": "str"}));
        assert!(set(&mut t, &path!["s", MAX_PADDING + 1], 1).is_err());
        assert_eq!(t, tree(json!({"s": "str"})));
    }

    // -----------------------------------------------------------------------
    // delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_removes_map_entry() {
        let mut t = tree(json!({"a": {"b": 1, "c": 2}}));
        assert_eq!(delete(&mut t, &p("a.b")), Some(Value::from(1)));
        assert_eq!(t, tree(json!({"a": {"c": 2}})));
        assert!(matches!(
            get(&t, &p("a.b")),
            Err(AccessError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn delete_nulls_list_slot_without_shifting() {
        let mut t = tree(json!({"a": [1, 2, 3]}));
        assert_eq!(delete(&mut t, &p("a[0]")), Some(Value::from(1)));
        assert_eq!(t, tree(json!({"a": [null, 2, 3]})));
        assert_eq!(get(&t, &p("a[1]")).unwrap(), &Value::from(2));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut t = tree(json!({"a": {}}));
        assert_eq!(delete(&mut t, &p("a.b")), None);
        assert_eq!(delete(&mut t, &p("a.b")), None);
        assert_eq!(t, tree(json!({"a": {}})));
    }

    #[test]
    fn delete_never_creates_structure() {
        let mut t = tree(json!({"a": 1}));
        assert_eq!(delete(&mut t, &p("x.y.z")), None);
        assert_eq!(delete(&mut t, &p("a.b")), None);
        assert_eq!(delete(&mut t, &p("a[0]")), None);
        assert_eq!(t, tree(json!({"a": 1})));
    }

    #[test]
    fn delete_root_resets_tree() {
        let mut t = tree(json!({"a": 1}));
        assert_eq!(delete(&mut t, &Path::new()), Some(tree(json!({"a": 1}))));
        assert!(t.is_null());
    }

    // -----------------------------------------------------------------------
    // Collection subscripts from an empty map
    // -----------------------------------------------------------------------

    #[test]
    fn every_written_path_reads_back() {
        let paths = [
            "a.", "a..", "a..b", "a..b.", "a..b..", "a", "a.b", "a.b.c", "[0]", "-0", ".[0]",
            "a[0]", "a[0][0]", "a[0][0][0]", "a.b[0]", "a[0].b", "a[0].b[0]", "2", "-2",
            ".[2]", ".-2", ".[2].[2]", "a[2]", "a[2].b", "a[2].b[2]",
        ];
        for text in paths {
            let path = p(text);
            let mut t = Value::map();
            assert!(get(&t, &path).is_err(), "{text} found in empty map");
            set(&mut t, &path, 1).unwrap();
            assert_eq!(get(&t, &path).unwrap(), &Value::from(1), "{text}");
        }
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn arb_crumb() -> impl Strategy<Value = Crumb> {
        prop_oneof![
            (-4i64..6).prop_map(Crumb::Index),
            "[a-c]{0,2}".prop_map(Crumb::Key),
        ]
    }

    fn arb_tree() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,3}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                prop::collection::btree_map("[a-c]{0,2}", inner, 0..4).prop_map(Value::Map),
            ]
        })
    }

    proptest! {
        #[test]
        fn get_after_set_returns_value(
            mut t in arb_tree(),
            crumbs in prop::collection::vec(arb_crumb(), 1..6),
            v in any::<i64>(),
        ) {
            let path = Path::from(crumbs);
            set(&mut t, &path, v).unwrap();
            prop_assert_eq!(get(&t, &path).unwrap(), &Value::from(v));
        }

        #[test]
        fn delete_after_set_leaves_no_value(
            mut t in arb_tree(),
            crumbs in prop::collection::vec(arb_crumb(), 1..6),
        ) {
            let path = Path::from(crumbs);
            set(&mut t, &path, 1).unwrap();
            prop_assert_eq!(delete(&mut t, &path), Some(Value::from(1)));
            match get(&t, &path) {
                Ok(v) => prop_assert!(v.is_null()),
                Err(e) => prop_assert!(matches!(e, AccessError::KeyNotFound { .. }), "{e}"),
            }
        }
    }
}
