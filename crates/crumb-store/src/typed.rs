use crumb_path::Path;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{Codec, JsonCodec};
use crate::error::StoreResult;
use crate::traits::Store;

/// Typed access layered over any [`Store`].
///
/// Values pass through a [`Codec`]; codec failures surface as
/// [`StoreError::Codec`](crate::StoreError::Codec) with the underlying error
/// intact. Implemented for every store, including `dyn Store`.
pub trait TypedStore: Store {
    fn write_value<T, C>(&self, path: &Path, value: &T, codec: &C) -> StoreResult<()>
    where
        T: Serialize + ?Sized,
        C: Codec,
    {
        let bytes = codec.encode(value)?;
        self.write(path, &bytes)
    }

    fn read_value<T, C>(&self, path: &Path, codec: &C) -> StoreResult<T>
    where
        T: DeserializeOwned,
        C: Codec,
    {
        let bytes = self.read(path)?;
        Ok(codec.decode(&bytes)?)
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> StoreResult<()> {
        self.write_value(path, value, &JsonCodec)
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> StoreResult<T> {
        self.read_value(path, &JsonCodec)
    }
}

impl<S: Store + ?Sized> TypedStore for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BincodeCodec;
    use crate::error::{CodecError, StoreError};
    use crate::TreeStore;
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Rect {
        origin: (f64, f64),
        size: (f64, f64),
    }

    fn p(text: &str) -> Path {
        text.parse().unwrap()
    }

    #[test]
    fn struct_roundtrip_through_json() {
        let store = TreeStore::new();
        let rect = Rect {
            origin: (1.0, 2.0),
            size: (3.0, 4.0),
        };
        store.write_json(&p("layout.frame"), &rect).unwrap();
        let back: Rect = store.read_json(&p("layout.frame")).unwrap();
        assert_eq!(back, rect);
    }

    #[test]
    fn struct_roundtrip_through_bincode() {
        let store = TreeStore::new();
        let rect = Rect {
            origin: (0.0, 0.0),
            size: (10.0, 5.0),
        };
        store
            .write_value(&p("frames[0]"), &rect, &BincodeCodec)
            .unwrap();
        let back: Rect = store.read_value(&p("frames[0]"), &BincodeCodec).unwrap();
        assert_eq!(back, rect);
    }

    #[test]
    fn decode_error_passes_through() {
        let store = TreeStore::new();
        store.write(&p("name"), b"not json").unwrap();
        let err = store.read_json::<String>(&p("name")).unwrap_err();
        assert!(matches!(err, StoreError::Codec(CodecError::Json(_))));
    }

    #[test]
    fn missing_value_is_store_error() {
        let store = TreeStore::new();
        assert!(matches!(
            store.read_json::<String>(&p("name")),
            Err(StoreError::DoesNotExist(_))
        ));
    }

    #[test]
    fn works_through_dyn_store() {
        let store: Arc<dyn Store> = Arc::new(TreeStore::new());
        store.write_json(&p("n"), &42u32).unwrap();
        assert_eq!(store.read_json::<u32>(&p("n")).unwrap(), 42);
        assert_eq!(store.read(&p("n")).unwrap(), b"42");
    }
}
