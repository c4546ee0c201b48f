//! Key-value persistence for a single storefront profile.
//!
//! Every store (session, cart, orders, catalog) lives under one fixed key
//! and is serialized as JSON text. Backends only move strings around; the
//! typed view is [`Record`].

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const SESSION_KEY: &str = "skincare_auth_user";
pub const CART_KEY: &str = "skincare_cart";
pub const ORDERS_KEY: &str = "skincare_orders";
pub const PRODUCTS_KEY: &str = "products";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A flat string-to-string mapping, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

/// Typed repository over one key of a [`KeyValueStore`].
///
/// Reads never fail on bad data: a value that does not parse is reported
/// and treated as absent.
///
/// Clones share one write lock. Read-modify-write sequences hold
/// [`Record::lock`] for their whole duration, so concurrent writers through
/// the same record never overwrite each other.
pub struct Record<T> {
    store: SharedStore,
    key: &'static str,
    writes: Arc<Mutex<()>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Record<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            writes: self.writes.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Record<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: SharedStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            writes: Arc::new(Mutex::new(())),
            _marker: PhantomData,
        }
    }

    /// Serializes writers of this record until the guard is dropped.
    pub fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.writes.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn get(&self) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "ignoring malformed record");
                Ok(None)
            }
        }
    }

    pub fn put(&self, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.store.put(self.key, &raw)
    }

    pub fn delete(&self) -> Result<(), StoreError> {
        self.store.delete(self.key)
    }
}

impl<T> Record<Vec<T>>
where
    T: Serialize + DeserializeOwned,
{
    /// The stored list, or an empty one when the key is missing or corrupt.
    pub fn list(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.get()?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Line {
        id: String,
        qty: u32,
    }

    fn record() -> (SharedStore, Record<Vec<Line>>) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let record = Record::new(store.clone(), "lines");
        (store, record)
    }

    #[test]
    fn missing_key_reads_as_empty_list() {
        let (_, record) = record();
        assert!(record.get().unwrap().is_none());
        assert!(record.list().unwrap().is_empty());
    }

    #[test]
    fn malformed_value_reads_as_absent() {
        let (store, record) = record();
        store.put("lines", "{not json").unwrap();
        assert!(record.get().unwrap().is_none());
        assert!(record.list().unwrap().is_empty());
    }

    #[test]
    fn put_then_delete() {
        let (store, record) = record();
        record
            .put(&vec![Line {
                id: "a".into(),
                qty: 2,
            }])
            .unwrap();
        assert_eq!(store.get("lines").unwrap().as_deref(), Some(r#"[{"id":"a","qty":2}]"#));

        record.delete().unwrap();
        assert!(store.get("lines").unwrap().is_none());
    }
}
