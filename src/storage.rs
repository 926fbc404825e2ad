use crate::logging::{log_event, LogLevel};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("storage rejected read of {key}")]
    Read { key: String },
    #[error("storage rejected write of {key}")]
    Write { key: String },
    #[error("value for {key} could not be encoded: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("value for {key} is not valid JSON: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`, or nothing when the browser refuses access.
#[cfg(target_arch = "wasm32")]
pub struct LocalStore(Option<web_sys::Storage>);

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> Self {
        Self(web_sys::window().and_then(|w| w.local_storage().ok().flatten()))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self.0.as_ref().ok_or(StorageError::Unavailable)?;
        storage.get_item(key).map_err(|_| StorageError::Read {
            key: key.to_string(),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.0.as_ref().ok_or(StorageError::Unavailable)?;
        storage.set_item(key, value).map_err(|_| StorageError::Write {
            key: key.to_string(),
        })
    }
}

/// A value mirrored into a key/value store as JSON. The in-memory copy is
/// authoritative; storage failures are logged and otherwise ignored.
pub struct PersistedValue<T, S> {
    key: String,
    value: T,
    store: S,
}

impl<T, S> PersistedValue<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub fn load(store: S, key: impl Into<String>, initial: impl FnOnce() -> T) -> Self {
        let key = key.into();
        let value = match read_json(&store, &key) {
            Ok(Some(value)) => value,
            Ok(None) => initial(),
            Err(err) => {
                report(&key, "storage_read_failed", &err);
                initial()
            }
        };

        Self { key, value, store }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    #[cfg(test)]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        if let Err(err) = write_json(&self.store, &self.key, &self.value) {
            report(&self.key, "storage_write_failed", &err);
        }
    }

    #[cfg(test)]
    pub fn update(&mut self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.value);
        self.set(next);
    }
}

fn read_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Decode {
            key: key.to_string(),
            source,
        })
}

fn write_json<T: Serialize>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

fn report(key: &str, event: &str, err: &StorageError) {
    log_event(
        LogLevel::Warn,
        event,
        json!({ "key": key, "error": err.to_string() }),
    );
}
