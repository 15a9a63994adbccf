//! Key-value persistence over browser `localStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every persisted list in the app (assistants, analyses, contexts,
//! collaborators) goes through [`Persisted`], which keeps an in-memory copy and
//! a `loaded` flag so pages can tell "nothing stored" apart from "not read
//! yet". The first read happens from a client-side effect, so SSR never touches
//! storage.
//!
//! ERROR HANDLING
//! ==============
//! Corrupt or unreadable entries are logged and treated as absent. Write
//! failures are returned to the caller so the page can surface an alert.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage failures that callers may want to surface.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("failed to serialize value for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {key}: {message}")]
    Write { key: String, message: String },
}

/// Minimal string key-value backend.
pub trait StorageBackend {
    /// Raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the backend cannot be reached.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable or rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// The browser's `window.localStorage`.
///
/// Outside the `hydrate` build every call reports [`StorageError::Unavailable`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

impl StorageBackend for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(key).map_err(|_| StorageError::Unavailable)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.set_item(key, value).map_err(|e| StorageError::Write {
                key: key.to_owned(),
                message: format!("{e:?}"),
            })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.remove_item(key).map_err(|_| StorageError::Unavailable)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

/// In-process backend for tests and server rendering.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`, bypassing the trait's `Result`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Load a JSON value stored under `key`.
///
/// Unavailable storage and unparseable entries both yield `None`.
pub fn read_json<T: DeserializeOwned>(backend: &dyn StorageBackend, key: &str) -> Option<T> {
    let raw = match backend.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            log::debug!("storage read skipped for {key}: {e}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("discarding unreadable storage entry {key}: {e}");
            None
        }
    }
}

/// Serialize `value` as JSON under `key`.
///
/// # Errors
///
/// Returns an error if serialization fails or the backend rejects the write.
pub fn write_json<T: Serialize + ?Sized>(
    backend: &dyn StorageBackend,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_owned(),
        source,
    })?;
    backend.set_item(key, &raw)
}

/// Whether anything at all was ever written under `key`.
pub fn has_entry(backend: &dyn StorageBackend, key: &str) -> bool {
    matches!(backend.get_item(key), Ok(Some(_)))
}

/// A JSON value mirrored between memory and one storage key.
#[derive(Clone, Debug, PartialEq)]
pub struct Persisted<T> {
    key: String,
    value: T,
    loaded: bool,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Unloaded store holding `default` until [`Persisted::hydrate`] runs.
    pub fn new(key: impl Into<String>, default: T) -> Self {
        Self {
            key: key.into(),
            value: default,
            loaded: false,
        }
    }

    /// Perform the initial read. Keeps the current value when nothing usable
    /// is stored.
    pub fn hydrate(&mut self, backend: &dyn StorageBackend) {
        if let Some(value) = read_json(backend, &self.key) {
            self.value = value;
        }
        self.loaded = true;
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// True once the initial read has completed.
    #[must_use]
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the value and write it through.
    ///
    /// # Errors
    ///
    /// Returns the write failure; the in-memory value is updated regardless.
    pub fn set(&mut self, backend: &dyn StorageBackend, value: T) -> Result<(), StorageError> {
        self.value = value;
        write_json(backend, &self.key, &self.value)
    }

    /// Mutate the value in place and write it through.
    ///
    /// # Errors
    ///
    /// Returns the write failure; the in-memory value is updated regardless.
    pub fn update<R>(
        &mut self,
        backend: &dyn StorageBackend,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, StorageError> {
        let out = f(&mut self.value);
        write_json(backend, &self.key, &self.value)?;
        Ok(out)
    }
}
