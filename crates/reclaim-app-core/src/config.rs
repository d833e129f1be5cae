// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Keyed JSON config: a storage port plus a typed service on top of it.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::prefs::{RunPrefs, RUN_PREFS_KEY};

/// Byte-level storage for config blobs, one blob per key.
pub trait ConfigStore {
    /// Raw blob stored under `key`; [`ConfigError::NotFound`] when absent.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replace the blob stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Failures raised by config stores and [`ConfigService`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No blob under the requested key.
    #[error("config key not found")]
    NotFound,
    /// Key is empty or contains characters a store cannot map to a name.
    #[error("invalid config key {0:?}")]
    InvalidKey(String),
    /// Underlying storage failed.
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    /// Blob under `key` is not valid JSON for the requested type.
    #[error("config key {key:?} is corrupt: {source}")]
    Corrupt {
        /// Key whose blob failed to decode.
        key: String,
        /// Decoder error.
        source: serde_json::Error,
    },
    /// Value could not be encoded.
    #[error("config encode: {0}")]
    Encode(#[from] serde_json::Error),
    /// Store-specific failure.
    #[error("config: {0}")]
    Other(String),
}

/// Rejects keys that cannot safely name a blob (empty, separators, dots).
pub fn validate_key(key: &str) -> Result<(), ConfigError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidKey(key.to_owned()))
    }
}

/// Typed JSON access to a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Unwrap the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Decode the value under `key`. Missing or empty blobs load as `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        validate_key(key)?;
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => return Ok(None),
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ConfigError::Corrupt {
                key: key.to_owned(),
                source,
            })
    }

    /// Like [`load`](Self::load), with `T::default()` for a missing key.
    pub fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, ConfigError> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Encode `value` as pretty JSON under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        validate_key(key)?;
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }

    /// Stored run preferences, or the defaults.
    pub fn run_prefs(&self) -> Result<RunPrefs, ConfigError> {
        self.load_or_default(RUN_PREFS_KEY)
    }

    /// Persist run preferences.
    pub fn save_run_prefs(&self, prefs: &RunPrefs) -> Result<(), ConfigError> {
        self.save(RUN_PREFS_KEY, prefs)
    }
}
