//! Reading and writing the [`PreferenceRecord`] through a host
//! [`OptionStore`].
//!
//! The record lives under one fixed key.  Older hosts hand the value back
//! either as a structured document or as its JSON text; [`PreferenceStore`]
//! resolves that once, here, so nothing else in the crate sees the
//! difference.  Writes always use the textual encoding.

use crate::preferences::PreferenceRecord;
use crate::traits::OptionStore;
use log::{debug, info};
use serde_json::Value;

/// The well-known option key the record is stored under.
pub const OPTION_KEY: &str = "dsWorkspaceToggle";

/// Errors from loading or saving preferences.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored value exists but does not decode to a record.
    #[error("malformed preferences under {key:?}: {source}")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[source] serde_json::Error),

    /// The host option store returned an error.
    #[error("option store error: {0}")]
    Host(String),
}

/// Decode a stored value that is either JSON text or a structured document.
pub fn decode_stored(value: Value) -> Result<PreferenceRecord, serde_json::Error> {
    match value {
        Value::String(text) => {
            debug!("decoding textual preference document");
            serde_json::from_str(&text)
        }
        other => {
            debug!("decoding structured preference document");
            serde_json::from_value(other)
        }
    }
}

/// Encode `record` in the storage representation written by [`PreferenceStore::save`].
pub fn encode_stored(record: &PreferenceRecord) -> Result<Value, serde_json::Error> {
    serde_json::to_string(record).map(Value::String)
}

/// Loads and saves the preference record under [`OPTION_KEY`].
pub struct PreferenceStore<S: OptionStore> {
    options: S,
}

impl<S: OptionStore> PreferenceStore<S> {
    pub fn new(options: S) -> Self {
        Self { options }
    }

    #[cfg(test)]
    fn options(&self) -> &S {
        &self.options
    }

    /// Fetch the record, or [`PreferenceRecord::default`] when nothing has
    /// been stored yet.
    ///
    /// A value that fails to decode is reported as
    /// [`StoreError::Malformed`]; it is never silently replaced.
    pub fn load(&self) -> Result<PreferenceRecord, StoreError> {
        let stored = self
            .options
            .get(OPTION_KEY)
            .map_err(|e| StoreError::Host(e.to_string()))?;

        match stored {
            None => {
                debug!("no stored preferences, using defaults");
                Ok(PreferenceRecord::default())
            }
            Some(value) => decode_stored(value).map_err(|source| StoreError::Malformed {
                key: OPTION_KEY,
                source,
            }),
        }
    }

    /// Overwrite the stored record with `record`.
    pub fn save(&self, record: &PreferenceRecord) -> Result<(), StoreError> {
        let value = encode_stored(record).map_err(StoreError::Encode)?;
        self.options
            .set(OPTION_KEY, value)
            .map_err(|e| StoreError::Host(e.to_string()))?;
        info!(
            "saved {} workspace(s), hotkey {}",
            record.workspaces.len(),
            record.hotkey
        );
        Ok(())
    }
}
