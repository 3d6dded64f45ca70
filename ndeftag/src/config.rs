// ndeftag/src/config.rs

//! User-adjustable behavior: default language code for text records and the
//! user-facing error message table consumed by the session controller.

use std::sync::{Arc, RwLock};

use crate::Error;

/// User-facing message for each failure the session can surface.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorMessages {
    pub missing_tag: String,
    pub missing_tag_info: String,
    pub not_compliant_tag: String,
    pub read_only_tag: String,
    pub capacity_tag: String,
    pub write: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            missing_tag: "No tag found".to_string(),
            missing_tag_info: "No tag information provided".to_string(),
            not_compliant_tag: "Tag is not compliant".to_string(),
            read_only_tag: "Tag is not writable".to_string(),
            capacity_tag: "Tag's capacity is too low".to_string(),
            write: "Failed to write tag".to_string(),
        }
    }
}

/// Process-wide configuration, mutable only via [`ConfigStore::set`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// ISO-639-1 language code used for text records with no explicit code.
    pub default_language_code: String,
    pub messages: ErrorMessages,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            default_language_code: "en".to_string(),
            messages: ErrorMessages::default(),
        }
    }
}

impl Configuration {
    /// Merge another configuration into this one. Empty fields in `other`
    /// leave the current value untouched, so partial updates are possible.
    pub fn update(&mut self, other: Configuration) {
        if !other.default_language_code.is_empty() {
            self.default_language_code = other.default_language_code;
        }
        let m = other.messages;
        let dst = &mut self.messages;
        if !m.missing_tag.is_empty() {
            dst.missing_tag = m.missing_tag;
        }
        if !m.missing_tag_info.is_empty() {
            dst.missing_tag_info = m.missing_tag_info;
        }
        if !m.not_compliant_tag.is_empty() {
            dst.not_compliant_tag = m.not_compliant_tag;
        }
        if !m.read_only_tag.is_empty() {
            dst.read_only_tag = m.read_only_tag;
        }
        if !m.capacity_tag.is_empty() {
            dst.capacity_tag = m.capacity_tag;
        }
        if !m.write.is_empty() {
            dst.write = m.write;
        }
    }

    /// Look up the configured user-facing text for a session error.
    /// Codec-level errors fall back to their Display form.
    pub fn message_for(&self, error: &Error) -> String {
        match error {
            Error::MissingTag | Error::TagLost => self.messages.missing_tag.clone(),
            Error::MissingTagInfo => self.messages.missing_tag_info.clone(),
            Error::NotCompliantTag | Error::UnsupportedTag(_) => {
                self.messages.not_compliant_tag.clone()
            }
            Error::ReadOnlyTag => self.messages.read_only_tag.clone(),
            Error::CapacityExceeded { .. } => self.messages.capacity_tag.clone(),
            Error::Write(_) => self.messages.write.clone(),
            other => other.to_string(),
        }
    }
}

/// Shared configuration store with interior locking. The controller and the
/// embedding application hold clones of the same `Arc<ConfigStore>`.
#[derive(Debug, Default)]
pub struct ConfigStore {
    inner: RwLock<Configuration>,
}

impl ConfigStore {
    pub fn new(configuration: Configuration) -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(configuration),
        })
    }

    /// Snapshot of the current configuration.
    pub fn get(&self) -> Configuration {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Merge `configuration` into the stored one (see [`Configuration::update`]).
    pub fn set(&self, configuration: Configuration) {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .update(configuration);
    }
}
