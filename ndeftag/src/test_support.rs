// ndeftag/src/test_support.rs

//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common mock-tag and controller setup so tests
//! across the crate and tests/ directory can reuse the same logic.
#![allow(dead_code)]

use crate::config::{ConfigStore, Configuration};
use crate::ndef::{message, NdefRecord};
use crate::session::SessionController;
use crate::tag::MockTag;

/// A controller over a default configuration store.
#[doc(hidden)]
pub fn default_controller() -> SessionController {
    SessionController::new(ConfigStore::new(Configuration::default()))
}

/// Wire bytes for a single well-known text record.
#[doc(hidden)]
pub fn text_message_bytes(text: &str) -> Vec<u8> {
    message::build(&[NdefRecord::text(text, None)], "en", None)
        .expect("text message must build")
}

/// An already-NDEF tag preloaded with a single text record.
#[doc(hidden)]
pub fn ndef_tag_with_text(id: &[u8], capacity: usize, text: &str) -> MockTag {
    MockTag::with_ndef(id.to_vec(), capacity, true, Some(text_message_bytes(text)))
}

/// A controller that is armed for publishing and already holds `tag`.
#[doc(hidden)]
pub fn armed_controller(tag: MockTag) -> SessionController {
    let mut ctrl = default_controller();
    ctrl.start_listening();
    ctrl.start_publishing(false);
    ctrl.on_tag_discovered(Box::new(tag))
        .expect("discovery must succeed");
    ctrl
}
