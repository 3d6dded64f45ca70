// ndeftag/src/probe.rs

//! Classifies a freshly discovered tag. Pure inspection: nothing here
//! connects to or mutates the tag, and the result is a one-shot snapshot the
//! session branches on.

use log::debug;

use crate::ndef::message;
use crate::tag::TagHandle;
use crate::tag_info::TagInfo;

/// Inspect `handle` and report which operations are available.
///
/// Capacity and writability come only from the NDEF technology; a
/// formattable-only tag reports capacity 0 and not-writable until formatted.
/// A malformed cached message leaves `records` empty rather than failing the
/// probe; the read path reports such tags as a format error when actually
/// read.
pub fn probe(handle: &mut dyn TagHandle) -> TagInfo {
    let mut info = TagInfo::new(handle.id(), handle.has_ndef());
    info.is_ndef_formatable = handle.is_ndef_formatable();

    if let Some(ndef) = handle.ndef() {
        info.capacity_bytes = ndef.max_size();
        info.is_writable = ndef.is_writable();
        if let Some(bytes) = ndef.cached_message() {
            match message::parse(&bytes) {
                Ok(records) => info.records = records,
                Err(err) => {
                    debug!("tag {}: cached message unreadable: {err}", info.id);
                }
            }
        }
    }
    info
}
