// ndeftag/src/tag_info.rs

use crate::ndef::NdefRecord;
use crate::types::TagId;

/// Snapshot of a physical tag at one point in time.
///
/// Produced by the probe at discovery and superseded by a fresh snapshot
/// after every write; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagInfo {
    /// Raw hardware identifier.
    pub id: TagId,
    /// Tag exposes an NDEF technology.
    pub is_supported: bool,
    /// Tag advertises the formatable marker.
    pub is_ndef_formatable: bool,
    /// Tag accepts writes (false for locked or formattable-only tags).
    pub is_writable: bool,
    /// Maximum NDEF message size the tag reports; 0 until formatted.
    pub capacity_bytes: usize,
    /// Records decoded from the tag's message; empty on a blank tag.
    pub records: Vec<NdefRecord>,
}

impl TagInfo {
    /// Snapshot knowing only identity and NDEF support; the remaining
    /// fields start at their blank values and are filled by the probe.
    pub fn new(id: TagId, is_supported: bool) -> Self {
        Self {
            id,
            is_supported,
            is_ndef_formatable: false,
            is_writable: false,
            capacity_bytes: 0,
            records: Vec::new(),
        }
    }

    /// Tag carries no decoded records (blank or erased).
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
            || self
                .records
                .iter()
                .all(|r| r.type_format == crate::types::TypeNameFormat::Empty)
    }

    /// Replace the record set, consuming self (snapshots stay immutable for
    /// callers holding clones).
    pub fn with_records(mut self, records: Vec<NdefRecord>) -> Self {
        self.records = records;
        self
    }
}
