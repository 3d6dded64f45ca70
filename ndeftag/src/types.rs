// ndeftag/src/types.rs

use std::fmt;

/// Raw tag identifier - Newtype Pattern (variable length, hardware dependent)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagId(Vec<u8>);

impl TagId {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(self.0.len() * 2);
        for b in &self.0 {
            use std::fmt::Write;
            // write! never fails writing to a String
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// NDEF Type Name Format (the 3-bit TNF field of a record header).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeNameFormat {
    #[default]
    Empty = 0x00,
    WellKnown = 0x01,
    Mime = 0x02,
    Uri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    Unchanged = 0x06,
    Reserved = 0x07,
}

impl TypeNameFormat {
    /// Decode the low 3 bits of a header byte into a TypeNameFormat.
    /// All eight values are defined, so this never fails.
    pub fn from_bits(bits: u8) -> Self {
        match bits & crate::constants::TNF_MASK {
            0x00 => Self::Empty,
            0x01 => Self::WellKnown,
            0x02 => Self::Mime,
            0x03 => Self::Uri,
            0x04 => Self::External,
            0x05 => Self::Unknown,
            0x06 => Self::Unchanged,
            _ => Self::Reserved,
        }
    }

    /// The wire value of this TNF.
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// True for the formats this implementation never emits
    /// (Unknown/Unchanged/Reserved).
    pub fn is_unemittable(self) -> bool {
        matches!(self, Self::Unknown | Self::Unchanged | Self::Reserved)
    }
}

/// Session controller state (single tag handle, single operation in flight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Connected,
    Reading,
    Writing,
    Formatting,
}
