// ndeftag/src/tag/traits.rs

//! Capability traits abstracting the physical tag away from the session
//! logic. A platform layer implements these over its own tag plumbing; tests
//! use [`MockTag`](crate::tag::mock::MockTag).

use crate::types::TagId;
use crate::Result;

/// NDEF technology of a tag that already carries (or accepts) an NDEF
/// message. Connection is exclusive; all calls between `connect` and `close`
/// block with hardware-dependent latency.
pub trait NdefTech {
    fn connect(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn is_connected(&self) -> bool;

    fn is_writable(&self) -> bool;

    /// Maximum NDEF message size in bytes the tag reports.
    fn max_size(&self) -> usize;

    /// Message bytes cached at discovery time, if any. Available without a
    /// connection.
    fn cached_message(&self) -> Option<Vec<u8>>;

    /// Read the live message. Requires a connection.
    fn read_message(&mut self) -> Result<Vec<u8>>;

    /// Write a full wire message. Requires a connection.
    fn write_message(&mut self, message: &[u8]) -> Result<()>;

    fn can_make_read_only(&self) -> bool;

    /// Permanently lock the tag. Irreversible on real hardware.
    fn make_read_only(&mut self) -> Result<()>;
}

/// Technology of a blank-but-formattable tag. `format` writes the initial
/// NDEF structure together with the first message.
pub trait FormatTech {
    fn connect(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn is_connected(&self) -> bool;
    fn format(&mut self, message: &[u8]) -> Result<()>;
    fn format_read_only(&mut self, message: &[u8]) -> Result<()>;
}

/// Raw memory access for chip families whose `format` is known to fail.
/// The session controller uses this to bootstrap a capability container
/// before retrying the write through the NDEF technology.
pub trait RawMemoryTech {
    fn connect(&mut self) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn transceive(&mut self, command: &[u8]) -> Result<Vec<u8>>;
}

/// One discovered physical tag and the technologies it exposes. The session
/// controller owns at most one handle at a time and serializes all access.
pub trait TagHandle {
    fn id(&self) -> TagId;

    /// Does the tag expose a currently-connectable NDEF technology?
    fn has_ndef(&self) -> bool;

    /// Does the tag advertise the formatable marker? A true here does not
    /// guarantee `formatable()` returns a technology.
    fn is_ndef_formatable(&self) -> bool;

    fn ndef(&mut self) -> Option<&mut dyn NdefTech>;
    fn formatable(&mut self) -> Option<&mut dyn FormatTech>;
    fn raw_memory(&mut self) -> Option<&mut dyn RawMemoryTech>;
}
