// ndeftag/src/tag/mock.rs

//! Mock tag for unit tests. Each technology records what was written to it
//! and exposes failure knobs so session error paths can be driven
//! deterministically.

use crate::tag::traits::{FormatTech, NdefTech, RawMemoryTech, TagHandle};
use crate::types::TagId;
use crate::{Error, Result};

/// Mock NDEF technology with scriptable failures.
#[derive(Debug, Default)]
pub struct MockNdef {
    pub connected: bool,
    pub writable: bool,
    pub max_size: usize,
    pub cached: Option<Vec<u8>>,
    /// Every message written through this technology, in order.
    pub written: Vec<Vec<u8>>,
    pub can_lock: bool,
    pub locked: bool,
    /// Number of connect calls that should fail
    pub connect_failures: usize,
    /// Number of write calls that should fail
    pub write_failures: usize,
    /// When set, the next write reports the tag as lost
    pub lose_tag_on_write: bool,
    /// When set, make_read_only fails
    pub lock_failures: usize,
}

impl MockNdef {
    pub fn new(max_size: usize, writable: bool, cached: Option<Vec<u8>>) -> Self {
        Self {
            writable,
            max_size,
            cached,
            can_lock: true,
            ..Self::default()
        }
    }
}

impl NdefTech for MockNdef {
    fn connect(&mut self) -> Result<()> {
        if self.connect_failures > 0 {
            self.connect_failures -= 1;
            return Err(Error::MissingTag);
        }
        self.connected = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn is_writable(&self) -> bool {
        self.writable && !self.locked
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn cached_message(&self) -> Option<Vec<u8>> {
        self.cached.clone()
    }

    fn read_message(&mut self) -> Result<Vec<u8>> {
        if !self.connected {
            return Err(Error::Write("ndef technology not connected".to_string()));
        }
        self.cached.clone().ok_or(Error::Format("tag carries no message".to_string()))
    }

    fn write_message(&mut self, message: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::Write("ndef technology not connected".to_string()));
        }
        if self.lose_tag_on_write {
            self.lose_tag_on_write = false;
            return Err(Error::TagLost);
        }
        if self.write_failures > 0 {
            self.write_failures -= 1;
            return Err(Error::Write("simulated write failure".to_string()));
        }
        self.written.push(message.to_vec());
        self.cached = Some(message.to_vec());
        Ok(())
    }

    fn can_make_read_only(&self) -> bool {
        self.can_lock
    }

    fn make_read_only(&mut self) -> Result<()> {
        if self.lock_failures > 0 {
            self.lock_failures -= 1;
            return Err(Error::Write("simulated lock failure".to_string()));
        }
        self.locked = true;
        Ok(())
    }
}

/// Mock formatable technology.
#[derive(Debug, Default)]
pub struct MockFormatable {
    pub connected: bool,
    /// Messages formatted onto the tag, in order.
    pub formatted: Vec<Vec<u8>>,
    pub formatted_read_only: bool,
    /// Number of format calls that should fail (models chip families whose
    /// format is rejected).
    pub format_failures: usize,
    pub connect_failures: usize,
}

impl FormatTech for MockFormatable {
    fn connect(&mut self) -> Result<()> {
        if self.connect_failures > 0 {
            self.connect_failures -= 1;
            return Err(Error::MissingTag);
        }
        self.connected = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn format(&mut self, message: &[u8]) -> Result<()> {
        if self.format_failures > 0 {
            self.format_failures -= 1;
            return Err(Error::Write("simulated format failure".to_string()));
        }
        self.formatted.push(message.to_vec());
        Ok(())
    }

    fn format_read_only(&mut self, message: &[u8]) -> Result<()> {
        self.format(message)?;
        self.formatted_read_only = true;
        Ok(())
    }
}

/// Mock raw-memory technology recording transceived command blocks.
#[derive(Debug, Default)]
pub struct MockRawMemory {
    pub connected: bool,
    pub transceived: Vec<Vec<u8>>,
    pub transceive_failures: usize,
}

impl RawMemoryTech for MockRawMemory {
    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }

    fn transceive(&mut self, command: &[u8]) -> Result<Vec<u8>> {
        if self.transceive_failures > 0 {
            self.transceive_failures -= 1;
            return Err(Error::Write("simulated transceive failure".to_string()));
        }
        self.transceived.push(command.to_vec());
        Ok(vec![0x0A]) // ACK
    }
}

/// Mock tag handle combining the technologies a test needs.
#[derive(Debug, Default)]
pub struct MockTag {
    pub id: Vec<u8>,
    pub ndef: Option<MockNdef>,
    pub formatable: Option<MockFormatable>,
    pub raw: Option<MockRawMemory>,
    /// NDEF technology that becomes available once the tag has been
    /// formatted or bootstrapped through raw memory.
    pub ndef_after_format: Option<MockNdef>,
    /// Advertise the formatable marker even when no technology is returned
    /// (observed on some hardware).
    pub formatable_marker: bool,
}

impl MockTag {
    /// A tag that already exposes NDEF.
    pub fn with_ndef(
        id: impl Into<Vec<u8>>,
        max_size: usize,
        writable: bool,
        cached: Option<Vec<u8>>,
    ) -> Self {
        Self {
            id: id.into(),
            ndef: Some(MockNdef::new(max_size, writable, cached)),
            ..Self::default()
        }
    }

    /// A blank but formattable tag whose NDEF technology appears after a
    /// successful format or bootstrap.
    pub fn blank_formattable(id: impl Into<Vec<u8>>, max_size: usize) -> Self {
        Self {
            id: id.into(),
            formatable: Some(MockFormatable::default()),
            formatable_marker: true,
            ndef_after_format: Some(MockNdef::new(max_size, true, None)),
            ..Self::default()
        }
    }

    /// A blank chip whose `format` always fails but which accepts the
    /// raw-memory bootstrap (ultralight-style).
    pub fn blank_chip(id: impl Into<Vec<u8>>, max_size: usize) -> Self {
        let mut tag = Self::blank_formattable(id, max_size);
        if let Some(f) = tag.formatable.as_mut() {
            f.format_failures = usize::MAX;
        }
        tag.raw = Some(MockRawMemory::default());
        tag
    }

    /// A tag exposing neither NDEF nor a formatable technology.
    pub fn unsupported(id: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    fn bootstrap_done(&self) -> bool {
        self.raw.as_ref().is_some_and(|r| r.transceived.len() >= 2)
    }

    fn format_done(&self) -> bool {
        self.formatable
            .as_ref()
            .is_some_and(|f| !f.formatted.is_empty())
    }

    /// Move the deferred NDEF technology into place once the tag has been
    /// initialized by either path.
    fn maybe_promote(&mut self) {
        if self.ndef.is_some() || self.ndef_after_format.is_none() {
            return;
        }
        if self.bootstrap_done() {
            self.ndef = self.ndef_after_format.take();
        } else if self.format_done() {
            let mut ndef = self.ndef_after_format.take().expect("checked above");
            if let Some(f) = self.formatable.as_ref() {
                ndef.cached = f.formatted.last().cloned();
                ndef.locked = f.formatted_read_only;
            }
            self.ndef = Some(ndef);
        }
    }
}

impl TagHandle for MockTag {
    fn id(&self) -> TagId {
        TagId::from_bytes(self.id.clone())
    }

    fn has_ndef(&self) -> bool {
        self.ndef.is_some()
            || (self.ndef_after_format.is_some() && (self.bootstrap_done() || self.format_done()))
    }

    fn is_ndef_formatable(&self) -> bool {
        self.formatable_marker || self.formatable.is_some()
    }

    fn ndef(&mut self) -> Option<&mut dyn NdefTech> {
        self.maybe_promote();
        self.ndef.as_mut().map(|n| n as &mut dyn NdefTech)
    }

    fn formatable(&mut self) -> Option<&mut dyn FormatTech> {
        self.formatable.as_mut().map(|f| f as &mut dyn FormatTech)
    }

    fn raw_memory(&mut self) -> Option<&mut dyn RawMemoryTech> {
        self.raw.as_mut().map(|r| r as &mut dyn RawMemoryTech)
    }
}
