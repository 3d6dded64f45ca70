//! Publishing to tags without NDEF: the format path and, when the chip
//! rejects `format`, the raw-memory bootstrap.

#[path = "../common/mod.rs"]
mod common;

use ndeftag::constants::{BOOTSTRAP_CAPABILITY_CONTAINER, BOOTSTRAP_EMPTY_NDEF_TLV};
use ndeftag::ndef::NdefRecord;
use ndeftag::session::Event;
use ndeftag::tag::{FormatTech, MockFormatable, MockNdef, MockTag, NdefTech, RawMemoryTech, TagHandle};
use ndeftag::types::SessionState;
use ndeftag::{Error, Result, TagId, TagInfo};
use std::cell::RefCell;
use std::rc::Rc;

fn discovered_info(records: Vec<NdefRecord>) -> TagInfo {
    TagInfo::new(TagId::from_bytes(common::sample_id()), true).with_records(records)
}

#[test]
fn blank_formattable_tag_is_formatted_and_published() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut ctrl = common::armed_controller(MockTag::blank_formattable(common::sample_id(), 137));
    let sink = Rc::clone(&seen);
    ctrl.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    let fresh = ctrl
        .write(Some(&discovered_info(vec![common::text_record("first")])), false)
        .unwrap();
    assert_eq!(fresh.records[0].payload, b"first");
    assert_eq!(fresh.capacity_bytes, 137);
    assert_eq!(ctrl.state(), SessionState::Idle);

    let events = seen.borrow();
    assert!(matches!(events[0], Event::TagConnected));
    assert!(matches!(events[1], Event::MessagePublished(_)));
    assert!(matches!(events[2], Event::TagDisconnected));
}

#[test]
fn format_read_only_leaves_tag_locked() {
    let mut ctrl = common::armed_controller(MockTag::blank_formattable(common::sample_id(), 64));
    let fresh = ctrl
        .write(Some(&discovered_info(vec![common::text_record("sealed")])), true)
        .unwrap();
    assert!(!fresh.is_writable);
}

#[test]
fn rejected_format_falls_back_to_raw_memory_bootstrap() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let transceived = Rc::new(RefCell::new(Vec::new()));
    let tag = ChipTag::new(common::sample_id(), 48, Rc::clone(&transceived));

    let mut ctrl = common::controller();
    ctrl.start_publishing(false);
    ctrl.on_tag_discovered(Box::new(tag)).unwrap();
    let sink = Rc::clone(&seen);
    ctrl.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    let fresh = ctrl
        .write(Some(&discovered_info(vec![common::text_record("bootstrapped")])), false)
        .unwrap();

    // Capability container first, then the empty NDEF placeholder
    assert_eq!(
        *transceived.borrow(),
        vec![
            BOOTSTRAP_CAPABILITY_CONTAINER.to_vec(),
            BOOTSTRAP_EMPTY_NDEF_TLV.to_vec(),
        ]
    );
    // The real message landed through the reacquired NDEF technology
    assert_eq!(fresh.records[0].payload, b"bootstrapped");
    assert!(seen
        .borrow()
        .iter()
        .any(|e| matches!(e, Event::MessagePublished(_))));
    assert_eq!(ctrl.state(), SessionState::Idle);
}

#[test]
fn bootstrap_without_raw_memory_is_a_write_error() {
    let disconnects = Rc::new(RefCell::new(0));
    let mut tag = MockTag::blank_formattable(common::sample_id(), 64);
    tag.formatable.as_mut().unwrap().format_failures = 1;
    // No raw memory technology on this tag

    let mut ctrl = common::armed_controller(tag);
    let sink = Rc::clone(&disconnects);
    ctrl.subscribe(move |e| {
        if matches!(e, Event::TagDisconnected) {
            *sink.borrow_mut() += 1;
        }
    });

    let result = ctrl.write(Some(&discovered_info(vec![common::text_record("x")])), false);
    assert!(matches!(result, Err(Error::Write(_))));
    assert_eq!(*disconnects.borrow(), 1);
    assert_eq!(ctrl.state(), SessionState::Idle);
}

#[test]
fn failed_final_write_after_bootstrap_surfaces() {
    let transceived = Rc::new(RefCell::new(Vec::new()));
    let mut tag = ChipTag::new(common::sample_id(), 48, Rc::clone(&transceived));
    tag.ndef_after_bootstrap.as_mut().unwrap().write_failures = 1;

    let mut ctrl = common::controller();
    ctrl.start_publishing(false);
    ctrl.on_tag_discovered(Box::new(tag)).unwrap();

    let result = ctrl.write(Some(&discovered_info(vec![common::text_record("x")])), false);
    assert!(matches!(result, Err(Error::Write(_))));
    // The init blocks still went out before the write failed
    assert_eq!(transceived.borrow().len(), 2);
    assert_eq!(ctrl.state(), SessionState::Idle);
}

#[test]
fn tag_lost_during_format_still_closes_the_technology() {
    let connected = Rc::new(RefCell::new(false));
    let tag = FormatOnlyTag {
        id: common::sample_id(),
        formatable: VanishingFormatable {
            connected: Rc::clone(&connected),
        },
    };

    let mut ctrl = common::controller();
    ctrl.start_publishing(false);
    ctrl.on_tag_discovered(Box::new(tag)).unwrap();

    let result = ctrl.write(Some(&discovered_info(vec![common::text_record("x")])), false);
    assert!(matches!(result, Err(Error::TagLost)));
    // The format technology was closed on the way out, not just dropped
    assert!(!*connected.borrow());
    assert_eq!(ctrl.state(), SessionState::Idle);
}

/// Format technology whose tag disappears mid-format, mirroring its
/// connection state into shared storage so the test can inspect it after
/// the session released the handle.
struct VanishingFormatable {
    connected: Rc<RefCell<bool>>,
}

impl FormatTech for VanishingFormatable {
    fn connect(&mut self) -> Result<()> {
        *self.connected.borrow_mut() = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        *self.connected.borrow_mut() = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    fn format(&mut self, _message: &[u8]) -> Result<()> {
        Err(Error::TagLost)
    }

    fn format_read_only(&mut self, message: &[u8]) -> Result<()> {
        self.format(message)
    }
}

struct FormatOnlyTag {
    id: Vec<u8>,
    formatable: VanishingFormatable,
}

impl TagHandle for FormatOnlyTag {
    fn id(&self) -> TagId {
        TagId::from_bytes(self.id.clone())
    }

    fn has_ndef(&self) -> bool {
        false
    }

    fn is_ndef_formatable(&self) -> bool {
        true
    }

    fn ndef(&mut self) -> Option<&mut dyn NdefTech> {
        None
    }

    fn formatable(&mut self) -> Option<&mut dyn FormatTech> {
        Some(&mut self.formatable)
    }

    fn raw_memory(&mut self) -> Option<&mut dyn RawMemoryTech> {
        None
    }
}

/// Raw memory access mirroring every command block into a shared log so the
/// test can inspect it after the session released the handle.
struct SpyRawMemory {
    log: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl RawMemoryTech for SpyRawMemory {
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn transceive(&mut self, command: &[u8]) -> Result<Vec<u8>> {
        self.log.borrow_mut().push(command.to_vec());
        Ok(vec![0x0A])
    }
}

/// Blank chip whose `format` is always rejected, modelled after chip
/// families that only accept the raw-memory initialization sequence.
struct ChipTag {
    id: Vec<u8>,
    formatable: MockFormatable,
    raw: SpyRawMemory,
    ndef: Option<MockNdef>,
    ndef_after_bootstrap: Option<MockNdef>,
}

impl ChipTag {
    fn new(id: Vec<u8>, max_size: usize, log: Rc<RefCell<Vec<Vec<u8>>>>) -> Self {
        let mut formatable = MockFormatable::default();
        formatable.format_failures = usize::MAX;
        Self {
            id,
            formatable,
            raw: SpyRawMemory { log },
            ndef: None,
            ndef_after_bootstrap: Some(MockNdef::new(max_size, true, None)),
        }
    }

    fn bootstrapped(&self) -> bool {
        self.raw.log.borrow().len() >= 2
    }
}

impl TagHandle for ChipTag {
    fn id(&self) -> TagId {
        TagId::from_bytes(self.id.clone())
    }

    fn has_ndef(&self) -> bool {
        self.ndef.is_some() || (self.ndef_after_bootstrap.is_some() && self.bootstrapped())
    }

    fn is_ndef_formatable(&self) -> bool {
        true
    }

    fn ndef(&mut self) -> Option<&mut dyn NdefTech> {
        if self.ndef.is_none() && self.bootstrapped() {
            self.ndef = self.ndef_after_bootstrap.take();
        }
        self.ndef.as_mut().map(|n| n as &mut dyn NdefTech)
    }

    fn formatable(&mut self) -> Option<&mut dyn FormatTech> {
        Some(&mut self.formatable)
    }

    fn raw_memory(&mut self) -> Option<&mut dyn RawMemoryTech> {
        Some(&mut self.raw)
    }
}
