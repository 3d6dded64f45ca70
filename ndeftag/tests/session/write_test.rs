#[path = "../common/mod.rs"]
mod common;

use ndeftag::ndef::NdefRecord;
use ndeftag::session::Event;
use ndeftag::tag::MockTag;
use ndeftag::types::SessionState;
use ndeftag::{Error, TagId, TagInfo};
use std::cell::RefCell;
use std::rc::Rc;

fn discovered_info(records: Vec<NdefRecord>) -> TagInfo {
    TagInfo::new(TagId::from_bytes(common::sample_id()), true).with_records(records)
}

#[test]
fn write_roundtrips_through_fresh_info() {
    let mut ctrl = common::armed_controller(common::blank_ndef_tag(256));
    let info = discovered_info(vec![common::text_record("stored"), common::uri_record()]);

    let fresh = ctrl.write(Some(&info), false).unwrap();
    assert_eq!(fresh.records.len(), 2);
    assert_eq!(fresh.records[0].payload, b"stored");
    assert_eq!(fresh.records[1].uri.as_deref(), Some("https://example.com"));
    assert_eq!(ctrl.state(), SessionState::Idle);
}

#[test]
fn oversized_message_is_rejected_before_touching_the_tag() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut ctrl = common::armed_controller(common::blank_ndef_tag(8));
    let sink = Rc::clone(&seen);
    ctrl.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    let info = discovered_info(vec![common::text_record("far too long for eight bytes")]);
    match ctrl.write(Some(&info), false) {
        Err(Error::CapacityExceeded { available, .. }) => assert_eq!(available, 8),
        other => panic!("expected CapacityExceeded, got: {:?}", other),
    }
    // Never connected, so no connect/disconnect events fired
    assert!(seen.borrow().is_empty());
    assert_eq!(ctrl.state(), SessionState::Idle);
}

#[test]
fn read_only_tag_is_rejected_before_capacity() {
    let mut tag = common::blank_ndef_tag(8);
    tag.ndef.as_mut().unwrap().writable = false;
    let mut ctrl = common::armed_controller(tag);

    // Both violations present; read-only wins
    let info = discovered_info(vec![common::text_record("far too long for eight bytes")]);
    assert!(matches!(ctrl.write(Some(&info), false), Err(Error::ReadOnlyTag)));
}

#[test]
fn clear_writes_exactly_one_empty_record() {
    let mut ctrl = common::armed_controller(common::ndef_tag(64, "old content"));
    let fresh = ctrl.clear(Some(&discovered_info(vec![]))).unwrap();
    assert_eq!(fresh.records, vec![NdefRecord::empty()]);
}

#[test]
fn lock_failure_does_not_roll_back_the_write() {
    let mut tag = common::blank_ndef_tag(64);
    tag.ndef.as_mut().unwrap().lock_failures = 1;
    let mut ctrl = common::armed_controller(tag);

    let fresh = ctrl
        .write(Some(&discovered_info(vec![common::text_record("kept")])), true)
        .unwrap();
    assert_eq!(fresh.records[0].payload, b"kept");
    // Lock failed, the tag stays writable
    assert!(fresh.is_writable);
}

#[test]
fn successful_lock_leaves_tag_read_only() {
    let mut ctrl = common::armed_controller(common::blank_ndef_tag(64));
    let fresh = ctrl
        .write(Some(&discovered_info(vec![common::text_record("sealed")])), true)
        .unwrap();
    assert!(!fresh.is_writable);
}

#[test]
fn tag_lost_mid_write_surfaces_and_disconnects_once() {
    let disconnects = Rc::new(RefCell::new(0));
    let mut tag = common::blank_ndef_tag(64);
    tag.ndef.as_mut().unwrap().lose_tag_on_write = true;
    let mut ctrl = common::armed_controller(tag);
    let sink = Rc::clone(&disconnects);
    ctrl.subscribe(move |e| {
        if matches!(e, Event::TagDisconnected) {
            *sink.borrow_mut() += 1;
        }
    });

    let result = ctrl.write(Some(&discovered_info(vec![common::text_record("x")])), false);
    assert!(matches!(result, Err(Error::TagLost)));
    assert_eq!(*disconnects.borrow(), 1);
    assert_eq!(ctrl.state(), SessionState::Idle);
}

#[test]
fn non_compliant_tag_is_rejected() {
    let mut ctrl = common::controller();
    ctrl.start_publishing(false);
    ctrl.on_tag_discovered(Box::new(MockTag::unsupported(common::sample_id())))
        .unwrap();

    let result = ctrl.write(Some(&discovered_info(vec![common::text_record("x")])), false);
    assert!(matches!(result, Err(Error::NotCompliantTag)));
    assert_eq!(ctrl.state(), SessionState::Idle);
}

#[test]
fn write_emits_connect_publish_disconnect_in_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut ctrl = common::armed_controller(common::blank_ndef_tag(64));
    let sink = Rc::clone(&seen);
    ctrl.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    ctrl.write(Some(&discovered_info(vec![common::text_record("evt")])), false)
        .unwrap();

    let events = seen.borrow();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], Event::TagConnected));
    match &events[1] {
        Event::MessagePublished(info) => assert_eq!(info.records[0].payload, b"evt"),
        other => panic!("expected MessagePublished, got: {:?}", other),
    }
    assert!(matches!(events[2], Event::TagDisconnected));
}

#[test]
fn armed_discovery_announces_format_mode() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut ctrl = common::controller();
    let sink = Rc::clone(&seen);
    ctrl.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    ctrl.start_publishing(true);
    ctrl.on_tag_discovered(Box::new(common::ndef_tag(64, "will be cleared")))
        .unwrap();

    match &seen.borrow()[0] {
        Event::TagDiscovered(info, format_mode) => {
            assert!(*format_mode);
            assert_eq!(info.records[0].payload, b"will be cleared");
        }
        other => panic!("expected TagDiscovered, got: {:?}", other),
    }
}
