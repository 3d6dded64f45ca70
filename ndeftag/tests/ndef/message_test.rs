#[path = "../common/mod.rs"]
mod common;

use ndeftag::ndef::{message, NdefRecord};
use ndeftag::Error;

#[test]
fn uri_message_first_byte_carries_uri_tnf() {
    let bytes = message::build(&[common::uri_record()], "en", None).unwrap();
    // MB | ME | SR set, TNF nibble = Uri (0x03)
    assert_eq!(bytes[0] & 0x07, 0x03);

    let parsed = message::parse(&bytes).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].uri.as_deref(), Some("https://example.com"));
}

#[test]
fn capacity_bound_is_enforced_before_any_write() {
    let records = vec![
        common::text_record("first"),
        NdefRecord::mime("application/octet-stream", vec![0u8; 64]),
    ];
    let exact = message::total_size(&records, "en").unwrap();

    // One byte short always fails, exact fit always succeeds
    match message::build(&records, "en", Some(exact - 1)) {
        Err(Error::CapacityExceeded {
            required,
            available,
        }) => {
            assert_eq!(required, exact);
            assert_eq!(available, exact - 1);
        }
        other => panic!("expected CapacityExceeded, got: {:?}", other),
    }
    assert!(message::build(&records, "en", Some(exact)).is_ok());
}

#[test]
fn empty_build_never_yields_zero_record_message() {
    assert!(message::build(&[], "en", None).is_err());
    // The explicit erase path goes through the sentinel
    let bytes = message::build(&message::empty_message(), "en", None).unwrap();
    assert_eq!(hex::encode(&bytes), "d00000");
    let parsed = message::parse(&bytes).unwrap();
    assert_eq!(parsed, vec![NdefRecord::empty()]);
}

#[test]
fn parse_failure_surfaces_no_partial_message() {
    let mut bytes = common::text_message_bytes("intact");
    // Append a second, truncated record and clear the ME flag of the first
    bytes[0] &= !0x40;
    bytes.push(0x51); // ME | SR | WellKnown, then nothing
    match message::parse(&bytes) {
        Err(Error::Format(_)) => {}
        other => panic!("expected Format, got: {:?}", other),
    }
}

#[test]
fn multi_record_message_preserves_wire_order() {
    let records = vec![
        common::text_record("a"),
        common::uri_record(),
        NdefRecord::external("example.com", "t", vec![1]),
    ];
    let bytes = message::build(&records, "en", None).unwrap();
    let parsed = message::parse(&bytes).unwrap();
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0].payload, b"a");
    assert_eq!(parsed[1].uri.as_deref(), Some("https://example.com"));
    assert_eq!(parsed[2].external_domain.as_deref(), Some("example.com"));
}
