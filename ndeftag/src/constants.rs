// ndeftag/src/constants.rs
//! Common NDEF wire constants used across the crate

/// Record header flag: Message Begin
pub const FLAG_MB: u8 = 0x80;

/// Record header flag: Message End
pub const FLAG_ME: u8 = 0x40;

/// Record header flag: Chunk Flag (chunked records are not supported)
pub const FLAG_CF: u8 = 0x20;

/// Record header flag: Short Record (1-byte payload length)
pub const FLAG_SR: u8 = 0x10;

/// Record header flag: ID Length field present
pub const FLAG_IL: u8 = 0x08;

/// Mask for the 3-bit Type Name Format field of the header byte
pub const TNF_MASK: u8 = 0x07;

/// Well-known record type for NFC Forum text records ("T")
pub const RTD_TEXT: &[u8] = b"T";

/// Text record status byte: UTF-16 encoding flag (clear = UTF-8)
pub const TEXT_UTF16_FLAG: u8 = 0x80;

/// Text record status byte: mask for the language code length
pub const TEXT_LANG_LEN_MASK: u8 = 0x3F;

/// Maximum payload length representable by a short record
pub const SHORT_RECORD_MAX_PAYLOAD: usize = 255;

/// ISO-639-1 language codes are two letters
pub const LANGUAGE_CODE_LEN: usize = 2;

/// Raw-memory bootstrap block 1: write the capability container to page 3
/// (mapping version 1.0, 48 bytes available, read/write allowed).
pub const BOOTSTRAP_CAPABILITY_CONTAINER: [u8; 6] = [0xA2, 0x03, 0xE1, 0x10, 0x06, 0x00];

/// Raw-memory bootstrap block 2: write an empty NDEF TLV plus terminator TLV
/// to page 4.
pub const BOOTSTRAP_EMPTY_NDEF_TLV: [u8; 6] = [0xA2, 0x04, 0x03, 0x00, 0xFE, 0x00];
