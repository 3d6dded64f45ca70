// ndeftag/src/ndef/message.rs

//! Assembles and disassembles ordered record sequences into the NDEF wire
//! message. A message is never empty on the wire: an "empty" message is
//! exactly one Empty-format record.

use crate::ndef::codec;
use crate::ndef::record::NdefRecord;
use crate::ndef::wire::RawRecord;
use crate::{Error, Result};

/// Encode `records` into a wire message.
///
/// Records whose codec output is `None` (Unknown/Unchanged/Reserved) are
/// silently dropped. If nothing encodable remains the build is rejected;
/// callers needing an erase pass the Empty sentinel explicitly. When
/// `capacity` is given, a serialized size above it fails with
/// `CapacityExceeded` before anything is handed to the tag.
pub fn build(
    records: &[NdefRecord],
    default_language: &str,
    capacity: Option<usize>,
) -> Result<Vec<u8>> {
    let raws = encode_records(records, default_language)?;

    let total: usize = raws.iter().map(RawRecord::encoded_len).sum();
    if let Some(available) = capacity {
        if total > available {
            return Err(Error::CapacityExceeded {
                required: total,
                available,
            });
        }
    }

    let last = raws.len() - 1;
    let mut out = Vec::with_capacity(total);
    for (i, raw) in raws.iter().enumerate() {
        out.extend_from_slice(&raw.encode(i == 0, i == last)?);
    }
    Ok(out)
}

/// Serialized size of `records`, as `build` would produce it. Used for the
/// pre-write capacity check against a tag's reported maximum.
pub fn total_size(records: &[NdefRecord], default_language: &str) -> Result<usize> {
    let raws = encode_records(records, default_language)?;
    Ok(raws.iter().map(RawRecord::encoded_len).sum())
}

/// Decode a wire message into its records, in wire order.
///
/// A decode failure of any single record aborts the whole parse; partial
/// messages are never surfaced.
pub fn parse(data: &[u8]) -> Result<Vec<NdefRecord>> {
    if data.is_empty() {
        return Err(Error::Format("empty ndef message".to_string()));
    }

    let mut records = Vec::new();
    let mut offset = 0;
    loop {
        let (raw, next, message_end) = RawRecord::decode(data, offset).map_err(|e| match e {
            Error::InvalidLength { expected, actual } => Error::Format(format!(
                "truncated record: need {expected} bytes, have {actual}"
            )),
            other => other,
        })?;
        records.push(codec::decode(&raw)?);
        offset = next;
        if message_end {
            break;
        }
        if offset >= data.len() {
            return Err(Error::Format("message ended without ME flag".to_string()));
        }
    }
    if offset != data.len() {
        return Err(Error::Format(format!(
            "{} trailing bytes after final record",
            data.len() - offset
        )));
    }
    Ok(records)
}

/// The canonical empty message: exactly one Empty-format record.
pub fn empty_message() -> Vec<NdefRecord> {
    vec![NdefRecord::empty()]
}

fn encode_records(records: &[NdefRecord], default_language: &str) -> Result<Vec<RawRecord>> {
    let mut raws = Vec::with_capacity(records.len());
    for record in records {
        if let Some(raw) = codec::encode(record, default_language)? {
            raws.push(raw);
        }
    }
    if raws.is_empty() {
        return Err(Error::Format(
            "no encodable records; use the empty sentinel to erase".to_string(),
        ));
    }
    Ok(raws)
}
