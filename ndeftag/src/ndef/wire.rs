// ndeftag/src/ndef/wire.rs

use crate::constants::{
    FLAG_CF, FLAG_IL, FLAG_MB, FLAG_ME, FLAG_SR, SHORT_RECORD_MAX_PAYLOAD,
};
use crate::ndef::parser;
use crate::types::TypeNameFormat;
use crate::{Error, Result};

/// One NDEF record in wire form.
///
/// Layout: [header(1)] [type len(1)] [payload len(1 or 4 BE)] [id len(0/1)]
/// [type] [id] [payload]. The header byte carries MB/ME/CF/SR/IL flags and
/// the 3-bit TNF. Short records are used whenever the payload fits 255 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub type_format: TypeNameFormat,
    pub type_field: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
}

impl RawRecord {
    pub fn new(type_format: TypeNameFormat, type_field: Vec<u8>, payload: Vec<u8>) -> Self {
        Self {
            type_format,
            type_field,
            id: Vec::new(),
            payload,
        }
    }

    /// Encoded size of this record in bytes.
    pub fn encoded_len(&self) -> usize {
        let payload_len_bytes = if self.payload.len() <= SHORT_RECORD_MAX_PAYLOAD {
            1
        } else {
            4
        };
        let id_len_bytes = if self.id.is_empty() { 0 } else { 1 };
        1 + 1
            + payload_len_bytes
            + id_len_bytes
            + self.type_field.len()
            + self.id.len()
            + self.payload.len()
    }

    /// Encode this record, setting the MB/ME flags as instructed by the
    /// owning message.
    pub fn encode(&self, message_begin: bool, message_end: bool) -> Result<Vec<u8>> {
        if self.type_field.len() > u8::MAX as usize {
            return Err(Error::Format(format!(
                "record type too long: {} bytes",
                self.type_field.len()
            )));
        }
        if self.id.len() > u8::MAX as usize {
            return Err(Error::Format(format!(
                "record id too long: {} bytes",
                self.id.len()
            )));
        }
        if self.payload.len() > u32::MAX as usize {
            return Err(Error::Format("record payload exceeds u32 length".to_string()));
        }

        let short = self.payload.len() <= SHORT_RECORD_MAX_PAYLOAD;
        let mut header = self.type_format.bits();
        if message_begin {
            header |= FLAG_MB;
        }
        if message_end {
            header |= FLAG_ME;
        }
        if short {
            header |= FLAG_SR;
        }
        if !self.id.is_empty() {
            header |= FLAG_IL;
        }

        let mut out = Vec::with_capacity(self.encoded_len());
        out.push(header);
        out.push(self.type_field.len() as u8);
        if short {
            out.push(self.payload.len() as u8);
        } else {
            out.extend_from_slice(&(self.payload.len() as u32).to_be_bytes());
        }
        if !self.id.is_empty() {
            out.push(self.id.len() as u8);
        }
        out.extend_from_slice(&self.type_field);
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&self.payload);
        Ok(out)
    }

    /// Decode one record starting at `offset`. Returns the record, the
    /// offset past it, and whether the header carried the ME flag.
    pub fn decode(data: &[u8], offset: usize) -> Result<(Self, usize, bool)> {
        let header = parser::byte_at(data, offset)?;
        if header & FLAG_CF != 0 {
            return Err(Error::Format("chunked records are not supported".to_string()));
        }
        let type_format = TypeNameFormat::from_bits(header);
        let short = header & FLAG_SR != 0;
        let has_id = header & FLAG_IL != 0;
        let message_end = header & FLAG_ME != 0;

        let mut idx = offset + 1;
        let type_len = parser::byte_at(data, idx)? as usize;
        idx += 1;

        let payload_len = if short {
            let len = parser::byte_at(data, idx)? as usize;
            idx += 1;
            len
        } else {
            let len = parser::be_u32_at(data, idx)? as usize;
            idx += 4;
            len
        };

        let id_len = if has_id {
            let len = parser::byte_at(data, idx)? as usize;
            idx += 1;
            len
        } else {
            0
        };

        let type_field = parser::slice_at(data, idx, type_len)?.to_vec();
        idx += type_len;
        let id = parser::slice_at(data, idx, id_len)?.to_vec();
        idx += id_len;
        let payload = parser::slice_at(data, idx, payload_len)?.to_vec();
        idx += payload_len;

        Ok((
            Self {
                type_format,
                type_field,
                id,
                payload,
            },
            idx,
            message_end,
        ))
    }
}
