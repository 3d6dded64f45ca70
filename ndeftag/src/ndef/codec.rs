// ndeftag/src/ndef/codec.rs

//! Pure transform between [`NdefRecord`] and its wire form. No I/O and no
//! tag state; the message layer drives this per record.

use crate::constants::{LANGUAGE_CODE_LEN, RTD_TEXT, TEXT_LANG_LEN_MASK, TEXT_UTF16_FLAG};
use crate::ndef::parser;
use crate::ndef::record::NdefRecord;
use crate::ndef::wire::RawRecord;
use crate::types::TypeNameFormat;
use crate::{Error, Result};

/// Encode a logical record into wire form.
///
/// Returns `Ok(None)` for the Unknown/Unchanged/Reserved formats: those are
/// never emitted by this implementation and the caller skips them. Malformed
/// input (e.g. an external record without a domain) is an error, not a panic;
/// the caller decides whether to abort the whole message.
pub fn encode(record: &NdefRecord, default_language: &str) -> Result<Option<RawRecord>> {
    let raw = match record.type_format {
        TypeNameFormat::WellKnown => encode_text(record, default_language)?,
        TypeNameFormat::Mime => {
            let mime = record
                .mime_type
                .as_deref()
                .filter(|m| !m.is_empty())
                .ok_or_else(|| Error::Format("mime record without a mime type".to_string()))?;
            // The MIME string is passed through verbatim, garbage included.
            RawRecord::new(
                TypeNameFormat::Mime,
                mime.as_bytes().to_vec(),
                record.payload.clone(),
            )
        }
        TypeNameFormat::Uri => {
            let uri = match record.uri.as_deref().filter(|u| !u.is_empty()) {
                Some(uri) => uri.to_string(),
                None => parser::utf8(&record.payload, "uri payload")?,
            };
            if uri.is_empty() {
                return Err(Error::Format("uri record without a uri".to_string()));
            }
            RawRecord::new(TypeNameFormat::Uri, Vec::new(), uri.into_bytes())
        }
        TypeNameFormat::External => {
            let domain = record
                .external_domain
                .as_deref()
                .filter(|d| !d.is_empty())
                .ok_or_else(|| Error::Format("external record without a domain".to_string()))?;
            let ext_type = record
                .external_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| Error::Format("external record without a type".to_string()))?;
            RawRecord::new(
                TypeNameFormat::External,
                format!("{domain}:{ext_type}").into_bytes(),
                record.payload.clone(),
            )
        }
        TypeNameFormat::Empty => RawRecord::new(TypeNameFormat::Empty, Vec::new(), Vec::new()),
        TypeNameFormat::Unknown | TypeNameFormat::Unchanged | TypeNameFormat::Reserved => {
            return Ok(None);
        }
    };
    Ok(Some(raw))
}

/// Decode a wire record back into a logical record.
///
/// Unknown/Unchanged/Reserved records decode into a record carrying the raw
/// payload so foreign tags can still be inspected.
pub fn decode(raw: &RawRecord) -> Result<NdefRecord> {
    match raw.type_format {
        TypeNameFormat::Empty => Ok(NdefRecord::empty()),
        TypeNameFormat::WellKnown if raw.type_field == RTD_TEXT => decode_text(raw),
        TypeNameFormat::WellKnown => {
            // Other well-known types (e.g. smart posters) surface as opaque
            // well-known records.
            Ok(NdefRecord {
                type_format: TypeNameFormat::WellKnown,
                payload: raw.payload.clone(),
                ..NdefRecord::empty()
            })
        }
        TypeNameFormat::Mime => Ok(NdefRecord {
            type_format: TypeNameFormat::Mime,
            mime_type: Some(parser::utf8(&raw.type_field, "mime type")?),
            payload: raw.payload.clone(),
            ..NdefRecord::empty()
        }),
        TypeNameFormat::Uri => {
            let uri = parser::utf8(&raw.payload, "uri payload")?;
            Ok(NdefRecord {
                type_format: TypeNameFormat::Uri,
                uri: Some(uri),
                payload: raw.payload.clone(),
                ..NdefRecord::empty()
            })
        }
        TypeNameFormat::External => {
            let type_field = parser::utf8(&raw.type_field, "external type")?;
            let (domain, ext_type) = type_field.split_once(':').ok_or_else(|| {
                Error::Format(format!("external type without domain separator: {type_field}"))
            })?;
            Ok(NdefRecord {
                type_format: TypeNameFormat::External,
                external_domain: Some(domain.to_string()),
                external_type: Some(ext_type.to_string()),
                payload: raw.payload.clone(),
                ..NdefRecord::empty()
            })
        }
        other => Ok(NdefRecord {
            type_format: other,
            payload: raw.payload.clone(),
            ..NdefRecord::empty()
        }),
    }
}

/// Text record payload: status byte (UTF-16 flag + language length), then
/// the language code, then the UTF-8 text.
fn encode_text(record: &NdefRecord, default_language: &str) -> Result<RawRecord> {
    let supplied = record
        .language_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(default_language);

    // Only the first two characters of any supplied code are used.
    let lang: String = supplied.chars().take(LANGUAGE_CODE_LEN).collect();
    if lang.len() != LANGUAGE_CODE_LEN || !lang.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(Error::Format(format!(
            "language code not usable as ISO-639-1: {supplied:?}"
        )));
    }

    let mut payload = Vec::with_capacity(1 + LANGUAGE_CODE_LEN + record.payload.len());
    payload.push(lang.len() as u8);
    payload.extend_from_slice(lang.as_bytes());
    payload.extend_from_slice(&record.payload);
    Ok(RawRecord::new(
        TypeNameFormat::WellKnown,
        RTD_TEXT.to_vec(),
        payload,
    ))
}

fn decode_text(raw: &RawRecord) -> Result<NdefRecord> {
    let status = parser::byte_at(&raw.payload, 0)?;
    if status & TEXT_UTF16_FLAG != 0 {
        return Err(Error::Format("utf-16 text records are not supported".to_string()));
    }
    let lang_len = (status & TEXT_LANG_LEN_MASK) as usize;
    let lang = parser::utf8(
        parser::slice_at(&raw.payload, 1, lang_len)?,
        "language code",
    )?;
    let text = raw.payload[1 + lang_len..].to_vec();
    Ok(NdefRecord {
        type_format: TypeNameFormat::WellKnown,
        language_code: Some(lang),
        payload: text,
        ..NdefRecord::empty()
    })
}
