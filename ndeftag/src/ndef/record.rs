// ndeftag/src/ndef/record.rs

use crate::types::TypeNameFormat;

/// One logical NDEF payload unit, before wire framing.
///
/// Which optional fields are meaningful depends on `type_format`:
/// text records use `language_code`, mime records use `mime_type`, external
/// records require `external_domain` and `external_type` together, and URI
/// records carry the URI in `payload` (with `uri` filled in on decode).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NdefRecord {
    pub type_format: TypeNameFormat,
    pub mime_type: Option<String>,
    pub uri: Option<String>,
    pub external_domain: Option<String>,
    pub external_type: Option<String>,
    pub language_code: Option<String>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    /// Well-known text record. `language_code` of `None` (or blank) falls
    /// back to the configured default at encode time.
    pub fn text(text: impl Into<String>, language_code: Option<&str>) -> Self {
        Self {
            type_format: TypeNameFormat::WellKnown,
            language_code: language_code.map(str::to_string),
            payload: text.into().into_bytes(),
            ..Self::empty()
        }
    }

    /// Binary record tagged with a MIME string. The string is passed
    /// through untouched; no well-formedness check is performed.
    pub fn mime(mime_type: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            type_format: TypeNameFormat::Mime,
            mime_type: Some(mime_type.into()),
            payload,
            ..Self::empty()
        }
    }

    /// Absolute-URI record.
    pub fn uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        Self {
            type_format: TypeNameFormat::Uri,
            payload: uri.clone().into_bytes(),
            uri: Some(uri),
            ..Self::empty()
        }
    }

    /// External record. Domain and type are both required at encode time.
    pub fn external(
        domain: impl Into<String>,
        external_type: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            type_format: TypeNameFormat::External,
            external_domain: Some(domain.into()),
            external_type: Some(external_type.into()),
            payload,
            ..Self::empty()
        }
    }

    /// The canonical blank-tag sentinel: empty type, id and payload.
    pub fn empty() -> Self {
        Self {
            type_format: TypeNameFormat::Empty,
            mime_type: None,
            uri: None,
            external_domain: None,
            external_type: None,
            language_code: None,
            payload: Vec::new(),
        }
    }

    /// Payload reinterpreted as UTF-8, for display purposes.
    pub fn payload_as_text(&self) -> Option<String> {
        String::from_utf8(self.payload.clone()).ok()
    }
}
