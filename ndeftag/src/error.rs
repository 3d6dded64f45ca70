// ndeftag/src/error.rs

use thiserror::Error;

use crate::types::SessionState;

/// Crate-wide error type covering codec failures and session failures.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no tag is currently held by the session")]
    MissingTag,

    #[error("no tag info was supplied for the operation")]
    MissingTagInfo,

    #[error("tag exposes neither an NDEF nor a formatable technology")]
    NotCompliantTag,

    #[error("tag is read-only")]
    ReadOnlyTag,

    #[error("message does not fit on tag: {required} bytes required, {available} available")]
    CapacityExceeded { required: usize, available: usize },

    #[error("tag was lost during the operation")]
    TagLost,

    #[error("ndef format error: {0}")]
    Format(String),

    #[error("tag write error: {0}")]
    Write(String),

    #[error("unsupported tag: {0}")]
    UnsupportedTag(String),

    #[error("a tag handle is already held by the session")]
    SessionBusy,

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("operation requires state {expected:?}, session is {actual:?}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
