// ndeftag/src/lib.rs

//! ndeftag
//!
//! Platform-independent NDEF codec and NFC tag session controller.
//! The codec converts between logical records and the NDEF byte layout;
//! the session controller drives connect -> {read | write | format} ->
//! disconnect against a physical tag supplied through capability traits.
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod error;
pub mod ndef;
pub mod prelude;
pub mod probe;
pub mod session;
pub mod tag;
pub mod tag_info;
pub mod test_support;
pub mod types;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the shared enums in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
