// ndeftag/src/ndef/mod.rs

pub mod codec;
pub mod message;
pub mod parser;
pub mod record;
pub mod wire;

pub use record::NdefRecord;
pub use wire::RawRecord;
