// ndeftag/src/tag/mod.rs

pub mod mock;
pub mod traits;

pub use mock::{MockFormatable, MockNdef, MockRawMemory, MockTag};
pub use traits::{FormatTech, NdefTech, RawMemoryTech, TagHandle};
