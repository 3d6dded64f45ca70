// ndeftag/src/prelude.rs

pub use crate::config::{ConfigStore, Configuration, ErrorMessages};
pub use crate::ndef::{message, NdefRecord};
pub use crate::probe::probe;
pub use crate::session::{Event, SessionController, SubscriberId};
pub use crate::tag::{FormatTech, NdefTech, RawMemoryTech, TagHandle};
pub use crate::tag_info::TagInfo;
pub use crate::{Error, Result, SessionState, TagId, TypeNameFormat};
