// ndeftag/src/session/mod.rs

pub mod controller;
pub mod events;
pub mod radio;

pub use controller::SessionController;
pub use events::{Event, EventRegistry, SubscriberId};
pub use radio::{NullRadioSource, RadioStateSource, RadioWatch};
