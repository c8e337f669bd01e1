pub mod cancel;
pub mod event_bus;
pub mod retry;
pub mod timers;

pub use cancel::*;
pub use event_bus::*;
pub use retry::*;
pub use timers::*;
