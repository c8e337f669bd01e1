pub mod controller;
pub mod headless;
pub mod layer;
pub mod marker;
pub mod mode;
pub mod overlay;
pub mod poi;
pub mod symbology;
pub mod toggles;
pub mod widget;

pub use controller::*;
pub use layer::*;
pub use marker::*;
pub use mode::*;
pub use overlay::*;
pub use poi::*;
pub use toggles::*;
pub use widget::*;
