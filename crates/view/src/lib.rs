//! View state and session control for the GeoSense+ dashboard.
//!
//! [`Dashboard`] owns everything that used to be page-global: the active
//! section, the display mode, the current position, the map controller and
//! the pending timers. Hosts feed it UI events and clock ticks; it writes to
//! the page through a [`Surface`].

pub mod config;
pub mod dashboard;
pub mod dom;
pub mod drive;
pub mod recording;
pub mod router;
pub mod section;
pub mod state;
pub mod surface;

pub use config::*;
pub use dashboard::*;
pub use layers::Mode;
pub use recording::RecordingSurface;
pub use router::*;
pub use section::*;
pub use state::*;
pub use surface::*;
