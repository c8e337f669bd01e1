pub mod geo;
pub mod handles;
pub mod ids;
pub mod math;
pub mod text;

// Foundation crate: small, well-tested primitives only.
pub use geo::*;
pub use handles::*;
pub use ids::*;
pub use text::*;
