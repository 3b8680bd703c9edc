pub mod bounds;
pub mod geo;
pub mod web_mercator;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use geo::*;
pub use web_mercator::*;
