pub mod model;
pub mod state;
pub mod viewport;

pub use model::*;
pub use state::*;
pub use viewport::*;
