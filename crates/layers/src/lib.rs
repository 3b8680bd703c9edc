pub mod descriptor;
pub mod handle;
pub mod registry;

pub use descriptor::*;
pub use handle::*;
pub use registry::*;
