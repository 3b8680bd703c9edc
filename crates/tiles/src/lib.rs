pub mod rescale;
pub mod service;

pub use rescale::*;
pub use service::*;
