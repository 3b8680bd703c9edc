pub mod client;
pub mod frame;
pub mod protocol;

pub use client::*;
pub use frame::*;
pub use protocol::*;
