pub mod explorer;
pub mod imagery;
pub mod labeling;
pub mod notices;
pub mod session;

pub use explorer::*;
pub use imagery::*;
pub use labeling::*;
pub use notices::*;
pub use session::*;
