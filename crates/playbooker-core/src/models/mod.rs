pub mod phase;
pub mod session;

pub use phase::*;
pub use session::*;
