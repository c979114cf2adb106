//! Domain models for crop recommendation

mod crop;
mod recommendation;
mod weather;

pub use crop::*;
pub use recommendation::*;
pub use weather::*;
