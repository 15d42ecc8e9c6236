/// Lowering config module.
pub mod lowering;

mod base;
mod logger;

pub use base::*;
pub use logger::*;
