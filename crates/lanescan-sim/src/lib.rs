//! Lockstep interpreter for lanescan IR.
//!
//! Runs a program for every unit of a simulated cube, with per-warp lane shuffles and a shared
//! memory that reports accesses racing across warps.

mod error;
mod executor;
mod shared;
mod value;

pub use error::*;
pub use executor::*;
