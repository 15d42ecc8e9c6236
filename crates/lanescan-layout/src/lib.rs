//! Blocked tensor layouts and the geometry of a scan over one of their axes.

mod blocked;
mod error;
mod geometry;
mod index;

pub use blocked::*;
pub use error::*;
pub use geometry::*;
pub use index::*;
