//! # lanescan IR
//!
//! A small SSA intermediate representation for SIMT programs: every unit of a cube runs the same
//! straight-line list of [instructions](Instruction), masking work with selects and predicated
//! stores instead of branching.

extern crate alloc;

mod arithmetic;
mod comparison;
mod expand;
mod instruction;
mod item;
mod memory;
mod operator;
mod plane;
mod scope;
mod synchronization;
mod variable;

pub use arithmetic::*;
pub use comparison::*;
pub use instruction::*;
pub use item::*;
pub use memory::*;
pub use operator::*;
pub use plane::*;
pub use scope::*;
pub use synchronization::*;
pub use variable::*;
