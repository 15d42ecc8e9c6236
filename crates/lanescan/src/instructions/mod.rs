//! Ready-made [combiners](crate::Combiner) for the common scans.
//!
//! The elementwise instructions apply the same binary operator to every operand independently,
//! the others treat the operands as a single value.

mod argmax;
mod segmented;
mod sum;

pub use argmax::*;
pub use segmented::*;
pub use sum::*;

use lanescan_ir::{Scope, Variable};

use crate::Record;

fn elementwise(
    scope: &mut Scope,
    lhs: &[Variable],
    rhs: &[Variable],
    op: fn(&mut Scope, Variable, Variable) -> Variable,
) -> Record {
    lhs.iter()
        .zip(rhs)
        .map(|(lhs, rhs)| op(scope, *lhs, *rhs))
        .collect()
}
