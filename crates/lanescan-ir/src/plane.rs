use core::fmt::Display;

use derive_new::new;

use crate::{BinaryOperator, Variable};

/// Register exchange between the units of a plane.
///
/// Units of a plane execute in lockstep, so no synchronization is needed around these.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Plane {
    /// Read `value` from the unit `offset` positions below in the plane. Units without a
    /// predecessor at that distance read their own value.
    ShuffleUp(ShuffleUpOperator),
    /// Read `lhs` from the unit whose plane position is `rhs`.
    Shuffle(BinaryOperator),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct ShuffleUpOperator {
    pub value: Variable,
    pub offset: u32,
}

impl Display for Plane {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Plane::ShuffleUp(op) => write!(f, "plane_shuffle_up({}, {})", op.value, op.offset),
            Plane::Shuffle(op) => write!(f, "plane_shuffle({}, {})", op.lhs, op.rhs),
        }
    }
}
