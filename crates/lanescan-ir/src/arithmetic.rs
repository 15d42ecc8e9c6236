use core::fmt::Display;

use crate::BinaryOperator;

/// Arithmetic operations. Integer operations wrap on overflow.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Arithmetic {
    Add(BinaryOperator),
    Sub(BinaryOperator),
    Mul(BinaryOperator),
    Div(BinaryOperator),
    Modulo(BinaryOperator),
    Max(BinaryOperator),
    Min(BinaryOperator),
}

impl Arithmetic {
    pub fn operands(&self) -> &BinaryOperator {
        match self {
            Arithmetic::Add(op)
            | Arithmetic::Sub(op)
            | Arithmetic::Mul(op)
            | Arithmetic::Div(op)
            | Arithmetic::Modulo(op)
            | Arithmetic::Max(op)
            | Arithmetic::Min(op) => op,
        }
    }
}

impl Display for Arithmetic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Arithmetic::Add(op) => write!(f, "{} + {}", op.lhs, op.rhs),
            Arithmetic::Sub(op) => write!(f, "{} - {}", op.lhs, op.rhs),
            Arithmetic::Mul(op) => write!(f, "{} * {}", op.lhs, op.rhs),
            Arithmetic::Div(op) => write!(f, "{} / {}", op.lhs, op.rhs),
            Arithmetic::Modulo(op) => write!(f, "{} % {}", op.lhs, op.rhs),
            Arithmetic::Max(op) => write!(f, "max({}, {})", op.lhs, op.rhs),
            Arithmetic::Min(op) => write!(f, "min({}, {})", op.lhs, op.rhs),
        }
    }
}
