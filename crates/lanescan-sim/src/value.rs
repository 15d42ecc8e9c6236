//! Scalar semantics of the arithmetic, comparison and boolean instructions.

use core::cmp::Ordering;

use lanescan_ir::{Arithmetic, Comparison, ConstantValue, Elem};

/// Apply an arithmetic instruction, returning [None] on an integer division by zero.
pub fn arithmetic(
    arithmetic: &Arithmetic,
    lhs: ConstantValue,
    rhs: ConstantValue,
    elem: Elem,
) -> Option<ConstantValue> {
    let value = match elem {
        Elem::Float(_) => {
            let (lhs, rhs) = (lhs.as_f64(), rhs.as_f64());
            ConstantValue::Float(match arithmetic {
                Arithmetic::Add(_) => lhs + rhs,
                Arithmetic::Sub(_) => lhs - rhs,
                Arithmetic::Mul(_) => lhs * rhs,
                Arithmetic::Div(_) => lhs / rhs,
                Arithmetic::Modulo(_) => lhs % rhs,
                Arithmetic::Max(_) => lhs.max(rhs),
                Arithmetic::Min(_) => lhs.min(rhs),
            })
        }
        Elem::Int(_) => {
            let (lhs, rhs) = (lhs.as_i64(), rhs.as_i64());
            ConstantValue::Int(match arithmetic {
                Arithmetic::Add(_) => lhs.wrapping_add(rhs),
                Arithmetic::Sub(_) => lhs.wrapping_sub(rhs),
                Arithmetic::Mul(_) => lhs.wrapping_mul(rhs),
                Arithmetic::Div(_) | Arithmetic::Modulo(_) if rhs == 0 => return None,
                Arithmetic::Div(_) => lhs.wrapping_div(rhs),
                Arithmetic::Modulo(_) => lhs.wrapping_rem(rhs),
                Arithmetic::Max(_) => lhs.max(rhs),
                Arithmetic::Min(_) => lhs.min(rhs),
            })
        }
        Elem::UInt(_) => {
            let (lhs, rhs) = (lhs.as_u64(), rhs.as_u64());
            ConstantValue::UInt(match arithmetic {
                Arithmetic::Add(_) => lhs.wrapping_add(rhs),
                Arithmetic::Sub(_) => lhs.wrapping_sub(rhs),
                Arithmetic::Mul(_) => lhs.wrapping_mul(rhs),
                Arithmetic::Div(_) => lhs.checked_div(rhs)?,
                Arithmetic::Modulo(_) => lhs.checked_rem(rhs)?,
                Arithmetic::Max(_) => lhs.max(rhs),
                Arithmetic::Min(_) => lhs.min(rhs),
            })
        }
        Elem::Bool => {
            let (lhs, rhs) = (lhs.as_bool(), rhs.as_bool());
            ConstantValue::Bool(match arithmetic {
                Arithmetic::Add(_) | Arithmetic::Max(_) => lhs | rhs,
                Arithmetic::Mul(_) | Arithmetic::Min(_) => lhs & rhs,
                Arithmetic::Sub(_) => lhs ^ rhs,
                Arithmetic::Div(_) | Arithmetic::Modulo(_) => return None,
            })
        }
    };

    Some(value.cast_to(elem))
}

/// Compare two values of type `elem`.
pub fn comparison(
    comparison: &Comparison,
    lhs: ConstantValue,
    rhs: ConstantValue,
    elem: Elem,
) -> ConstantValue {
    let ordering = match elem {
        Elem::Float(_) => lhs.as_f64().partial_cmp(&rhs.as_f64()),
        Elem::Int(_) => Some(lhs.as_i64().cmp(&rhs.as_i64())),
        Elem::UInt(_) => Some(lhs.as_u64().cmp(&rhs.as_u64())),
        Elem::Bool => Some(lhs.as_bool().cmp(&rhs.as_bool())),
    };

    // Comparisons involving NaN are false, except for `!=`.
    let result = match (comparison, ordering) {
        (Comparison::NotEqual(_), None) => true,
        (_, None) => false,
        (Comparison::Lower(_), Some(ordering)) => ordering == Ordering::Less,
        (Comparison::LowerEqual(_), Some(ordering)) => ordering != Ordering::Greater,
        (Comparison::Equal(_), Some(ordering)) => ordering == Ordering::Equal,
        (Comparison::NotEqual(_), Some(ordering)) => ordering != Ordering::Equal,
        (Comparison::GreaterEqual(_), Some(ordering)) => ordering != Ordering::Less,
        (Comparison::Greater(_), Some(ordering)) => ordering == Ordering::Greater,
    };

    ConstantValue::Bool(result)
}
