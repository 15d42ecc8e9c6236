use core::fmt::Display;

use derive_new::new;

use crate::Variable;

/// Shared memory accesses.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Memory {
    Load(LoadOperator),
    /// A store performed only by the units where `predicate` is true.
    Store(StoreOperator),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct LoadOperator {
    pub array: Variable,
    pub index: Variable,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct StoreOperator {
    pub array: Variable,
    pub index: Variable,
    pub value: Variable,
    pub predicate: Variable,
}

impl Display for Memory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Memory::Load(op) => write!(f, "{}[{}]", op.array, op.index),
            Memory::Store(op) => write!(
                f,
                "if {} {{ {}[{}] = {} }}",
                op.predicate, op.array, op.index, op.value
            ),
        }
    }
}
