use core::fmt::Display;

use derive_more::From;

use crate::{Arithmetic, Comparison, Memory, Operator, Plane, Synchronization, Variable};

/// All operations that can be used in a scope.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, From)]
#[allow(missing_docs)]
pub enum Operation {
    Copy(Variable),
    Arithmetic(Arithmetic),
    Comparison(Comparison),
    Operator(Operator),
    Plane(Plane),
    Memory(Memory),
    Synchronization(Synchronization),
}

/// An operation with an optional output register.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub out: Option<Variable>,
    pub operation: Operation,
}

impl Instruction {
    pub fn new(operation: impl Into<Operation>, out: Variable) -> Self {
        Instruction {
            out: Some(out),
            operation: operation.into(),
        }
    }

    /// An instruction without output, only executed for its side effect.
    pub fn no_out(operation: impl Into<Operation>) -> Self {
        Instruction {
            out: None,
            operation: operation.into(),
        }
    }

    pub fn out(&self) -> Variable {
        self.out.expect("Instruction has no output")
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Operation::Copy(variable) => write!(f, "{variable}"),
            Operation::Arithmetic(arithmetic) => write!(f, "{arithmetic}"),
            Operation::Comparison(comparison) => write!(f, "{comparison}"),
            Operation::Operator(operator) => write!(f, "{operator}"),
            Operation::Plane(plane) => write!(f, "{plane}"),
            Operation::Memory(memory) => write!(f, "{memory}"),
            Operation::Synchronization(synchronization) => write!(f, "{synchronization}"),
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.out {
            Some(out) => write!(f, "{out}: {} = {}", out.elem, self.operation),
            None => write!(f, "{}", self.operation),
        }
    }
}
