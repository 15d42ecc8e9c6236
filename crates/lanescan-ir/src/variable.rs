use core::{fmt::Display, hash::Hash};

use derive_more::From;
use float_ord::FloatOrd;

use crate::{Elem, FloatKind, IntKind, UIntKind};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct Variable {
    pub kind: VariableKind,
    pub elem: Elem,
}

impl Variable {
    pub fn new(kind: VariableKind, elem: Elem) -> Self {
        Self { kind, elem }
    }

    pub fn builtin(builtin: Builtin) -> Self {
        Self::new(VariableKind::Builtin(builtin), Elem::index())
    }

    /// A constant of the given element type, the value is cast to fit the type.
    pub fn constant(value: ConstantValue, elem: Elem) -> Self {
        Self::new(VariableKind::Constant(value.cast_to(elem)), elem)
    }

    /// An unsigned 32 bits constant, used for indexing.
    pub fn index(value: u32) -> Self {
        Self::constant(ConstantValue::UInt(value as u64), Elem::index())
    }

    pub fn as_const(&self) -> Option<ConstantValue> {
        match self.kind {
            VariableKind::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    /// Determines if the value is a constant with the specified value (converted if necessary)
    pub fn is_constant(&self, value: i64) -> bool {
        match self.as_const() {
            Some(ConstantValue::Int(val)) => val == value,
            Some(ConstantValue::UInt(val)) => val as i64 == value,
            Some(ConstantValue::Float(val)) => val == value as f64,
            _ => false,
        }
    }
}

pub type Id = u32;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum VariableKind {
    /// A per-unit register, assigned exactly once.
    Local { id: Id },
    Constant(ConstantValue),
    Builtin(Builtin),
    /// A cube-wide array living in shared memory.
    SharedArray { id: Id, length: u32 },
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Builtin {
    /// Flat position of the unit inside its cube.
    UnitPos,
}

/// The scalars are stored with the highest precision possible, casts are applied when the constant
/// is bound to a typed [variable](Variable).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, From)]
#[allow(missing_docs, clippy::derive_ord_xor_partial_ord)]
pub enum ConstantValue {
    Int(i64),
    Float(f64),
    UInt(u64),
    Bool(bool),
}

impl Ord for ConstantValue {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        // Override float-float comparison with `FloatOrd` since `f64` isn't `Ord`. All other
        // comparisons only compare discriminants or integers.
        match (self, other) {
            (ConstantValue::Float(this), ConstantValue::Float(other)) => {
                FloatOrd(*this).cmp(&FloatOrd(*other))
            }
            _ => self
                .partial_cmp(other)
                .unwrap_or(core::cmp::Ordering::Equal),
        }
    }
}

impl Eq for ConstantValue {}

impl Hash for ConstantValue {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            ConstantValue::Int(val) => val.hash(state),
            ConstantValue::Float(val) => FloatOrd(*val).hash(state),
            ConstantValue::UInt(val) => val.hash(state),
            ConstantValue::Bool(val) => val.hash(state),
        }
    }
}

impl ConstantValue {
    /// Returns the value of the scalar as a u32.
    pub fn as_u32(&self) -> u32 {
        self.as_u64() as u32
    }

    /// Returns the value of the scalar as a u64.
    pub fn as_u64(&self) -> u64 {
        match self {
            ConstantValue::UInt(val) => *val,
            ConstantValue::Int(val) => *val as u64,
            ConstantValue::Float(val) => *val as u64,
            ConstantValue::Bool(val) => *val as u64,
        }
    }

    /// Returns the value of the scalar as a i64.
    pub fn as_i64(&self) -> i64 {
        match self {
            ConstantValue::UInt(val) => *val as i64,
            ConstantValue::Int(val) => *val,
            ConstantValue::Float(val) => *val as i64,
            ConstantValue::Bool(val) => *val as i64,
        }
    }

    /// Returns the value of the scalar as a f64.
    pub fn as_f64(&self) -> f64 {
        match self {
            ConstantValue::UInt(val) => *val as f64,
            ConstantValue::Int(val) => *val as f64,
            ConstantValue::Float(val) => *val,
            ConstantValue::Bool(val) => *val as u8 as f64,
        }
    }

    /// Returns the value of the scalar as a bool, any non-zero number is `true`.
    pub fn as_bool(&self) -> bool {
        match self {
            ConstantValue::UInt(val) => *val != 0,
            ConstantValue::Int(val) => *val != 0,
            ConstantValue::Float(val) => *val != 0.,
            ConstantValue::Bool(val) => *val,
        }
    }

    /// Convert the constant to the representation and range of `elem`, wrapping integers.
    pub fn cast_to(&self, elem: Elem) -> ConstantValue {
        match elem {
            Elem::Float(kind) => match kind {
                FloatKind::F32 => self.as_f64() as f32 as f64,
                FloatKind::F64 => self.as_f64(),
            }
            .into(),
            Elem::Int(kind) => match kind {
                IntKind::I32 => self.as_i64() as i32 as i64,
                IntKind::I64 => self.as_i64(),
            }
            .into(),
            Elem::UInt(kind) => match kind {
                UIntKind::U32 => self.as_u64() as u32 as u64,
                UIntKind::U64 => self.as_u64(),
            }
            .into(),
            Elem::Bool => self.as_bool().into(),
        }
    }
}

impl Display for ConstantValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConstantValue::Int(val) => write!(f, "{val}"),
            ConstantValue::Float(val) => write!(f, "{val:?}"),
            ConstantValue::UInt(val) => write!(f, "{val}"),
            ConstantValue::Bool(val) => write!(f, "{val}"),
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            VariableKind::Local { id } => write!(f, "local({id})"),
            VariableKind::Constant(constant) => write!(f, "{}({constant})", self.elem),
            VariableKind::Builtin(builtin) => write!(f, "{builtin:?}"),
            VariableKind::SharedArray { id, .. } => write!(f, "shared_array({id})"),
        }
    }
}

impl From<u32> for Variable {
    fn from(value: u32) -> Self {
        Variable::index(value)
    }
}

impl From<bool> for Variable {
    fn from(value: bool) -> Self {
        Variable::constant(ConstantValue::Bool(value), Elem::Bool)
    }
}

impl From<&Variable> for Variable {
    fn from(value: &Variable) -> Self {
        *value
    }
}
