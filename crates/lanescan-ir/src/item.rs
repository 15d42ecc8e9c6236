use core::fmt::Display;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum FloatKind {
    F32,
    F64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum IntKind {
    I32,
    I64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum UIntKind {
    U32,
    U64,
}

/// The element type of a scalar register or of the items of a shared array.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Elem {
    Float(FloatKind),
    Int(IntKind),
    UInt(UIntKind),
    Bool,
}

impl Elem {
    /// The unsigned 32 bits integer type used for every thread index computation.
    pub const fn index() -> Self {
        Elem::UInt(UIntKind::U32)
    }

    /// Size of one element in bytes.
    pub fn size(&self) -> usize {
        match self {
            Elem::Float(FloatKind::F32) | Elem::Int(IntKind::I32) | Elem::UInt(UIntKind::U32) => 4,
            Elem::Float(FloatKind::F64) | Elem::Int(IntKind::I64) | Elem::UInt(UIntKind::U64) => 8,
            Elem::Bool => 1,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Elem::Int(_) | Elem::UInt(_) | Elem::Bool)
    }
}

impl Display for Elem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Elem::Float(kind) => match kind {
                FloatKind::F32 => f.write_str("f32"),
                FloatKind::F64 => f.write_str("f64"),
            },
            Elem::Int(kind) => match kind {
                IntKind::I32 => f.write_str("i32"),
                IntKind::I64 => f.write_str("i64"),
            },
            Elem::UInt(kind) => match kind {
                UIntKind::U32 => f.write_str("u32"),
                UIntKind::U64 => f.write_str("u64"),
            },
            Elem::Bool => f.write_str("bool"),
        }
    }
}
