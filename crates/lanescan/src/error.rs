use lanescan_layout::LayoutError;
use thiserror::Error;

/// Reasons a scan can't be lowered. Nothing is emitted when an error is returned, so the caller
/// can fall back to another lowering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanLoweringError {
    /// The layout doesn't satisfy the structural preconditions of the lowering.
    #[error("Unsupported scan geometry: {0}")]
    UnsupportedGeometry(#[from] LayoutError),

    /// A scan needs at least one operand.
    #[error("The scan has no operand")]
    NoOperands,

    /// An operand doesn't hold one register per element owned by the unit.
    #[error("Operand {operand} has {actual} registers per unit, the layout requires {expected}")]
    OperandLength {
        /// Position of the operand.
        operand: usize,
        /// Elements owned by each unit.
        expected: usize,
        /// Registers provided.
        actual: usize,
    },
}
