use lanescan_ir::{Id, Variable};
use thiserror::Error;

/// Faults detected while executing a program on the simulated cube.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// A register was read before any instruction or binding assigned it.
    #[error("Register {variable} is read before being assigned")]
    UndefinedRegister {
        /// The register.
        variable: Variable,
    },

    /// A register was assigned twice.
    #[error("Register {variable} is assigned more than once")]
    RegisterReassigned {
        /// The register.
        variable: Variable,
    },

    /// The number of values bound to a register doesn't match the number of units.
    #[error("Expected one value per unit ({expected}), got {actual}")]
    BindingLength {
        /// Number of units of the cube.
        expected: usize,
        /// Number of values provided.
        actual: usize,
    },

    /// A shared slot is read in the same barrier epoch it was written by another warp.
    #[error(
        "Unit {unit} reads shared_array({array})[{index}] written by warp {writer} without a barrier"
    )]
    UnsynchronizedRead {
        /// Reading unit.
        unit: u32,
        /// Shared array id.
        array: Id,
        /// Slot index.
        index: u32,
        /// Warp that wrote the slot.
        writer: u32,
    },

    /// A shared slot is read before any unit wrote it.
    #[error("Unit {unit} reads shared_array({array})[{index}] which was never written")]
    UninitializedRead {
        /// Reading unit.
        unit: u32,
        /// Shared array id.
        array: Id,
        /// Slot index.
        index: u32,
    },

    /// Two different values are stored to the same shared slot without a barrier in between.
    #[error("Unit {unit} overwrites shared_array({array})[{index}] with a different value")]
    ConflictingWrite {
        /// Writing unit.
        unit: u32,
        /// Shared array id.
        array: Id,
        /// Slot index.
        index: u32,
    },

    /// A shared access falls outside the array.
    #[error("Index {index} is out of bounds for shared_array({array}) of length {length}")]
    OutOfBounds {
        /// Shared array id.
        array: Id,
        /// Accessed index.
        index: u32,
        /// Length of the array.
        length: u32,
    },

    /// A lane shuffle targets a lane outside the warp.
    #[error("Unit {unit} shuffles from lane {lane} but warps have {warp_size} lanes")]
    LaneOutOfRange {
        /// Shuffling unit.
        unit: u32,
        /// Requested lane.
        lane: u32,
        /// Number of lanes per warp.
        warp_size: u32,
    },

    /// Integer division or remainder by zero.
    #[error("Unit {unit} divides by zero")]
    DivisionByZero {
        /// Dividing unit.
        unit: u32,
    },

    /// The instruction can't be executed by the simulator.
    #[error("Unsupported instruction: {instruction}")]
    Unsupported {
        /// The instruction, formatted.
        instruction: String,
    },
}
