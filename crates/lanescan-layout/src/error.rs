use thiserror::Error;

/// Structural problems that prevent a layout from being used by the scan lowering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The tensor has no dimension.
    #[error("The tensor shape is empty")]
    EmptyShape,

    /// One of the layout fields doesn't have one entry per tensor dimension.
    #[error("The tensor has rank {expected} but `{field}` has {actual} entries")]
    RankMismatch {
        /// Name of the layout field.
        field: &'static str,
        /// Rank of the tensor.
        expected: usize,
        /// Number of entries in the field.
        actual: usize,
    },

    /// The scan axis isn't a dimension of the tensor.
    #[error("Scan axis {axis} is out of bounds for a tensor of rank {rank}")]
    AxisOutOfBounds {
        /// Requested axis.
        axis: usize,
        /// Rank of the tensor.
        rank: usize,
    },

    /// The dimension order isn't a permutation of the dimensions.
    #[error("Dimension order {order:?} is not a permutation of 0..{rank}")]
    InvalidOrder {
        /// The order of the layout.
        order: Vec<u32>,
        /// Rank of the tensor.
        rank: usize,
    },

    /// Extents, thread counts and warp counts must all be non-zero powers of two.
    #[error("`{field}[{dim}]` = {value} is not a non-zero power of two")]
    NotPowerOfTwo {
        /// Name of the field.
        field: &'static str,
        /// Dimension of the offending entry.
        dim: usize,
        /// The offending value.
        value: u32,
    },

    /// The threads of a warp don't add up to the hardware warp size.
    #[error("The layout places {actual} threads in a warp but the warp size is {expected}")]
    WarpSizeMismatch {
        /// Hardware warp size.
        expected: u32,
        /// Product of the threads per warp of the layout.
        actual: u32,
    },

    /// A count derived from the layout doesn't fit in 32 bits.
    #[error("The number of {quantity} doesn't fit in 32 bits")]
    TooManyElements {
        /// What overflowed.
        quantity: &'static str,
    },

    /// Threads would hold the same axis element more than once, which breaks the chunk
    /// factorization of the per-thread registers.
    #[error(
        "Each thread holds {per_thread} contiguous elements along the scan axis, but the axis only has {extent}"
    )]
    AxisElementsExceedExtent {
        /// Elements per thread along the axis.
        per_thread: u32,
        /// Extent of the axis.
        extent: u32,
    },
}
