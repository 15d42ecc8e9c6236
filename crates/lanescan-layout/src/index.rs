//! Conversion between flat ids and multi-dimensional coordinates.
//!
//! Dimensions are visited following `order`, the first entry being the fastest varying one.

/// Split `linear` into one coordinate per dimension of `shape`.
pub fn delinearize(linear: u32, shape: &[u32], order: &[u32]) -> Vec<u32> {
    let mut coordinates = vec![0; shape.len()];
    let mut remaining = linear;

    for &dim in order {
        let dim = dim as usize;
        coordinates[dim] = remaining % shape[dim];
        remaining /= shape[dim];
    }

    coordinates
}

/// Inverse of [delinearize] for in-bound coordinates.
pub fn linearize(coordinates: &[u32], shape: &[u32], order: &[u32]) -> u32 {
    order.iter().rev().fold(0, |linear, &dim| {
        let dim = dim as usize;
        linear * shape[dim] + coordinates[dim]
    })
}

/// Product of the entries of `values`.
pub fn product(values: &[u32]) -> u32 {
    values.iter().product()
}

/// Product of the entries of `values`, [None] if it overflows.
pub fn checked_product(values: &[u32]) -> Option<u32> {
    values
        .iter()
        .try_fold(1u32, |acc, value| acc.checked_mul(*value))
}

/// Product of `values[dim]` for the dimensions visited before `axis` in `order`.
///
/// This is the distance, in flat ids, between two positions that differ by one along `axis`.
pub fn stride_before(values: &[u32], order: &[u32], axis: usize) -> u32 {
    order
        .iter()
        .map(|dim| *dim as usize)
        .take_while(|dim| *dim != axis)
        .map(|dim| values[dim])
        .product()
}
