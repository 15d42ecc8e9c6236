use crate::{checked_product, stride_before, BlockedLayout, LayoutError};

/// Quantities derived once from a [blocked layout](BlockedLayout) and a scan axis.
///
/// Counts suffixed with `with_unique_data` ignore the units and warps that only hold broadcast
/// copies of elements owned by someone else. Counts prefixed with `non_axis` multiply the
/// corresponding quantity over every dimension except the axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanGeometry {
    pub layout: BlockedLayout,
    pub shape: Vec<u32>,
    pub axis: usize,
    pub warp_size: u32,
    pub num_warps: u32,
    pub total_elements_per_thread: u32,
    /// Contiguous elements a unit holds along the axis, the length of a chunk.
    pub axis_num_elements_per_thread: u32,
    pub non_axis_num_elements_per_thread: u32,
    /// Register distance between two consecutive elements of a chunk.
    pub axis_element_stride: u32,
    /// Lane distance between two consecutive units along the axis.
    pub axis_thread_stride: u32,
    /// Distance between two consecutive tile repetitions along the axis, in tile repetitions.
    pub axis_block_stride: u32,
    pub axis_num_threads_per_warp: u32,
    pub axis_num_threads_per_warp_with_unique_data: u32,
    pub non_axis_num_threads_per_warp: u32,
    pub non_axis_num_threads_per_cta: u32,
    pub axis_num_warps: u32,
    pub axis_num_warps_with_unique_data: u32,
    /// Tile repetitions along the axis.
    pub axis_num_blocks: u32,
    /// Tile repetitions over the other dimensions.
    pub non_axis_num_blocks: u32,
}

impl ScanGeometry {
    /// Validate the layout and derive the scan geometry.
    pub fn new(
        layout: BlockedLayout,
        shape: Vec<u32>,
        axis: usize,
        warp_size: u32,
    ) -> Result<Self, LayoutError> {
        layout.validate(&shape)?;

        let rank = shape.len();
        if axis >= rank {
            return Err(LayoutError::AxisOutOfBounds { axis, rank });
        }
        if layout.warp_size() != warp_size {
            return Err(LayoutError::WarpSizeMismatch {
                expected: warp_size,
                actual: layout.warp_size(),
            });
        }
        if layout.size_per_thread[axis] > shape[axis] {
            return Err(LayoutError::AxisElementsExceedExtent {
                per_thread: layout.size_per_thread[axis],
                extent: shape[axis],
            });
        }

        let without_axis = |values: &[u32]| -> u32 {
            values
                .iter()
                .enumerate()
                .filter(|(dim, _)| *dim != axis)
                .map(|(_, value)| *value)
                .product()
        };

        let tiles = layout.tiles_per_dim(&shape);
        let unique_threads = layout.threads_per_warp_with_unique_data(&shape);
        let unique_warps = layout.warps_per_cta_with_unique_data(&shape);
        let non_axis_num_threads_per_warp = without_axis(&layout.threads_per_warp);

        let geometry = Self {
            axis,
            warp_size,
            num_warps: layout.num_warps(),
            total_elements_per_thread: layout.total_elems_per_thread(&shape),
            axis_num_elements_per_thread: layout.size_per_thread[axis],
            non_axis_num_elements_per_thread: without_axis(&layout.size_per_thread),
            axis_element_stride: stride_before(&layout.size_per_thread, &layout.order, axis),
            axis_thread_stride: stride_before(&layout.threads_per_warp, &layout.order, axis),
            axis_block_stride: stride_before(&tiles, &layout.order, axis),
            axis_num_threads_per_warp: layout.threads_per_warp[axis],
            axis_num_threads_per_warp_with_unique_data: unique_threads[axis],
            non_axis_num_threads_per_warp,
            non_axis_num_threads_per_cta: non_axis_num_threads_per_warp
                * without_axis(&layout.warps_per_cta),
            axis_num_warps: layout.warps_per_cta[axis],
            axis_num_warps_with_unique_data: unique_warps[axis],
            axis_num_blocks: tiles[axis],
            non_axis_num_blocks: without_axis(&tiles),
            layout,
            shape,
        };

        checked_product(&[
            geometry.non_axis_num_threads_per_cta,
            geometry.axis_num_warps_with_unique_data,
            geometry.num_chunks(),
        ])
        .ok_or(LayoutError::TooManyElements {
            quantity: "scratch elements",
        })?;

        Ok(geometry)
    }

    /// Number of chunks held by each unit.
    pub fn num_chunks(&self) -> u32 {
        self.total_elements_per_thread / self.axis_num_elements_per_thread
    }

    /// Elements of scratch memory needed per operand by the cross-warp combine.
    ///
    /// One slot for every parallel unit, axis warp and chunk.
    pub fn scratch_size_in_elems(&self) -> u32 {
        self.non_axis_num_threads_per_cta * self.axis_num_warps_with_unique_data * self.num_chunks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_dimension_over_two_warps() {
        let layout = BlockedLayout::new(vec![1], vec![4], vec![2], vec![0]);
        let geometry = ScanGeometry::new(layout, vec![8], 0, 4).unwrap();

        assert_eq!(geometry.total_elements_per_thread, 1);
        assert_eq!(geometry.axis_element_stride, 1);
        assert_eq!(geometry.axis_thread_stride, 1);
        assert_eq!(geometry.axis_block_stride, 1);
        assert_eq!(geometry.axis_num_threads_per_warp_with_unique_data, 4);
        assert_eq!(geometry.non_axis_num_threads_per_warp, 1);
        assert_eq!(geometry.non_axis_num_threads_per_cta, 1);
        assert_eq!(geometry.axis_num_warps_with_unique_data, 2);
        assert_eq!(geometry.axis_num_blocks, 1);
        assert_eq!(geometry.non_axis_num_blocks, 1);
        assert_eq!(geometry.scratch_size_in_elems(), 2);
    }

    #[test]
    fn axis_is_the_fastest_dimension() {
        let layout = BlockedLayout::new(vec![1, 2], vec![2, 2], vec![2, 2], vec![1, 0]);
        let geometry = ScanGeometry::new(layout, vec![8, 16], 1, 4).unwrap();

        assert_eq!(geometry.total_elements_per_thread, 8);
        assert_eq!(geometry.axis_num_elements_per_thread, 2);
        assert_eq!(geometry.non_axis_num_elements_per_thread, 1);
        assert_eq!(geometry.axis_element_stride, 1);
        assert_eq!(geometry.axis_thread_stride, 1);
        assert_eq!(geometry.axis_block_stride, 1);
        assert_eq!(geometry.axis_num_threads_per_warp_with_unique_data, 2);
        assert_eq!(geometry.non_axis_num_threads_per_warp, 2);
        assert_eq!(geometry.axis_num_warps_with_unique_data, 2);
        assert_eq!(geometry.non_axis_num_threads_per_cta, 4);
        assert_eq!(geometry.axis_num_blocks, 2);
        assert_eq!(geometry.non_axis_num_blocks, 2);
        assert_eq!(geometry.num_chunks(), 4);
        assert_eq!(geometry.scratch_size_in_elems(), 32);
    }

    #[test]
    fn axis_is_the_slowest_dimension() {
        let layout = BlockedLayout::new(vec![2, 2], vec![2, 2], vec![2, 1], vec![1, 0]);
        let geometry = ScanGeometry::new(layout, vec![16, 4], 0, 4).unwrap();

        assert_eq!(geometry.total_elements_per_thread, 8);
        assert_eq!(geometry.axis_num_elements_per_thread, 2);
        assert_eq!(geometry.non_axis_num_elements_per_thread, 2);
        assert_eq!(geometry.axis_element_stride, 2);
        assert_eq!(geometry.axis_thread_stride, 2);
        assert_eq!(geometry.axis_block_stride, 1);
        assert_eq!(geometry.axis_num_threads_per_warp_with_unique_data, 2);
        assert_eq!(geometry.axis_num_warps_with_unique_data, 2);
        assert_eq!(geometry.non_axis_num_threads_per_cta, 2);
        assert_eq!(geometry.axis_num_blocks, 2);
        assert_eq!(geometry.non_axis_num_blocks, 1);
        assert_eq!(geometry.num_chunks(), 4);
        assert_eq!(geometry.scratch_size_in_elems(), 16);
    }

    #[test]
    fn rejects_unsupported_geometries() {
        let layout = BlockedLayout::new(vec![1], vec![4], vec![2], vec![0]);

        assert_eq!(
            ScanGeometry::new(layout.clone(), vec![8], 1, 4),
            Err(LayoutError::AxisOutOfBounds { axis: 1, rank: 1 })
        );
        assert_eq!(
            ScanGeometry::new(layout, vec![8], 0, 32),
            Err(LayoutError::WarpSizeMismatch {
                expected: 32,
                actual: 4
            })
        );

        let layout = BlockedLayout::new(vec![4, 1], vec![1, 4], vec![1, 1], vec![0, 1]);
        assert_eq!(
            ScanGeometry::new(layout, vec![2, 4], 0, 4),
            Err(LayoutError::AxisElementsExceedExtent {
                per_thread: 4,
                extent: 2
            })
        );
    }

    #[test]
    fn rejects_counts_overflowing_32_bits() {
        // 2^16 tile repetitions along both dimensions.
        let registers = BlockedLayout::new(vec![1, 1], vec![2, 2], vec![1, 1], vec![1, 0]);
        let tile = BlockedLayout::new(vec![1 << 20], vec![4], vec![1 << 12], vec![0]);
        // 4096 parallel threads, 2 axis warps and 2^21 chunks per thread.
        let scratch = BlockedLayout::new(vec![1, 1], vec![4, 1], vec![1024, 2], vec![1, 0]);

        assert_eq!(
            ScanGeometry::new(registers, vec![1 << 17, 1 << 17], 1, 4),
            Err(LayoutError::TooManyElements {
                quantity: "registers per thread"
            })
        );
        assert_eq!(
            ScanGeometry::new(tile, vec![1 << 20], 0, 4),
            Err(LayoutError::TooManyElements {
                quantity: "cube tile elements"
            })
        );
        assert_eq!(
            ScanGeometry::new(scratch, vec![4096, 1 << 22], 1, 4),
            Err(LayoutError::TooManyElements {
                quantity: "scratch elements"
            })
        );
    }
}
