use lanescan_ir::Scope;
use lanescan_layout::ScanGeometry;

use crate::{
    accumulate, select_record, shuffle_up_record, ChunkLayout, Combiner, Record, ThreadIds,
};

/// Inclusive scan of the chunk tails across the axis lanes of each warp.
///
/// Doubling scan: at step `s` every lane combines the value of the lane `s` positions below it
/// along the axis with its own, lanes with an axis position lower than `s` keep their value.
pub fn scan_warp<C: Combiner + ?Sized>(
    scope: &mut Scope,
    combiner: &C,
    geometry: &ScanGeometry,
    chunks: &ChunkLayout,
    ids: &ThreadIds,
    records: &mut [Record],
) {
    let scan_dim = geometry.axis_num_threads_per_warp_with_unique_data;
    let thread_stride = geometry.axis_thread_stride;

    for tail in chunks.tails() {
        let mut acc = records[tail.register].clone();

        let mut step = 1;
        while step <= scan_dim / 2 {
            let shuffled = shuffle_up_record(scope, &acc, step * thread_stride);
            let combined = accumulate(scope, combiner, &shuffled, &acc);
            let no_predecessor = scope.lower(ids.lane_axis, step);
            acc = select_record(scope, no_predecessor, &acc, &combined);
            step <<= 1;
        }

        records[tail.register] = acc;
    }
}
