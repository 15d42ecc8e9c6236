//! Propagation of the warp partial results along the axis.
//!
//! After the warp scan each chunk tail holds the inclusive scan of its warp. What is missing is
//! the prefix contributed by the warps before it and by the previous tile repetitions along the
//! axis, plus the propagation of the final tail values to the interior elements of each chunk.

use core::fmt::Display;

use lanescan_ir::{Scope, Variable};
use lanescan_layout::ScanGeometry;

use crate::{
    accumulate, select_record, shuffle_record, shuffle_up_record, ChunkLayout, ChunkTail,
    Combiner, Record, ThreadIds,
};

/// Strategy completing the scan once every warp scanned its own part of the axis.
pub trait CrossWarpCombine {
    fn apply<C: Combiner + ?Sized>(
        &self,
        scope: &mut Scope,
        combiner: &C,
        ids: &ThreadIds,
        records: &mut [Record],
    );
}

/// Which [cross-warp combine](CrossWarpCombine) a scan needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossWarpStrategy {
    /// Several warps hold distinct data along the axis.
    SharedMemory,
    /// A single warp covers the axis but units hold more than one element.
    Register,
    /// Units hold a single element of an axis covered by one warp, the warp scan is complete.
    None,
}

impl CrossWarpStrategy {
    pub fn select(geometry: &ScanGeometry) -> Self {
        if geometry.axis_num_warps_with_unique_data > 1 {
            Self::SharedMemory
        } else if geometry.total_elements_per_thread > 1 {
            Self::Register
        } else {
            Self::None
        }
    }
}

impl Display for CrossWarpStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CrossWarpStrategy::SharedMemory => f.write_str("shared_memory"),
            CrossWarpStrategy::Register => f.write_str("register"),
            CrossWarpStrategy::None => f.write_str("none"),
        }
    }
}

/// Running prefix of one scan line.
///
/// `acc` folds every partial seen so far, `masked_acc` only the partials preceding the current
/// warp.
#[derive(Debug, Clone, Default)]
struct Accumulator {
    acc: Record,
    masked_acc: Record,
}

/// Exchanges the warp totals through shared memory, separated by a single cube barrier.
///
/// The scratch array of each operand holds one slot per parallel unit, axis warp and chunk:
///
/// ```text
/// chunk 0: | line 0 warp 0 | line 1 warp 0 | line 0 warp 1 | line 1 warp 1 |
/// chunk 1: | line 0 warp 0 | line 1 warp 0 | line 0 warp 1 | line 1 warp 1 |
/// ```
#[derive(Debug)]
pub struct SharedMemoryCombine<'a> {
    geometry: &'a ScanGeometry,
    chunks: &'a ChunkLayout,
}

impl<'a> SharedMemoryCombine<'a> {
    pub fn new(geometry: &'a ScanGeometry, chunks: &'a ChunkLayout) -> Self {
        Self { geometry, chunks }
    }

    fn num_parallel_lanes(&self) -> u32 {
        self.geometry.non_axis_num_threads_per_cta
    }

    fn axis_warps(&self) -> u32 {
        self.geometry.axis_num_warps_with_unique_data
    }

    fn store_partials(
        &self,
        scope: &mut Scope,
        ids: &ThreadIds,
        scratch: &[Variable],
        records: &[Record],
    ) {
        let last_lane = self.geometry.axis_num_threads_per_warp_with_unique_data - 1;
        let is_last_lane = scope.equal(ids.lane_axis, last_lane);
        let warp_offset = scope.mul(ids.warp_axis, self.num_parallel_lanes());
        let base = scope.add(ids.parallel_id, warp_offset);

        for tail in self.chunks.tails() {
            let chunk_offset = tail.chunk as u32 * self.num_parallel_lanes() * self.axis_warps();
            let index = scope.add(base, chunk_offset);

            for (array, value) in scratch.iter().zip(records[tail.register].iter()) {
                scope.store_shared(*array, index, *value, is_last_lane);
            }
        }
    }

    fn load_partial(
        &self,
        scope: &mut Scope,
        ids: &ThreadIds,
        scratch: &[Variable],
        tail: &ChunkTail,
        warp: u32,
    ) -> Record {
        let slot = self.num_parallel_lanes() * (warp + tail.chunk as u32 * self.axis_warps());
        let index = scope.add(ids.parallel_id, slot);

        scratch
            .iter()
            .map(|array| scope.load_shared(*array, index))
            .collect()
    }

    fn add_partials<C: Combiner + ?Sized>(
        &self,
        scope: &mut Scope,
        combiner: &C,
        ids: &ThreadIds,
        scratch: &[Variable],
        records: &mut [Record],
    ) {
        let scan_dim = self.geometry.axis_num_threads_per_warp_with_unique_data;
        let first_warp = scope.equal(ids.warp_axis, 0u32);
        let first_lane = scope.equal(ids.lane_axis, 0u32);
        let first_thread = scope.and(first_warp, first_lane);

        let mut accumulators = vec![Accumulator::default(); self.chunks.num_accumulators()];

        for tail in self.chunks.tails() {
            let accumulator = &mut accumulators[tail.accumulator];

            for warp in 0..self.axis_warps() {
                let partial = self.load_partial(scope, ids, scratch, &tail, warp);

                if accumulator.acc.is_empty() {
                    accumulator.acc = partial.clone();
                    accumulator.masked_acc = partial;
                    continue;
                }

                accumulator.acc = accumulate(scope, combiner, &accumulator.acc, &partial);
                let before_warp = scope.lower(ids.warp_axis, warp + 1);
                accumulator.masked_acc = select_record(
                    scope,
                    before_warp,
                    &accumulator.masked_acc,
                    &accumulator.acc,
                );
            }

            let original = records[tail.register].clone();
            let mut total = accumulate(scope, combiner, &accumulator.masked_acc, &original);
            if tail.axis_block == 0 {
                // The first warp has no predecessor on the first repetition.
                total = select_record(scope, first_warp, &original, &total);
            }
            records[tail.register] = total.clone();

            if self.chunks.elements_per_chunk() > 1 {
                let previous = if scan_dim > 1 {
                    let below = shuffle_up_record(scope, &total, self.geometry.axis_thread_stride);
                    select_record(scope, first_lane, &accumulator.masked_acc, &below)
                } else {
                    accumulator.masked_acc.clone()
                };

                for register in self.chunks.interior(&tail) {
                    let original = records[register].clone();
                    let mut value = accumulate(scope, combiner, &previous, &original);
                    if tail.axis_block == 0 {
                        value = select_record(scope, first_thread, &original, &value);
                    }
                    records[register] = value;
                }
            }

            // The next repetition starts from the total of every warp.
            accumulator.masked_acc = accumulator.acc.clone();
        }
    }
}

impl CrossWarpCombine for SharedMemoryCombine<'_> {
    fn apply<C: Combiner + ?Sized>(
        &self,
        scope: &mut Scope,
        combiner: &C,
        ids: &ThreadIds,
        records: &mut [Record],
    ) {
        let length = self.geometry.scratch_size_in_elems();
        let scratch = records[0]
            .iter()
            .map(|value| scope.create_shared(value.elem, length))
            .collect::<Vec<_>>();

        self.store_partials(scope, ids, &scratch, records);
        scope.sync_cube();
        self.add_partials(scope, combiner, ids, &scratch, records);
    }
}

/// Carries the prefix of each scan line across tile repetitions in registers, when one warp
/// covers the whole axis.
#[derive(Debug)]
pub struct RegisterCombine<'a> {
    geometry: &'a ScanGeometry,
    chunks: &'a ChunkLayout,
}

impl<'a> RegisterCombine<'a> {
    pub fn new(geometry: &'a ScanGeometry, chunks: &'a ChunkLayout) -> Self {
        Self { geometry, chunks }
    }
}

impl CrossWarpCombine for RegisterCombine<'_> {
    fn apply<C: Combiner + ?Sized>(
        &self,
        scope: &mut Scope,
        combiner: &C,
        ids: &ThreadIds,
        records: &mut [Record],
    ) {
        let scan_dim = self.geometry.axis_num_threads_per_warp_with_unique_data;
        let carries = self.chunks.axis_blocks() > 1;
        // A single warp spans the axis, so every unit is in the first axis warp.
        let first_lane = scope.equal(ids.lane_axis, 0u32);
        let last_lane =
            (carries && scan_dim > 1).then(|| ids.emit_last_axis_lane(scope, self.geometry));

        let mut accumulators = vec![Record::new(); self.chunks.num_accumulators()];

        for tail in self.chunks.tails() {
            let accumulator = &mut accumulators[tail.accumulator];

            // Prefix of every previous repetition of the line.
            let carried = if tail.axis_block == 0 {
                records[tail.register].clone()
            } else {
                let total = accumulate(scope, combiner, accumulator, &records[tail.register]);
                let carried = core::mem::replace(accumulator, Record::new());
                records[tail.register] = total;
                carried
            };
            let total = records[tail.register].clone();

            if let Some(last_lane) = last_lane {
                *accumulator = shuffle_record(scope, &total, last_lane);
            } else if carries {
                *accumulator = total.clone();
            }

            if self.chunks.elements_per_chunk() == 1 || (tail.axis_block == 0 && scan_dim == 1) {
                continue;
            }

            let previous = if scan_dim > 1 {
                let below = shuffle_up_record(scope, &total, self.geometry.axis_thread_stride);
                select_record(scope, first_lane, &carried, &below)
            } else {
                carried
            };

            for register in self.chunks.interior(&tail) {
                let original = records[register].clone();
                let mut value = accumulate(scope, combiner, &previous, &original);
                if tail.axis_block == 0 {
                    value = select_record(scope, first_lane, &original, &value);
                }
                records[register] = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lanescan_ir::{Elem, Memory, Operation, Synchronization};
    use lanescan_layout::BlockedLayout;

    use super::*;
    use pretty_assertions::assert_eq;

    fn geometry(layout: BlockedLayout, shape: Vec<u32>, axis: usize) -> ScanGeometry {
        ScanGeometry::new(layout, shape, axis, 4).unwrap()
    }

    #[test]
    fn strategy_follows_the_axis_distribution() {
        let many_warps = geometry(
            BlockedLayout::new(vec![1], vec![4], vec![2], vec![0]),
            vec![8],
            0,
        );
        let one_warp = geometry(
            BlockedLayout::new(vec![2], vec![4], vec![1], vec![0]),
            vec![8],
            0,
        );
        let single = geometry(
            BlockedLayout::new(vec![1], vec![4], vec![1], vec![0]),
            vec![4],
            0,
        );
        // Warps along the parallel dimension don't need an exchange.
        let parallel_warps = geometry(
            BlockedLayout::new(vec![1, 1], vec![1, 4], vec![2, 1], vec![1, 0]),
            vec![2, 4],
            1,
        );

        assert_eq!(
            CrossWarpStrategy::select(&many_warps),
            CrossWarpStrategy::SharedMemory
        );
        assert_eq!(
            CrossWarpStrategy::select(&one_warp),
            CrossWarpStrategy::Register
        );
        assert_eq!(CrossWarpStrategy::select(&single), CrossWarpStrategy::None);
        assert_eq!(
            CrossWarpStrategy::select(&parallel_warps),
            CrossWarpStrategy::None
        );
        assert_eq!(CrossWarpStrategy::SharedMemory.to_string(), "shared_memory");
    }

    #[test]
    fn shared_memory_combine_stores_each_tail_before_one_barrier() {
        let geometry = geometry(
            BlockedLayout::new(vec![1, 2], vec![2, 2], vec![2, 2], vec![1, 0]),
            vec![8, 16],
            1,
        );
        let chunks = ChunkLayout::new(&geometry);
        let mut scope = Scope::root();
        let ids = ThreadIds::emit(&mut scope, &geometry);
        let mut records = (0..chunks.num_registers())
            .map(|_| vec![scope.create_local(Elem::index())])
            .collect::<Vec<_>>();
        let add = |scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]| {
            vec![scope.add(lhs[0], rhs[0])]
        };

        SharedMemoryCombine::new(&geometry, &chunks).apply(&mut scope, &add, &ids, &mut records);

        let operations = scope
            .instructions
            .iter()
            .map(|instruction| &instruction.operation)
            .collect::<Vec<_>>();
        let barrier = operations
            .iter()
            .position(|op| matches!(op, Operation::Synchronization(Synchronization::SyncCube)))
            .unwrap();
        let stores = operations
            .iter()
            .filter(|op| matches!(op, Operation::Memory(Memory::Store(_))))
            .count();
        let loads_before_barrier = operations[..barrier]
            .iter()
            .filter(|op| matches!(op, Operation::Memory(Memory::Load(_))))
            .count();

        assert_eq!(stores, chunks.num_chunks());
        assert_eq!(loads_before_barrier, 0);
        assert_eq!(
            scope.shared_memory_size(),
            geometry.scratch_size_in_elems() as usize * Elem::index().size()
        );
    }
}
