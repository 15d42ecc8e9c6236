use lanescan_ir::Scope;

use crate::{accumulate, ChunkLayout, Combiner, Record};

/// Sequential inclusive scan of every chunk held by the unit, in place.
///
/// Registers are visited in order, so each element is combined with the running value of its
/// own chunk only.
pub fn scan_thread_chunks<C: Combiner + ?Sized>(
    scope: &mut Scope,
    combiner: &C,
    chunks: &ChunkLayout,
    records: &mut [Record],
) {
    let mut accs = vec![Record::new(); chunks.num_chunks()];

    for (register, record) in records.iter_mut().enumerate() {
        let acc = &mut accs[chunks.chunk_of(register)];
        *acc = accumulate(scope, combiner, acc, record);
        *record = acc.clone();
    }
}
