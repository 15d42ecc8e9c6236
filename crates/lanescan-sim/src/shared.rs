use hashbrown::HashMap;
use lanescan_ir::{ConstantValue, Id, Variable, VariableKind};

use crate::ExecutionError;

#[derive(Debug, Clone, Copy)]
struct Slot {
    value: ConstantValue,
    epoch: u32,
    warp: u32,
}

/// Shared memory of a cube, tracking which warp wrote each slot and in which barrier epoch.
///
/// An epoch is the span of instructions between two cube barriers.
#[derive(Debug, Default)]
pub struct SharedMemory {
    arrays: HashMap<Id, Vec<Option<Slot>>>,
    epoch: u32,
}

impl SharedMemory {
    /// Start a new epoch, making every previous store visible to all warps.
    pub fn barrier(&mut self) {
        self.epoch += 1;
    }

    pub fn store(
        &mut self,
        array: Variable,
        index: u32,
        value: ConstantValue,
        unit: u32,
        warp: u32,
    ) -> Result<(), ExecutionError> {
        let epoch = self.epoch;
        let (id, slot) = self.slot(array, index)?;

        if let Some(previous) = slot {
            if previous.epoch == epoch && previous.value != value {
                return Err(ExecutionError::ConflictingWrite {
                    unit,
                    array: id,
                    index,
                });
            }
        }

        *slot = Some(Slot { value, epoch, warp });
        Ok(())
    }

    pub fn load(
        &mut self,
        array: Variable,
        index: u32,
        unit: u32,
        warp: u32,
    ) -> Result<ConstantValue, ExecutionError> {
        let epoch = self.epoch;
        let (id, slot) = self.slot(array, index)?;

        match slot {
            None => Err(ExecutionError::UninitializedRead {
                unit,
                array: id,
                index,
            }),
            Some(slot) if slot.epoch == epoch && slot.warp != warp => {
                Err(ExecutionError::UnsynchronizedRead {
                    unit,
                    array: id,
                    index,
                    writer: slot.warp,
                })
            }
            Some(slot) => Ok(slot.value),
        }
    }

    fn slot(
        &mut self,
        array: Variable,
        index: u32,
    ) -> Result<(Id, &mut Option<Slot>), ExecutionError> {
        let VariableKind::SharedArray { id, length } = array.kind else {
            return Err(ExecutionError::Unsupported {
                instruction: format!("shared access through {array}"),
            });
        };

        let slots = self
            .arrays
            .entry(id)
            .or_insert_with(|| vec![None; length as usize]);

        match slots.get_mut(index as usize) {
            Some(slot) => Ok((id, slot)),
            None => Err(ExecutionError::OutOfBounds {
                array: id,
                index,
                length,
            }),
        }
    }
}
