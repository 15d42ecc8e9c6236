//! Lowering of associative inclusive scans onto the lane, warp and cube hierarchy of SIMT
//! processors.
//!
//! The values to scan are distributed over the units of a cube by a
//! [blocked layout](lanescan_layout::BlockedLayout). The lowering emits, into a
//! [scope](lanescan_ir::Scope), a register scan of each unit's chunks, a shuffle based scan
//! inside each warp and, when the axis spans several warps or tile repetitions, the exchange of
//! the partial results between them.

/// Lowering configuration.
pub mod config;

mod assemble;
mod chunks;
mod combine;
mod cross;
mod error;
mod geometry;
mod instructions;
mod thread;
mod warp;

pub use assemble::*;
pub use chunks::*;
pub use combine::*;
pub use cross::*;
pub use error::*;
pub use geometry::*;
pub use instructions::*;
pub use thread::*;
pub use warp::*;

use config::{
    lowering::{LoweringConfig, LoweringLogLevel},
    GlobalConfig, Logger,
};
use lanescan_ir::{Elem, Instruction, Scope};
use lanescan_layout::{BlockedLayout, ScanGeometry};

/// A scan over one axis of a distributed tensor, with any number of operands.
#[derive(Debug, Clone)]
pub struct ScanOperation {
    pub layout: BlockedLayout,
    pub shape: Vec<u32>,
    pub axis: usize,
    /// One entry per operand, all distributed by `layout`.
    pub inputs: Vec<OperandRegisters>,
}

/// Emits scans for a target warp size.
#[derive(Debug)]
pub struct ScanLowering {
    config: LoweringConfig,
    logger: spin::Mutex<Logger>,
}

impl Default for ScanLowering {
    fn default() -> Self {
        Self::new(GlobalConfig::get().lowering.clone())
    }
}

impl ScanLowering {
    pub fn new(config: LoweringConfig) -> Self {
        let logger = Logger::from_config(&config.logger);
        Self {
            config,
            logger: spin::Mutex::new(logger),
        }
    }

    pub fn config(&self) -> &LoweringConfig {
        &self.config
    }

    /// Emit the inclusive scan of `op` into `scope` and return the scanned registers of every
    /// operand, in the order of the inputs.
    ///
    /// When an error is returned the scope is left untouched.
    pub fn lower<C: Combiner + ?Sized>(
        &self,
        scope: &mut Scope,
        op: &ScanOperation,
        combiner: &C,
    ) -> Result<Vec<OperandRegisters>, ScanLoweringError> {
        let geometry = ScanGeometry::new(
            op.layout.clone(),
            op.shape.clone(),
            op.axis,
            self.config.warp_size,
        )?;

        if op.inputs.is_empty() {
            return Err(ScanLoweringError::NoOperands);
        }
        let expected = geometry.total_elements_per_thread as usize;
        if let Some((operand, input)) = op
            .inputs
            .iter()
            .enumerate()
            .find(|(_, input)| input.values.len() != expected)
        {
            return Err(ScanLoweringError::OperandLength {
                operand,
                expected,
                actual: input.values.len(),
            });
        }

        let start = scope.instructions.len();
        let strategy = CrossWarpStrategy::select(&geometry);
        log::debug!(
            "Lowering scan along axis {} of {:?} with the {strategy} strategy",
            op.axis,
            op.shape
        );

        let ids = ThreadIds::emit(scope, &geometry);
        let chunks = ChunkLayout::new(&geometry);
        let mut records = unpack_inputs(&op.inputs);

        scan_thread_chunks(scope, combiner, &chunks, &mut records);
        scan_warp(scope, combiner, &geometry, &chunks, &ids, &mut records);

        match strategy {
            CrossWarpStrategy::SharedMemory => SharedMemoryCombine::new(&geometry, &chunks)
                .apply(scope, combiner, &ids, &mut records),
            CrossWarpStrategy::Register => {
                RegisterCombine::new(&geometry, &chunks).apply(scope, combiner, &ids, &mut records)
            }
            CrossWarpStrategy::None => {}
        }

        self.log(&geometry, strategy, &scope.instructions[start..]);

        let elems = op.inputs.iter().map(|input| input.elem).collect::<Vec<Elem>>();
        Ok(pack_outputs(records, &elems))
    }

    fn log(
        &self,
        geometry: &ScanGeometry,
        strategy: CrossWarpStrategy,
        instructions: &[Instruction],
    ) {
        let mut logger = self.logger.lock();

        match logger.log_level_lowering() {
            LoweringLogLevel::Disabled => {}
            LoweringLogLevel::Basic => {
                logger.log_lowering(&summary(geometry, strategy, instructions))
            }
            LoweringLogLevel::Full => {
                logger.log_lowering(&summary(geometry, strategy, instructions));
                for instruction in instructions {
                    logger.log_lowering(instruction);
                }
            }
        }
    }
}

fn summary(
    geometry: &ScanGeometry,
    strategy: CrossWarpStrategy,
    instructions: &[Instruction],
) -> String {
    format!(
        "[Scan] shape {:?} axis {} warp size {} strategy {strategy}: {} registers per unit, \
         {} scratch elements, {} instructions",
        geometry.shape,
        geometry.axis,
        geometry.warp_size,
        geometry.total_elements_per_thread,
        if strategy == CrossWarpStrategy::SharedMemory {
            geometry.scratch_size_in_elems()
        } else {
            0
        },
        instructions.len()
    )
}
