use derive_new::new;
use hashbrown::HashMap;
use lanescan_ir::{
    Builtin, ConstantValue, Id, Instruction, Memory, Operation, Operator, Plane, Synchronization,
    Variable, VariableKind,
};

use crate::{
    shared::SharedMemory,
    value::{arithmetic, comparison},
    ExecutionError,
};

/// Shape of the simulated cube.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeTopology {
    pub warp_size: u32,
    pub num_warps: u32,
}

impl CubeTopology {
    pub fn num_units(&self) -> u32 {
        self.warp_size * self.num_warps
    }
}

/// Executes a straight-line program for every unit of a cube.
///
/// Units run in lockstep: each instruction is executed by all units, in unit order, before the
/// next one starts. Register reads are therefore always well defined, while shared memory
/// accesses are checked against barrier epochs to catch programs that would race on hardware
/// where warps progress independently.
#[derive(Debug)]
pub struct SimtExecutor {
    topology: CubeTopology,
    registers: HashMap<Id, Vec<ConstantValue>>,
    shared: SharedMemory,
    barriers: u32,
}

impl SimtExecutor {
    pub fn new(topology: CubeTopology) -> Self {
        Self {
            topology,
            registers: HashMap::new(),
            shared: SharedMemory::default(),
            barriers: 0,
        }
    }

    pub fn topology(&self) -> CubeTopology {
        self.topology
    }

    /// Number of cube barriers executed so far.
    pub fn barriers(&self) -> u32 {
        self.barriers
    }

    /// Assign one value per unit to a register, before executing the program that reads it.
    pub fn bind(
        &mut self,
        variable: Variable,
        values: Vec<ConstantValue>,
    ) -> Result<(), ExecutionError> {
        let expected = self.topology.num_units() as usize;
        if values.len() != expected {
            return Err(ExecutionError::BindingLength {
                expected,
                actual: values.len(),
            });
        }

        let values = values
            .into_iter()
            .map(|value| value.cast_to(variable.elem))
            .collect();
        self.assign(variable, values)
    }

    pub fn execute(&mut self, instructions: &[Instruction]) -> Result<(), ExecutionError> {
        for instruction in instructions {
            log::trace!("{instruction}");
            self.execute_instruction(instruction)?;
        }

        Ok(())
    }

    /// The value of `variable` for every unit, in unit order.
    pub fn read(&self, variable: Variable) -> Result<Vec<ConstantValue>, ExecutionError> {
        (0..self.topology.num_units())
            .map(|unit| self.value(variable, unit))
            .collect()
    }

    fn execute_instruction(&mut self, instruction: &Instruction) -> Result<(), ExecutionError> {
        match &instruction.operation {
            Operation::Synchronization(Synchronization::SyncCube) => {
                self.shared.barrier();
                self.barriers += 1;
                return Ok(());
            }
            Operation::Memory(Memory::Store(op)) => {
                for unit in 0..self.topology.num_units() {
                    if !self.value(op.predicate, unit)?.as_bool() {
                        continue;
                    }
                    let index = self.value(op.index, unit)?.as_u32();
                    let value = self.value(op.value, unit)?.cast_to(op.array.elem);
                    let warp = unit / self.topology.warp_size;
                    self.shared.store(op.array, index, value, unit, warp)?;
                }
                return Ok(());
            }
            _ => {}
        }

        let out = instruction.out.ok_or_else(|| ExecutionError::Unsupported {
            instruction: instruction.to_string(),
        })?;
        let values = (0..self.topology.num_units())
            .map(|unit| self.compute(&instruction.operation, out, unit))
            .collect::<Result<Vec<_>, _>>()?;

        self.assign(out, values)
    }

    fn compute(
        &mut self,
        operation: &Operation,
        out: Variable,
        unit: u32,
    ) -> Result<ConstantValue, ExecutionError> {
        let value = match operation {
            Operation::Copy(input) => self.value(*input, unit)?,
            Operation::Arithmetic(op) => {
                let operands = op.operands();
                let lhs = self.value(operands.lhs, unit)?;
                let rhs = self.value(operands.rhs, unit)?;
                arithmetic(op, lhs, rhs, out.elem)
                    .ok_or(ExecutionError::DivisionByZero { unit })?
            }
            Operation::Comparison(op) => {
                let operands = op.operands();
                let lhs = self.value(operands.lhs, unit)?;
                let rhs = self.value(operands.rhs, unit)?;
                comparison(op, lhs, rhs, operands.lhs.elem)
            }
            Operation::Operator(op) => match op {
                Operator::And(op) => ConstantValue::Bool(
                    self.value(op.lhs, unit)?.as_bool() && self.value(op.rhs, unit)?.as_bool(),
                ),
                Operator::Or(op) => ConstantValue::Bool(
                    self.value(op.lhs, unit)?.as_bool() || self.value(op.rhs, unit)?.as_bool(),
                ),
                Operator::Not(op) => ConstantValue::Bool(!self.value(op.input, unit)?.as_bool()),
                Operator::Select(op) => {
                    if self.value(op.cond, unit)?.as_bool() {
                        self.value(op.then, unit)?
                    } else {
                        self.value(op.or_else, unit)?
                    }
                }
            },
            Operation::Plane(op) => self.plane(op, unit)?,
            Operation::Memory(Memory::Load(op)) => {
                let index = self.value(op.index, unit)?.as_u32();
                let warp = unit / self.topology.warp_size;
                self.shared.load(op.array, index, unit, warp)?
            }
            Operation::Memory(Memory::Store(_)) | Operation::Synchronization(_) => {
                return Err(ExecutionError::Unsupported {
                    instruction: operation.to_string(),
                })
            }
        };

        Ok(value.cast_to(out.elem))
    }

    fn plane(&self, plane: &Plane, unit: u32) -> Result<ConstantValue, ExecutionError> {
        let warp_size = self.topology.warp_size;
        let lane = unit % warp_size;
        let warp_start = unit - lane;

        match plane {
            Plane::ShuffleUp(op) => {
                let source = if lane >= op.offset {
                    unit - op.offset
                } else {
                    unit
                };
                self.value(op.value, source)
            }
            Plane::Shuffle(op) => {
                let source_lane = self.value(op.rhs, unit)?.as_u32();
                if source_lane >= warp_size {
                    return Err(ExecutionError::LaneOutOfRange {
                        unit,
                        lane: source_lane,
                        warp_size,
                    });
                }
                self.value(op.lhs, warp_start + source_lane)
            }
        }
    }

    fn value(&self, variable: Variable, unit: u32) -> Result<ConstantValue, ExecutionError> {
        match variable.kind {
            VariableKind::Local { id } => self
                .registers
                .get(&id)
                .map(|values| values[unit as usize])
                .ok_or(ExecutionError::UndefinedRegister { variable }),
            VariableKind::Constant(value) => Ok(value),
            VariableKind::Builtin(Builtin::UnitPos) => Ok(ConstantValue::UInt(unit as u64)),
            VariableKind::SharedArray { .. } => Err(ExecutionError::Unsupported {
                instruction: format!("{variable} used as a scalar"),
            }),
        }
    }

    fn assign(
        &mut self,
        variable: Variable,
        values: Vec<ConstantValue>,
    ) -> Result<(), ExecutionError> {
        let VariableKind::Local { id } = variable.kind else {
            return Err(ExecutionError::Unsupported {
                instruction: format!("assignment to {variable}"),
            });
        };

        if self.registers.insert(id, values).is_some() {
            return Err(ExecutionError::RegisterReassigned { variable });
        }

        Ok(())
    }
}
