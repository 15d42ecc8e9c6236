use derive_new::new;
use lanescan_ir::{Elem, Variable};

use crate::Record;

/// The registers of one scan operand held by each unit, in the order of the layout.
#[derive(new, Debug, Clone, PartialEq)]
pub struct OperandRegisters {
    pub elem: Elem,
    pub values: Vec<Variable>,
}

/// Transpose the operands into one [record](Record) per register.
///
/// Every operand is expected to hold the same number of registers.
pub fn unpack_inputs(operands: &[OperandRegisters]) -> Vec<Record> {
    let num_registers = operands.first().map_or(0, |op| op.values.len());

    (0..num_registers)
        .map(|register| operands.iter().map(|op| op.values[register]).collect())
        .collect()
}

/// Transpose the records back into one register list per operand.
pub fn pack_outputs(records: Vec<Record>, elems: &[Elem]) -> Vec<OperandRegisters> {
    let mut outputs = elems
        .iter()
        .map(|elem| OperandRegisters::new(*elem, Vec::with_capacity(records.len())))
        .collect::<Vec<_>>();

    for record in records {
        for (output, value) in outputs.iter_mut().zip(record) {
            output.values.push(value);
        }
    }

    outputs
}
