#![allow(dead_code)]

use lanescan::{
    config::lowering::LoweringConfig, Combiner, OperandRegisters, ScanLowering, ScanOperation,
};
use lanescan_ir::{ConstantValue, Elem, Scope};
use lanescan_layout::BlockedLayout;
use lanescan_sim::{CubeTopology, ExecutionError, SimtExecutor};

/// A tensor with one value column per operand, in row-major order.
pub type Columns = Vec<Vec<ConstantValue>>;

#[derive(Debug, Clone)]
pub struct TestCase {
    pub layout: BlockedLayout,
    pub shape: Vec<u32>,
    pub axis: usize,
    pub warp_size: u32,
}

/// What a lowered scan produced once executed.
#[derive(Debug)]
pub struct ScanRun {
    pub outputs: Columns,
    pub scope: Scope,
    pub barriers: u32,
}

impl TestCase {
    pub fn new(layout: BlockedLayout, shape: Vec<u32>, axis: usize, warp_size: u32) -> Self {
        Self {
            layout,
            shape,
            axis,
            warp_size,
        }
    }

    pub fn len(&self) -> usize {
        self.shape.iter().product::<u32>() as usize
    }

    fn topology(&self) -> CubeTopology {
        CubeTopology::new(self.warp_size, self.layout.num_warps())
    }

    fn row_major(&self, coordinates: &[u32]) -> usize {
        coordinates
            .iter()
            .zip(&self.shape)
            .fold(0, |acc, (c, s)| acc * *s as usize + *c as usize)
    }

    /// Registers of every unit, unit by unit, as tensor positions.
    fn positions(&self) -> Vec<Vec<usize>> {
        let topology = self.topology();
        (0..topology.num_units())
            .map(|unit| {
                self.layout
                    .element_coordinates(
                        &self.shape,
                        unit % self.warp_size,
                        unit / self.warp_size,
                    )
                    .iter()
                    .map(|coordinates| self.row_major(coordinates))
                    .collect()
            })
            .collect()
    }

    /// Lower the scan, execute it on a simulated cube and gather the outputs back into columns.
    pub fn run<C: Combiner>(
        &self,
        combiner: &C,
        elems: &[Elem],
        inputs: &Columns,
    ) -> Result<ScanRun, ExecutionError> {
        let positions = self.positions();
        let registers = positions[0].len();
        let mut scope = Scope::root();

        let operands = elems
            .iter()
            .map(|elem| {
                let values = (0..registers).map(|_| scope.create_local(*elem)).collect();
                OperandRegisters::new(*elem, values)
            })
            .collect::<Vec<_>>();
        let op = ScanOperation {
            layout: self.layout.clone(),
            shape: self.shape.clone(),
            axis: self.axis,
            inputs: operands.clone(),
        };

        let lowering = ScanLowering::new(LoweringConfig::default().with_warp_size(self.warp_size));
        let outputs = lowering
            .lower(&mut scope, &op, combiner)
            .expect("The scan should be supported");

        let mut executor = SimtExecutor::new(self.topology());
        for (operand, input) in operands.iter().zip(inputs) {
            for (register, variable) in operand.values.iter().enumerate() {
                let values = positions
                    .iter()
                    .map(|unit| input[unit[register]])
                    .collect();
                executor.bind(*variable, values)?;
            }
        }
        executor.execute(&scope.instructions)?;

        let mut columns: Vec<Vec<Option<ConstantValue>>> =
            vec![vec![None; self.len()]; elems.len()];
        for (column, output) in columns.iter_mut().zip(&outputs) {
            for (register, variable) in output.values.iter().enumerate() {
                let values = executor.read(*variable)?;
                for (unit, value) in values.into_iter().enumerate() {
                    let slot = &mut column[positions[unit][register]];
                    if let Some(previous) = slot {
                        assert_eq!(*previous, value, "Copies of an element must agree");
                    }
                    *slot = Some(value);
                }
            }
        }

        Ok(ScanRun {
            outputs: columns
                .into_iter()
                .map(|column| {
                    column
                        .into_iter()
                        .map(|value| value.expect("Every element is owned"))
                        .collect()
                })
                .collect(),
            barriers: executor.barriers(),
            scope,
        })
    }

    /// Inclusive scan of every line along the axis, on the host.
    pub fn reference(
        &self,
        inputs: &Columns,
        op: impl Fn(&[ConstantValue], &[ConstantValue]) -> Vec<ConstantValue>,
    ) -> Columns {
        let mut outputs = inputs.clone();
        let axis_stride = self.shape[self.axis + 1..].iter().product::<u32>() as usize;
        let extent = self.shape[self.axis] as usize;

        for start in 0..self.len() {
            if (start / axis_stride) % extent != 0 {
                continue;
            }
            let mut acc = inputs.iter().map(|column| column[start]).collect::<Vec<_>>();
            for step in 1..extent {
                let position = start + step * axis_stride;
                let cur = inputs.iter().map(|column| column[position]).collect::<Vec<_>>();
                acc = op(&acc, &cur);
                for (column, value) in outputs.iter_mut().zip(&acc) {
                    column[position] = *value;
                }
            }
        }

        outputs
    }
}

pub fn ints(values: impl IntoIterator<Item = i64>) -> Vec<ConstantValue> {
    values.into_iter().map(ConstantValue::Int).collect()
}

pub fn uints(values: impl IntoIterator<Item = u64>) -> Vec<ConstantValue> {
    values.into_iter().map(ConstantValue::UInt).collect()
}

pub fn host_sum(lhs: &[ConstantValue], rhs: &[ConstantValue]) -> Vec<ConstantValue> {
    lhs.iter()
        .zip(rhs)
        .map(|(l, r)| ConstantValue::Int(l.as_i64().wrapping_add(r.as_i64())))
        .collect()
}
