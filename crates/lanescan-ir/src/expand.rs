//! Helpers registering a single instruction and returning its freshly allocated output.

use crate::{
    Arithmetic, BinaryOperator, Comparison, Elem, Instruction, LoadOperator, Memory, Operator,
    Plane, Scope, Select, ShuffleUpOperator, StoreOperator, Synchronization, UnaryOperator,
    Variable,
};

impl Scope {
    fn arithmetic(
        &mut self,
        op: fn(BinaryOperator) -> Arithmetic,
        lhs: Variable,
        rhs: Variable,
    ) -> Variable {
        let out = self.create_local(lhs.elem);
        self.register(Instruction::new(op(BinaryOperator::new(lhs, rhs)), out));
        out
    }

    fn comparison(
        &mut self,
        op: fn(BinaryOperator) -> Comparison,
        lhs: Variable,
        rhs: Variable,
    ) -> Variable {
        let out = self.create_local(Elem::Bool);
        self.register(Instruction::new(op(BinaryOperator::new(lhs, rhs)), out));
        out
    }

    pub fn add(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.arithmetic(Arithmetic::Add, lhs.into(), rhs.into())
    }

    pub fn sub(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.arithmetic(Arithmetic::Sub, lhs.into(), rhs.into())
    }

    pub fn mul(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.arithmetic(Arithmetic::Mul, lhs.into(), rhs.into())
    }

    pub fn div(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.arithmetic(Arithmetic::Div, lhs.into(), rhs.into())
    }

    pub fn rem(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.arithmetic(Arithmetic::Modulo, lhs.into(), rhs.into())
    }

    pub fn max(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.arithmetic(Arithmetic::Max, lhs.into(), rhs.into())
    }

    pub fn min(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.arithmetic(Arithmetic::Min, lhs.into(), rhs.into())
    }

    pub fn equal(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.comparison(Comparison::Equal, lhs.into(), rhs.into())
    }

    pub fn not_equal(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.comparison(Comparison::NotEqual, lhs.into(), rhs.into())
    }

    pub fn lower(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.comparison(Comparison::Lower, lhs.into(), rhs.into())
    }

    pub fn lower_equal(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.comparison(Comparison::LowerEqual, lhs.into(), rhs.into())
    }

    pub fn greater(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        self.comparison(Comparison::Greater, lhs.into(), rhs.into())
    }

    pub fn greater_equal(
        &mut self,
        lhs: impl Into<Variable>,
        rhs: impl Into<Variable>,
    ) -> Variable {
        self.comparison(Comparison::GreaterEqual, lhs.into(), rhs.into())
    }

    pub fn and(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        let out = self.create_local(Elem::Bool);
        let op = BinaryOperator::new(lhs.into(), rhs.into());
        self.register(Instruction::new(Operator::And(op), out));
        out
    }

    pub fn or(&mut self, lhs: impl Into<Variable>, rhs: impl Into<Variable>) -> Variable {
        let out = self.create_local(Elem::Bool);
        let op = BinaryOperator::new(lhs.into(), rhs.into());
        self.register(Instruction::new(Operator::Or(op), out));
        out
    }

    pub fn not(&mut self, input: impl Into<Variable>) -> Variable {
        let out = self.create_local(Elem::Bool);
        let op = UnaryOperator::new(input.into());
        self.register(Instruction::new(Operator::Not(op), out));
        out
    }

    /// `cond ? then : or_else`, typed after `then`.
    pub fn select(
        &mut self,
        cond: impl Into<Variable>,
        then: impl Into<Variable>,
        or_else: impl Into<Variable>,
    ) -> Variable {
        let then = then.into();
        let out = self.create_local(then.elem);
        let op = Select::new(cond.into(), then, or_else.into());
        self.register(Instruction::new(Operator::Select(op), out));
        out
    }

    /// Read `value` from the unit `offset` plane positions below the current one.
    pub fn shuffle_up(&mut self, value: Variable, offset: u32) -> Variable {
        let out = self.create_local(value.elem);
        let op = ShuffleUpOperator::new(value, offset);
        self.register(Instruction::new(Plane::ShuffleUp(op), out));
        out
    }

    /// Read `value` from the unit at plane position `lane`.
    pub fn shuffle(&mut self, value: Variable, lane: impl Into<Variable>) -> Variable {
        let out = self.create_local(value.elem);
        let op = BinaryOperator::new(value, lane.into());
        self.register(Instruction::new(Plane::Shuffle(op), out));
        out
    }

    pub fn load_shared(&mut self, array: Variable, index: impl Into<Variable>) -> Variable {
        let out = self.create_local(array.elem);
        let op = LoadOperator::new(array, index.into());
        self.register(Instruction::new(Memory::Load(op), out));
        out
    }

    pub fn store_shared(
        &mut self,
        array: Variable,
        index: impl Into<Variable>,
        value: Variable,
        predicate: impl Into<Variable>,
    ) {
        let op = StoreOperator::new(array, index.into(), value, predicate.into());
        self.register(Instruction::no_out(Memory::Store(op)));
    }

    pub fn sync_cube(&mut self) {
        self.register(Instruction::no_out(Synchronization::SyncCube));
    }
}
