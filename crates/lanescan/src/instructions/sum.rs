use lanescan_ir::{Scope, Variable};

use super::elementwise;
use crate::{Combiner, Record};

/// Cumulative sum of every operand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

/// Cumulative product of every operand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prod;

/// Running maximum of every operand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

/// Running minimum of every operand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl Combiner for Sum {
    fn combine(&self, scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Record {
        elementwise(scope, lhs, rhs, |scope, lhs, rhs| scope.add(lhs, rhs))
    }
}

impl Combiner for Prod {
    fn combine(&self, scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Record {
        elementwise(scope, lhs, rhs, |scope, lhs, rhs| scope.mul(lhs, rhs))
    }
}

impl Combiner for Max {
    fn combine(&self, scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Record {
        elementwise(scope, lhs, rhs, |scope, lhs, rhs| scope.max(lhs, rhs))
    }
}

impl Combiner for Min {
    fn combine(&self, scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Record {
        elementwise(scope, lhs, rhs, |scope, lhs, rhs| scope.min(lhs, rhs))
    }
}
