use lanescan_ir::{Scope, Variable};

use crate::{select_record, Combiner, Record};

/// Running position of the maximum, over `(item, coordinate)` operand pairs.
///
/// In case of equality the lowest coordinate is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgMax;

/// Running position of the minimum, over `(item, coordinate)` operand pairs.
///
/// In case of equality the lowest coordinate is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgMin;

impl Combiner for ArgMax {
    fn combine(&self, scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Record {
        let better = scope.greater(lhs[0], rhs[0]);
        choose(scope, lhs, rhs, better)
    }
}

impl Combiner for ArgMin {
    fn combine(&self, scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Record {
        let better = scope.lower(lhs[0], rhs[0]);
        choose(scope, lhs, rhs, better)
    }
}

fn choose(scope: &mut Scope, lhs: &[Variable], rhs: &[Variable], better: Variable) -> Record {
    assert_eq!(lhs.len(), 2, "Arg scans take an item and a coordinate operand");

    let same_item = scope.equal(lhs[0], rhs[0]);
    let lower_coordinate = scope.lower(lhs[1], rhs[1]);
    let keep = scope.select(same_item, lower_coordinate, better);

    select_record(scope, keep, lhs, rhs)
}
