use lanescan_ir::{Scope, Variable};

/// The values of every operand at one tensor position.
pub type Record = Vec<Variable>;

/// An associative binary operator over records, emitted into a [scope](Scope).
///
/// `lhs` always precedes `rhs` along the scan axis, so the operator doesn't need to be
/// commutative. It is invoked many times with fresh arguments and must not have side effects.
pub trait Combiner {
    /// Emit the instructions combining `lhs` with `rhs`, returning one value per operand.
    fn combine(&self, scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Record;
}

impl<F> Combiner for F
where
    F: Fn(&mut Scope, &[Variable], &[Variable]) -> Record,
{
    fn combine(&self, scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Record {
        self(scope, lhs, rhs)
    }
}

/// Combine `acc` with `cur`. An empty `acc` is the identity and `cur` is returned as is.
pub fn accumulate<C: Combiner + ?Sized>(
    scope: &mut Scope,
    combiner: &C,
    acc: &[Variable],
    cur: &[Variable],
) -> Record {
    if acc.is_empty() {
        return cur.to_vec();
    }
    assert_eq!(acc.len(), cur.len(), "Records must have the same arity");

    let out = combiner.combine(scope, acc, cur);
    assert_eq!(
        out.len(),
        cur.len(),
        "The combine function must return one value per operand"
    );
    out
}

/// Select between two records operand by operand.
pub fn select_record(
    scope: &mut Scope,
    cond: Variable,
    then: &[Variable],
    or_else: &[Variable],
) -> Record {
    then.iter()
        .zip(or_else)
        .map(|(then, or_else)| scope.select(cond, *then, *or_else))
        .collect()
}

/// Read `record` from the unit `offset` lanes below in the warp.
pub fn shuffle_up_record(scope: &mut Scope, record: &[Variable], offset: u32) -> Record {
    record
        .iter()
        .map(|value| scope.shuffle_up(*value, offset))
        .collect()
}

/// Read `record` from the unit at position `lane` of the warp.
pub fn shuffle_record(scope: &mut Scope, record: &[Variable], lane: Variable) -> Record {
    record
        .iter()
        .map(|value| scope.shuffle(*value, lane))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use lanescan_ir::Elem;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_accumulator_is_the_identity() {
        let mut scope = Scope::root();
        let cur = vec![scope.create_local(Elem::index())];
        let add = |scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]| {
            vec![scope.add(lhs[0], rhs[0])]
        };

        let out = accumulate(&mut scope, &add, &[], &cur);

        assert_eq!(out, cur);
        assert!(scope.instructions.is_empty());
    }

    #[test]
    fn accumulator_is_the_left_operand() {
        let mut scope = Scope::root();
        let acc = vec![scope.create_local(Elem::index())];
        let cur = vec![scope.create_local(Elem::index())];
        let calls = RefCell::new(Vec::new());
        let record = |_: &mut Scope, lhs: &[Variable], rhs: &[Variable]| {
            calls.borrow_mut().push((lhs[0], rhs[0]));
            rhs.to_vec()
        };

        accumulate(&mut scope, &record, &acc, &cur);

        assert_eq!(calls.into_inner(), vec![(acc[0], cur[0])]);
    }

    #[test]
    #[should_panic(expected = "one value per operand")]
    fn combiner_arity_is_checked() {
        let mut scope = Scope::root();
        let acc = vec![scope.create_local(Elem::index())];
        let drop_all = |_: &mut Scope, _: &[Variable], _: &[Variable]| Vec::<Variable>::new();

        accumulate(&mut scope, &drop_all, &acc, &acc);
    }
}
