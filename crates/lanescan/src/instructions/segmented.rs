use lanescan_ir::{Scope, Variable};

use crate::{select_record, Combiner, Record};

/// Restarts the scan of `inner` at every element whose head flag is set.
///
/// The last operand is the boolean head flag, the others are handed to `inner`. Combining `a`
/// with `b` yields `b` when `b` starts a segment and `inner(a, b)` otherwise, the flag of the
/// result is set if either flag is. This keeps the operator associative, so segmented scans go
/// through the regular lowering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmented<I> {
    inner: I,
}

impl<I: Combiner> Segmented<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: Combiner> Combiner for Segmented<I> {
    fn combine(&self, scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Record {
        assert!(!rhs.is_empty(), "Segmented scans need a head flag operand");
        let values = rhs.len() - 1;
        let (lhs_values, lhs_flag) = (&lhs[..values], lhs[values]);
        let (rhs_values, rhs_flag) = (&rhs[..values], rhs[values]);

        let combined = self.inner.combine(scope, lhs_values, rhs_values);
        let mut out = select_record(scope, rhs_flag, rhs_values, &combined);
        out.push(scope.or(lhs_flag, rhs_flag));
        out
    }
}
