mod common;

use common::*;
use lanescan::{ArgMax, Max, Segmented, Sum};
use lanescan_ir::{ConstantValue, Elem, FloatKind, IntKind, Scope, Variable};
use lanescan_layout::BlockedLayout;
use pretty_assertions::assert_eq;
use rand::{distr::Uniform, rngs::StdRng, Rng, SeedableRng};

const I32: Elem = Elem::Int(IntKind::I32);

fn random_ints(len: usize, seed: u64) -> Vec<ConstantValue> {
    ints(
        StdRng::seed_from_u64(seed)
            .sample_iter(Uniform::<i64>::new(1, 20).unwrap())
            .take(len),
    )
}

fn assert_sum_scan(case: &TestCase) {
    let inputs = vec![random_ints(case.len(), 1234)];
    let expected = case.reference(&inputs, host_sum);

    let run = case.run(&Sum, &[I32], &inputs).unwrap();

    assert_eq!(run.outputs, expected);
}

/// Axis (dim 1) is the fastest dimension, two warps and two tile repetitions along it.
fn multi_warp_multi_block() -> TestCase {
    TestCase::new(
        BlockedLayout::new(vec![1, 2], vec![2, 2], vec![2, 2], vec![1, 0]),
        vec![8, 16],
        1,
        4,
    )
}

/// Axis (dim 0) is the slowest dimension, chunk elements are strided in the registers.
fn strided_axis() -> TestCase {
    TestCase::new(
        BlockedLayout::new(vec![2, 2], vec![2, 2], vec![2, 1], vec![1, 0]),
        vec![16, 4],
        0,
        4,
    )
}

#[test]
fn scans_one_dimension_across_two_warps() {
    let case = TestCase::new(
        BlockedLayout::new(vec![1], vec![4], vec![2], vec![0]),
        vec![8],
        0,
        4,
    );
    let inputs = vec![ints(1..=8)];

    let run = case.run(&Sum, &[I32], &inputs).unwrap();

    assert_eq!(run.outputs, vec![ints([1, 3, 6, 10, 15, 21, 28, 36])]);
    assert_eq!(run.barriers, 1);
}

#[test]
fn scans_across_warps_and_tile_repetitions() {
    assert_sum_scan(&multi_warp_multi_block());
}

#[test]
fn scans_along_a_strided_axis() {
    assert_sum_scan(&strided_axis());
}

#[test]
fn carries_across_tile_repetitions_of_a_single_warp() {
    let case = TestCase::new(
        BlockedLayout::new(vec![2], vec![4], vec![1], vec![0]),
        vec![32],
        0,
        4,
    );
    let inputs = vec![random_ints(case.len(), 7)];
    let expected = case.reference(&inputs, |lhs, rhs| {
        vec![ConstantValue::Int(lhs[0].as_i64().max(rhs[0].as_i64()))]
    });

    let max = case.run(&Max, &[I32], &inputs).unwrap();

    assert_eq!(max.outputs, expected);
    assert_eq!(max.barriers, 0);
    assert_sum_scan(&case);
}

#[test]
fn carries_when_one_lane_spans_the_axis_of_a_warp() {
    // Every warp lane is on a different line, each unit holds 4 axis elements per repetition.
    let case = TestCase::new(
        BlockedLayout::new(vec![1, 4], vec![4, 1], vec![1, 1], vec![1, 0]),
        vec![4, 16],
        1,
        4,
    );

    assert_sum_scan(&case);
}

#[test]
fn axis_of_extent_one_is_the_identity() {
    let case = TestCase::new(
        BlockedLayout::new(vec![1, 1], vec![4, 1], vec![1, 1], vec![1, 0]),
        vec![4, 1],
        1,
        4,
    );
    let inputs = vec![ints([5, 6, 7, 8])];

    let run = case.run(&Sum, &[I32], &inputs).unwrap();

    assert_eq!(run.outputs, inputs);
}

#[test]
fn broadcast_lanes_produce_identical_copies() {
    // 8 lanes over an axis of 4 elements and a second warp copying the first.
    let case = TestCase::new(
        BlockedLayout::new(vec![1], vec![8], vec![2], vec![0]),
        vec![4],
        0,
        8,
    );

    assert_sum_scan(&case);
}

#[test]
fn broadcast_warps_share_the_scratch_slots() {
    // Warps 2 and 3 hold copies of warps 0 and 1.
    let case = TestCase::new(
        BlockedLayout::new(vec![2], vec![4], vec![4], vec![0]),
        vec![16],
        0,
        4,
    );

    assert_sum_scan(&case);
}

#[test]
fn scans_with_full_warps() {
    let case = TestCase::new(
        BlockedLayout::new(vec![1, 2], vec![1, 32], vec![2, 2], vec![1, 0]),
        vec![4, 256],
        1,
        32,
    );

    assert_sum_scan(&case);
}

#[test]
fn argmax_keeps_the_first_maximum() {
    let case = multi_warp_multi_block();
    let items = StdRng::seed_from_u64(1234)
        .sample_iter(Uniform::<i64>::new(0, 4).unwrap())
        .take(case.len())
        .map(|v| ConstantValue::Float(v as f64))
        .collect::<Vec<_>>();
    let coordinates = uints((0..case.len() as u64).map(|i| i % 16));
    let inputs = vec![items, coordinates];
    let expected = case.reference(&inputs, |lhs, rhs| {
        let keep = if lhs[0].as_f64() == rhs[0].as_f64() {
            lhs[1].as_u64() < rhs[1].as_u64()
        } else {
            lhs[0].as_f64() > rhs[0].as_f64()
        };
        if keep {
            lhs.to_vec()
        } else {
            rhs.to_vec()
        }
    });

    let run = case
        .run(&ArgMax, &[Elem::Float(FloatKind::F32), Elem::index()], &inputs)
        .unwrap();

    assert_eq!(run.outputs, expected);
}

/// Composition of affine maps `x -> a * x + b`, applied left to right.
fn compose(scope: &mut Scope, lhs: &[Variable], rhs: &[Variable]) -> Vec<Variable> {
    let scale = scope.mul(lhs[0], rhs[0]);
    let scaled = scope.mul(lhs[1], rhs[0]);
    let offset = scope.add(scaled, rhs[1]);
    vec![scale, offset]
}

fn host_compose(lhs: &[ConstantValue], rhs: &[ConstantValue]) -> Vec<ConstantValue> {
    let (a, b) = (lhs[0].as_i64() as i32, lhs[1].as_i64() as i32);
    let (c, d) = (rhs[0].as_i64() as i32, rhs[1].as_i64() as i32);
    vec![
        ConstantValue::Int(a.wrapping_mul(c) as i64),
        ConstantValue::Int(b.wrapping_mul(c).wrapping_add(d) as i64),
    ]
}

fn assert_affine_scan(case: &TestCase) {
    let inputs = vec![random_ints(case.len(), 1234), random_ints(case.len(), 4321)];
    let expected = case.reference(&inputs, host_compose);

    let run = case.run(&compose, &[I32, I32], &inputs).unwrap();

    assert_eq!(run.outputs, expected);
}

#[test]
fn non_commutative_operators_keep_the_axis_order() {
    assert_affine_scan(&strided_axis());
}

#[test]
fn non_commutative_operators_across_warps_with_one_axis_lane() {
    // Each warp has a single lane per line, two warps split the axis.
    let case = TestCase::new(
        BlockedLayout::new(vec![1, 4], vec![4, 1], vec![1, 2], vec![1, 0]),
        vec![4, 32],
        1,
        4,
    );

    let run = case
        .run(&compose, &[I32, I32], &vec![ints(0..128), ints(0..128)])
        .unwrap();
    assert_eq!(run.barriers, 1);
    assert_affine_scan(&case);
}

#[test]
fn non_commutative_operators_across_tile_repetitions_of_a_single_warp() {
    let case = TestCase::new(
        BlockedLayout::new(vec![2], vec![4], vec![1], vec![0]),
        vec![32],
        0,
        4,
    );

    assert_affine_scan(&case);
}

#[test]
fn head_flags_restart_the_scan() {
    let case = multi_warp_multi_block();
    let mut rng = StdRng::seed_from_u64(99);
    let flags = (0..case.len())
        .map(|_| ConstantValue::Bool(rng.random_bool(0.2)))
        .collect::<Vec<_>>();
    let inputs = vec![random_ints(case.len(), 1234), flags];
    let expected = case.reference(&inputs, |lhs, rhs| {
        let value = if rhs[1].as_bool() {
            rhs[0]
        } else {
            ConstantValue::Int(lhs[0].as_i64() + rhs[0].as_i64())
        };
        vec![value, ConstantValue::Bool(lhs[1].as_bool() || rhs[1].as_bool())]
    });

    let run = case
        .run(&Segmented::new(Sum), &[I32, Elem::Bool], &inputs)
        .unwrap();

    assert_eq!(run.outputs, expected);
}
