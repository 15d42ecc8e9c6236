use lanescan_ir::{Builtin, Scope, Variable};
use lanescan_layout::ScanGeometry;

/// Emit the coordinates of `linear` in `shape`, visiting the dimensions following `order`.
///
/// Dimensions of extent 1 get the constant coordinate 0.
pub fn emit_delinearize(
    scope: &mut Scope,
    linear: Variable,
    shape: &[u32],
    order: &[u32],
) -> Vec<Variable> {
    let mut coordinates = vec![Variable::index(0); shape.len()];
    let mut remaining = linear;

    for &dim in order {
        let dim = dim as usize;
        if shape[dim] == 1 {
            continue;
        }
        coordinates[dim] = scope.rem(remaining, shape[dim]);
        remaining = scope.div(remaining, shape[dim]);
    }

    coordinates
}

/// Emit the flat id of `coordinates` in `shape`, the inverse of [emit_delinearize].
pub fn emit_linearize(
    scope: &mut Scope,
    coordinates: &[Variable],
    shape: &[u32],
    order: &[u32],
) -> Variable {
    let mut linear: Option<Variable> = None;

    for &dim in order.iter().rev() {
        let dim = dim as usize;
        if shape[dim] == 1 {
            continue;
        }
        linear = Some(match linear {
            None => coordinates[dim],
            Some(linear) => {
                let scaled = scope.mul(linear, shape[dim]);
                scope.add(scaled, coordinates[dim])
            }
        });
    }

    linear.unwrap_or(Variable::index(0))
}

/// Position of the current unit, split between the scan axis and the parallel dimensions.
#[derive(Debug, Clone)]
pub struct ThreadIds {
    /// Axis coordinate inside the warp, wrapped over the lanes holding unique data.
    pub lane_axis: Variable,
    /// Axis coordinate of the warp, wrapped over the warps holding unique data.
    pub warp_axis: Variable,
    /// Flat id of the scan line among all the lines handled by the cube.
    pub parallel_id: Variable,
    lane_coordinates: Vec<Variable>,
}

impl ThreadIds {
    pub fn emit(scope: &mut Scope, geometry: &ScanGeometry) -> Self {
        let layout = &geometry.layout;
        let axis = geometry.axis;
        let unit = Variable::builtin(Builtin::UnitPos);

        let warp_id = scope.div(unit, geometry.warp_size);
        let lane_id = scope.rem(unit, geometry.warp_size);

        let lane_coordinates =
            emit_delinearize(scope, lane_id, &layout.threads_per_warp, &layout.order);
        let warp_coordinates =
            emit_delinearize(scope, warp_id, &layout.warps_per_cta, &layout.order);

        let lane_axis = wrap(
            scope,
            lane_coordinates[axis],
            geometry.axis_num_threads_per_warp_with_unique_data,
            geometry.axis_num_threads_per_warp,
        );
        let warp_axis = wrap(
            scope,
            warp_coordinates[axis],
            geometry.axis_num_warps_with_unique_data,
            geometry.axis_num_warps,
        );

        let lane_parallel = linearize_without_axis(
            scope,
            &lane_coordinates,
            &layout.threads_per_warp,
            &layout.order,
            axis,
        );
        let warp_parallel = linearize_without_axis(
            scope,
            &warp_coordinates,
            &layout.warps_per_cta,
            &layout.order,
            axis,
        );
        let parallel_id = if warp_parallel.is_constant(0) {
            lane_parallel
        } else {
            let offset = scope.mul(warp_parallel, geometry.non_axis_num_threads_per_warp);
            scope.add(lane_parallel, offset)
        };

        Self {
            lane_axis,
            warp_axis,
            parallel_id,
            lane_coordinates,
        }
    }

    /// Emit the lane of the current warp holding the last unique axis position of the current
    /// scan line.
    pub fn emit_last_axis_lane(&self, scope: &mut Scope, geometry: &ScanGeometry) -> Variable {
        let layout = &geometry.layout;
        let mut coordinates = self.lane_coordinates.clone();
        coordinates[geometry.axis] =
            Variable::index(geometry.axis_num_threads_per_warp_with_unique_data - 1);

        emit_linearize(
            scope,
            &coordinates,
            &layout.threads_per_warp,
            &layout.order,
        )
    }
}

fn wrap(scope: &mut Scope, coordinate: Variable, unique: u32, total: u32) -> Variable {
    if unique < total {
        scope.rem(coordinate, unique)
    } else {
        coordinate
    }
}

fn linearize_without_axis(
    scope: &mut Scope,
    coordinates: &[Variable],
    shape: &[u32],
    order: &[u32],
    axis: usize,
) -> Variable {
    let mut coordinates = coordinates.to_vec();
    let mut shape = shape.to_vec();
    coordinates[axis] = Variable::index(0);
    shape[axis] = 1;

    emit_linearize(scope, &coordinates, &shape, order)
}

#[cfg(test)]
mod tests {
    use lanescan_ir::ConstantValue;
    use lanescan_layout::{delinearize, linearize, BlockedLayout};
    use lanescan_sim::{CubeTopology, SimtExecutor};

    use super::*;
    use pretty_assertions::assert_eq;

    fn run(scope: &Scope, topology: CubeTopology, variables: &[Variable]) -> Vec<Vec<u32>> {
        let mut executor = SimtExecutor::new(topology);
        executor.execute(&scope.instructions).unwrap();
        variables
            .iter()
            .map(|variable| {
                executor
                    .read(*variable)
                    .unwrap()
                    .iter()
                    .map(ConstantValue::as_u32)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn emitted_index_arithmetic_matches_the_host() {
        let shape = [2, 4, 2];
        let order = [1, 2, 0];
        let mut scope = Scope::root();
        let unit = Variable::builtin(Builtin::UnitPos);

        let coordinates = emit_delinearize(&mut scope, unit, &shape, &order);
        let linear = emit_linearize(&mut scope, &coordinates, &shape, &order);

        let mut outputs = coordinates.clone();
        outputs.push(linear);
        let values = run(&scope, CubeTopology::new(16, 1), &outputs);

        for unit in 0..16 {
            let expected = delinearize(unit, &shape, &order);
            for dim in 0..3 {
                assert_eq!(values[dim][unit as usize], expected[dim]);
            }
            assert_eq!(values[3][unit as usize], linearize(&expected, &shape, &order));
            assert_eq!(values[3][unit as usize], unit);
        }
    }

    #[test]
    fn parallel_ids_identify_scan_lines() {
        // 2 lanes along the axis (dim 1), 2 lanes and 2 warps along dim 0.
        let layout = BlockedLayout::new(vec![1, 1], vec![2, 2], vec![2, 2], vec![1, 0]);
        let geometry = ScanGeometry::new(layout, vec![4, 4], 1, 4).unwrap();
        let mut scope = Scope::root();
        let ids = ThreadIds::emit(&mut scope, &geometry);
        let last = ids.emit_last_axis_lane(&mut scope, &geometry);

        let values = run(
            &scope,
            CubeTopology::new(4, 4),
            &[ids.lane_axis, ids.warp_axis, ids.parallel_id, last],
        );

        assert_eq!(
            values[0],
            vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1, 0, 1]
        );
        assert_eq!(
            values[1],
            vec![0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 1, 1, 1, 1]
        );
        assert_eq!(
            values[2],
            vec![0, 0, 1, 1, 0, 0, 1, 1, 2, 2, 3, 3, 2, 2, 3, 3]
        );
        assert_eq!(
            values[3],
            vec![1, 1, 3, 3, 1, 1, 3, 3, 1, 1, 3, 3, 1, 1, 3, 3]
        );
    }

    #[test]
    fn broadcast_lanes_mirror_their_copy() {
        // 8 lanes along an axis of extent 4, lanes 4..8 hold copies of lanes 0..4.
        let layout = BlockedLayout::new(vec![1], vec![8], vec![2], vec![0]);
        let geometry = ScanGeometry::new(layout, vec![4], 0, 8).unwrap();
        let mut scope = Scope::root();
        let ids = ThreadIds::emit(&mut scope, &geometry);

        let values = run(&scope, CubeTopology::new(8, 2), &[ids.lane_axis, ids.warp_axis]);

        assert_eq!(
            values[0],
            vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]
        );
        assert_eq!(values[1], vec![0; 16]);
    }
}
