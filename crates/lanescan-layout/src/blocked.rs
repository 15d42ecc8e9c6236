use derive_new::new;

use crate::{checked_product, delinearize, product, LayoutError};

/// Distribution of a tensor over the units of a cube.
///
/// Each unit owns a `size_per_thread` tile of contiguous elements. The units of a warp are laid
/// out following `threads_per_warp`, the warps of the cube following `warps_per_cta`. When the
/// tensor is bigger than the resulting cube tile, the tile is repeated and each unit holds one
/// tile of elements per repetition. Every per-dimension vector is indexed by tensor dimension,
/// `order` lists the dimensions from the fastest varying to the slowest one.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(new, Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockedLayout {
    pub size_per_thread: Vec<u32>,
    pub threads_per_warp: Vec<u32>,
    pub warps_per_cta: Vec<u32>,
    pub order: Vec<u32>,
}

impl BlockedLayout {
    pub fn rank(&self) -> usize {
        self.order.len()
    }

    /// Number of units in a warp.
    pub fn warp_size(&self) -> u32 {
        product(&self.threads_per_warp)
    }

    /// Number of warps in the cube.
    pub fn num_warps(&self) -> u32 {
        product(&self.warps_per_cta)
    }

    /// Number of units in the cube.
    pub fn num_threads(&self) -> u32 {
        self.warp_size() * self.num_warps()
    }

    /// Number of elements covered by one repetition of the cube tile, per dimension.
    pub fn shape_per_cta_tile(&self) -> Vec<u32> {
        (0..self.rank())
            .map(|dim| {
                self.size_per_thread[dim] * self.threads_per_warp[dim] * self.warps_per_cta[dim]
            })
            .collect()
    }

    /// Number of repetitions of the cube tile needed to cover `shape`, per dimension.
    pub fn tiles_per_dim(&self, shape: &[u32]) -> Vec<u32> {
        self.shape_per_cta_tile()
            .iter()
            .zip(shape)
            .map(|(tile, extent)| extent.div_ceil(*tile))
            .collect()
    }

    /// Number of registers each unit holds for a tensor of the given shape.
    pub fn total_elems_per_thread(&self, shape: &[u32]) -> u32 {
        product(&self.size_per_thread) * product(&self.tiles_per_dim(shape))
    }

    /// Threads per warp along each dimension, only counting those holding distinct data.
    pub fn threads_per_warp_with_unique_data(&self, shape: &[u32]) -> Vec<u32> {
        (0..self.rank())
            .map(|dim| {
                let max_threads = shape[dim].div_ceil(self.size_per_thread[dim]);
                self.threads_per_warp[dim].min(max_threads)
            })
            .collect()
    }

    /// Warps per cube along each dimension, only counting those holding distinct data.
    pub fn warps_per_cta_with_unique_data(&self, shape: &[u32]) -> Vec<u32> {
        (0..self.rank())
            .map(|dim| {
                let size_per_warp = self.size_per_thread[dim] * self.threads_per_warp[dim];
                let max_warps = shape[dim].div_ceil(size_per_warp);
                self.warps_per_cta[dim].min(max_warps)
            })
            .collect()
    }

    /// Check that the layout is well formed for a tensor of the given shape.
    pub fn validate(&self, shape: &[u32]) -> Result<(), LayoutError> {
        let rank = shape.len();
        if rank == 0 {
            return Err(LayoutError::EmptyShape);
        }

        for (field, values) in [
            ("size_per_thread", &self.size_per_thread),
            ("threads_per_warp", &self.threads_per_warp),
            ("warps_per_cta", &self.warps_per_cta),
            ("order", &self.order),
        ] {
            if values.len() != rank {
                return Err(LayoutError::RankMismatch {
                    field,
                    expected: rank,
                    actual: values.len(),
                });
            }
        }

        let mut seen = vec![false; rank];
        for dim in self.order.iter() {
            match seen.get_mut(*dim as usize) {
                Some(seen) if !*seen => *seen = true,
                _ => {
                    return Err(LayoutError::InvalidOrder {
                        order: self.order.clone(),
                        rank,
                    })
                }
            }
        }

        for (field, values) in [
            ("shape", shape),
            ("size_per_thread", &self.size_per_thread),
            ("threads_per_warp", &self.threads_per_warp),
            ("warps_per_cta", &self.warps_per_cta),
        ] {
            if let Some((dim, value)) = values
                .iter()
                .enumerate()
                .find(|(_, value)| !value.is_power_of_two())
            {
                return Err(LayoutError::NotPowerOfTwo {
                    field,
                    dim,
                    value: *value,
                });
            }
        }

        self.validate_counts(shape)
    }

    /// Every count derived from the layout must fit in 32 bits.
    fn validate_counts(&self, shape: &[u32]) -> Result<(), LayoutError> {
        for dim in 0..self.rank() {
            let tile = [
                self.size_per_thread[dim],
                self.threads_per_warp[dim],
                self.warps_per_cta[dim],
            ];
            checked_product(&tile).ok_or(LayoutError::TooManyElements {
                quantity: "cube tile elements",
            })?;
        }

        checked_product(&self.threads_per_warp)
            .zip(checked_product(&self.warps_per_cta))
            .and_then(|(lanes, warps)| lanes.checked_mul(warps))
            .ok_or(LayoutError::TooManyElements {
                quantity: "threads per cube",
            })?;

        checked_product(&self.size_per_thread)
            .zip(checked_product(&self.tiles_per_dim(shape)))
            .and_then(|(elems, tiles)| elems.checked_mul(tiles))
            .ok_or(LayoutError::TooManyElements {
                quantity: "registers per thread",
            })?;

        Ok(())
    }

    /// Tensor coordinates of every register held by a unit, in register order.
    ///
    /// Registers enumerate the elements of the unit's `size_per_thread` tile first, then the
    /// repetitions of the cube tile, both following `order`. Units and warps that would fall
    /// outside the tensor wrap around and hold copies of the same elements.
    pub fn element_coordinates(&self, shape: &[u32], lane_id: u32, warp_id: u32) -> Vec<Vec<u32>> {
        let rank = self.rank();
        let lane = delinearize(lane_id, &self.threads_per_warp, &self.order);
        let warp = delinearize(warp_id, &self.warps_per_cta, &self.order);
        let unique_threads = self.threads_per_warp_with_unique_data(shape);
        let unique_warps = self.warps_per_cta_with_unique_data(shape);
        let tile_shape = self.shape_per_cta_tile();
        let tiles = self.tiles_per_dim(shape);

        let base = (0..rank)
            .map(|dim| {
                let lane = lane[dim] % unique_threads[dim];
                let warp = warp[dim] % unique_warps[dim];
                (warp * self.threads_per_warp[dim] + lane) * self.size_per_thread[dim]
            })
            .collect::<Vec<_>>();

        let elems_per_tile = product(&self.size_per_thread);
        (0..self.total_elems_per_thread(shape))
            .map(|register| {
                let elem = delinearize(register % elems_per_tile, &self.size_per_thread, &self.order);
                let tile = delinearize(register / elems_per_tile, &tiles, &self.order);
                (0..rank)
                    .map(|dim| {
                        (tile[dim] * tile_shape[dim] + base[dim] + elem[dim]) % shape[dim]
                    })
                    .collect()
            })
            .collect()
    }
}
