//! Dense voxel-grid accelerator.
//!
//! Every edge gets one 2-bit cell per voxel holding its
//! [`EdgeSilhouetteness`] for lights anywhere in that voxel. A query is one
//! voxel lookup plus a scan over the edges. Memory is
//! `edges * voxels * 2` bits regardless of where the mesh is, so this suits
//! compact meshes in a tight light space.

use glam::Vec3;
use rayon::prelude::*;

use super::{not_initialized, outside_light_space, SilhouetteAccelerator, SilhouetteEdges};
use crate::bit_array::MultiBitArray;
use crate::edges::{EdgeIndex, EdgeKind, EdgeRecord, EdgeTable, SilhouetteEdge};
use crate::error::SilhouetteError;
use crate::geometry::{Aabb, EdgePlanes, EdgeSilhouetteness};
use crate::stats::{BuildStats, BuildTimer};
use crate::voxel_space::VoxelizedSpace;

const NAME: &str = "voxel_grid";

/// Grid resolution and build options.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VoxelGridParams {
  /// Voxels along X, Y and Z.
  pub voxel_counts: [u32; 3],
  /// Classify edges on the rayon pool.
  pub parallel: bool,
}

impl Default for VoxelGridParams {
  fn default() -> Self {
    Self {
      voxel_counts: [16, 16, 16],
      parallel: true,
    }
  }
}

impl VoxelGridParams {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_voxel_counts(mut self, counts: [u32; 3]) -> Self {
    self.voxel_counts = counts;
    self
  }

  /// Same count on every axis.
  pub fn with_resolution(mut self, count: u32) -> Self {
    self.voxel_counts = [count; 3];
    self
  }

  pub fn with_parallel(mut self, parallel: bool) -> Self {
    self.parallel = parallel;
    self
  }
}

/// Per-(edge, voxel) classification table.
#[derive(Clone, Debug, Default)]
pub struct VoxelGridSilhouettes {
  space: Option<VoxelizedSpace>,
  /// Indexed by [`EdgeIndex`]; `None` for degenerate edges.
  cells: Vec<Option<MultiBitArray>>,
  stats: Option<BuildStats>,
}

impl VoxelGridSilhouettes {
  pub fn new(
    edges: &EdgeTable,
    light_space: Aabb,
    params: &VoxelGridParams,
  ) -> Result<Self, SilhouetteError> {
    let mut grid = Self::default();
    grid.initialize(edges, light_space, params)?;
    Ok(grid)
  }

  pub fn voxel_space(&self) -> Option<&VoxelizedSpace> {
    self.space.as_ref()
  }

  /// Stored state of one edge in one voxel.
  pub fn cell(&self, edge: EdgeIndex, voxel: usize) -> Option<EdgeSilhouetteness> {
    let array = self.cells.get(edge as usize)?.as_ref()?;
    array.get(voxel).map(EdgeSilhouetteness::from_bits)
  }

  fn classify_edge(
    record: &EdgeRecord,
    voxels: &[Aabb],
  ) -> Result<Option<MultiBitArray>, SilhouetteError> {
    let kind = record.kind();
    if kind == EdgeKind::Degenerate {
      return Ok(None);
    }
    let mut array = MultiBitArray::new(EdgeSilhouetteness::BITS, voxels.len())?;
    match EdgePlanes::for_record(record) {
      Some(planes) => {
        for (index, voxel) in voxels.iter().enumerate() {
          array.set(index, planes.classify(record, voxel).bits());
        }
      }
      // Boundary and non-manifold: decided per light at query time.
      None => array.fill(EdgeSilhouetteness::PotentiallySilhouette.bits()),
    }
    Ok(Some(array))
  }
}

impl SilhouetteAccelerator for VoxelGridSilhouettes {
  type Params = VoxelGridParams;

  fn initialize(
    &mut self,
    edges: &EdgeTable,
    light_space: Aabb,
    params: &VoxelGridParams,
  ) -> Result<(), SilhouetteError> {
    self.clear();
    let timer = BuildTimer::start();
    let space = VoxelizedSpace::new(light_space, params.voxel_counts)?;

    let _span = tracing::info_span!(
      "voxel_grid_initialize",
      edges = edges.len(),
      voxels = space.num_voxels()
    )
    .entered();

    let voxels: Vec<Aabb> = space.voxels().map(|(_, voxel)| voxel).collect();
    let classify = |record: &EdgeRecord| Self::classify_edge(record, &voxels);
    let cells: Result<Vec<_>, SilhouetteError> = if params.parallel {
      edges.records().par_iter().map(classify).collect()
    } else {
      edges.records().iter().map(classify).collect()
    };

    self.cells = cells?;
    self.space = Some(space);

    let mut stats = BuildStats::for_edges(edges);
    stats.cells = space.num_voxels();
    stats.size_bytes = self.size_bytes();
    stats.elapsed = timer.elapsed();
    stats.log(NAME);
    self.stats = Some(stats);
    Ok(())
  }

  fn silhouette_edges_for_light_pos(&self, light_pos: Vec3) -> SilhouetteEdges {
    let Some(space) = &self.space else {
      return not_initialized(NAME);
    };
    let Some(voxel) = space.linear_index_from_point(light_pos) else {
      return outside_light_space(NAME, light_pos, space.space());
    };

    let mut result = SilhouetteEdges::default();
    for (index, array) in self.cells.iter().enumerate() {
      let Some(bits) = array.as_ref().and_then(|a| a.get(voxel)) else {
        continue;
      };
      let index = index as EdgeIndex;
      match EdgeSilhouetteness::from_bits(bits) {
        EdgeSilhouetteness::NotSilhouette => {}
        EdgeSilhouetteness::PotentiallySilhouette => result.potential.push(index),
        definite => {
          if let Some(orientation) = definite.orientation() {
            result
              .silhouette
              .push(SilhouetteEdge::new(index, orientation));
          }
        }
      }
    }
    result
  }

  fn size_bytes(&self) -> usize {
    self
      .cells
      .iter()
      .flatten()
      .map(MultiBitArray::size_bytes)
      .sum()
  }

  fn clear(&mut self) {
    self.space = None;
    self.cells = Vec::new();
    self.stats = None;
  }

  fn build_stats(&self) -> Option<&BuildStats> {
    self.stats.as_ref()
  }
}
