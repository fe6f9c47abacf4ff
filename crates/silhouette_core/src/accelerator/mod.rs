//! Silhouette accelerators: precomputed answers to "which edges cast a
//! shadow-volume side for a light at this position?".
//!
//! Every accelerator is built once over an [`EdgeTable`] and a light-space
//! volume, then queried per frame. A query returns definite silhouette
//! edges with their orientation plus a list of potential edges that the
//! caller resolves exactly with [`SilhouetteEdges::resolve`].
//!
//! - [`voxel_grid`]: dense 2-bit classification per (edge, voxel)
//! - [`octree`]: adaptive subdivision, refined only where an edge is ambiguous
//! - [`brute_force`]: no precomputation, classifies every edge per query

use glam::Vec3;

use crate::edges::{EdgeIndex, EdgeTable, Orientation, SilhouetteEdge};
use crate::error::SilhouetteError;
use crate::geometry::{edge_multiplicity, Aabb};
use crate::stats::BuildStats;

pub mod brute_force;
pub mod octree;
pub mod voxel_grid;

pub use brute_force::BruteForceSilhouettes;
pub use octree::{BuildStrategy, OctreeParams, OctreeSilhouettes};
pub use voxel_grid::{VoxelGridParams, VoxelGridSilhouettes};

/// Result of one light-position query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SilhouetteEdges {
  /// Edges that need a per-light multiplicity test. Sorted, unique.
  pub potential: Vec<EdgeIndex>,
  /// Edges that are silhouettes, with orientation. Sorted by index, unique.
  pub silhouette: Vec<SilhouetteEdge>,
}

impl SilhouetteEdges {
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.potential.is_empty() && self.silhouette.is_empty()
  }

  /// Definite edges plus every potential edge with non-zero multiplicity at
  /// `light_pos`, sorted by edge index.
  pub fn resolve(&self, edges: &EdgeTable, light_pos: Vec3) -> Vec<SilhouetteEdge> {
    let mut resolved = self.silhouette.clone();
    resolved.extend(self.potential.iter().filter_map(|&index| {
      let multiplicity = edge_multiplicity(edges.get(index)?, light_pos);
      (multiplicity != 0)
        .then(|| SilhouetteEdge::new(index, Orientation::from_multiplicity(multiplicity)))
    }));
    resolved.sort_unstable();
    resolved
  }
}

/// Capability shared by every accelerator.
pub trait SilhouetteAccelerator {
  type Params;

  /// Build over `edges` for lights inside `light_space`, replacing any
  /// previous build.
  fn initialize(
    &mut self,
    edges: &EdgeTable,
    light_space: Aabb,
    params: &Self::Params,
  ) -> Result<(), SilhouetteError>;

  /// Never fails: an unbuilt accelerator or a light outside the light space
  /// yields an empty result.
  fn silhouette_edges_for_light_pos(&self, light_pos: Vec3) -> SilhouetteEdges;

  /// Bytes held by the built structure. Diagnostic only.
  fn size_bytes(&self) -> usize;

  /// Drop the built structure.
  fn clear(&mut self);

  /// Stats of the last successful build.
  fn build_stats(&self) -> Option<&BuildStats>;

  fn is_initialized(&self) -> bool {
    self.build_stats().is_some()
  }
}

/// Which accelerator to build, with its parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AcceleratorParams {
  VoxelGrid(VoxelGridParams),
  Octree(OctreeParams),
  BruteForce,
}

impl Default for AcceleratorParams {
  fn default() -> Self {
    AcceleratorParams::Octree(OctreeParams::default())
  }
}

/// Accelerator chosen once at setup.
#[derive(Debug)]
pub enum Accelerator {
  VoxelGrid(VoxelGridSilhouettes),
  Octree(OctreeSilhouettes),
  BruteForce(BruteForceSilhouettes),
}

impl Default for Accelerator {
  fn default() -> Self {
    Accelerator::BruteForce(BruteForceSilhouettes::default())
  }
}

impl Accelerator {
  /// Build the accelerator selected by `params`.
  pub fn build(
    edges: &EdgeTable,
    light_space: Aabb,
    params: &AcceleratorParams,
  ) -> Result<Self, SilhouetteError> {
    let accelerator = match params {
      AcceleratorParams::VoxelGrid(p) => {
        let mut grid = VoxelGridSilhouettes::default();
        grid.initialize(edges, light_space, p)?;
        Accelerator::VoxelGrid(grid)
      }
      AcceleratorParams::Octree(p) => {
        let mut octree = OctreeSilhouettes::default();
        octree.initialize(edges, light_space, p)?;
        Accelerator::Octree(octree)
      }
      AcceleratorParams::BruteForce => {
        let mut brute = BruteForceSilhouettes::default();
        brute.initialize(edges, light_space, &())?;
        Accelerator::BruteForce(brute)
      }
    };
    Ok(accelerator)
  }

  pub fn name(&self) -> &'static str {
    match self {
      Accelerator::VoxelGrid(_) => "voxel_grid",
      Accelerator::Octree(_) => "octree",
      Accelerator::BruteForce(_) => "brute_force",
    }
  }
}

impl SilhouetteAccelerator for Accelerator {
  type Params = AcceleratorParams;

  /// Rebuilds, switching variant if `params` selects a different one.
  fn initialize(
    &mut self,
    edges: &EdgeTable,
    light_space: Aabb,
    params: &AcceleratorParams,
  ) -> Result<(), SilhouetteError> {
    *self = Accelerator::build(edges, light_space, params)?;
    Ok(())
  }

  fn silhouette_edges_for_light_pos(&self, light_pos: Vec3) -> SilhouetteEdges {
    match self {
      Accelerator::VoxelGrid(a) => a.silhouette_edges_for_light_pos(light_pos),
      Accelerator::Octree(a) => a.silhouette_edges_for_light_pos(light_pos),
      Accelerator::BruteForce(a) => a.silhouette_edges_for_light_pos(light_pos),
    }
  }

  fn size_bytes(&self) -> usize {
    match self {
      Accelerator::VoxelGrid(a) => a.size_bytes(),
      Accelerator::Octree(a) => a.size_bytes(),
      Accelerator::BruteForce(a) => a.size_bytes(),
    }
  }

  fn clear(&mut self) {
    match self {
      Accelerator::VoxelGrid(a) => a.clear(),
      Accelerator::Octree(a) => a.clear(),
      Accelerator::BruteForce(a) => a.clear(),
    }
  }

  fn build_stats(&self) -> Option<&BuildStats> {
    match self {
      Accelerator::VoxelGrid(a) => a.build_stats(),
      Accelerator::Octree(a) => a.build_stats(),
      Accelerator::BruteForce(a) => a.build_stats(),
    }
  }
}

/// Empty result for a light outside the built volume.
pub(crate) fn outside_light_space(accelerator: &str, light_pos: Vec3, light_space: &Aabb) -> SilhouetteEdges {
  tracing::warn!(
    accelerator,
    ?light_pos,
    ?light_space,
    "light position outside the light space, no silhouette edges"
  );
  SilhouetteEdges::default()
}

/// Empty result for a query before `initialize`.
pub(crate) fn not_initialized(accelerator: &str) -> SilhouetteEdges {
  tracing::warn!(accelerator, "{}", SilhouetteError::NotInitialized);
  SilhouetteEdges::default()
}
