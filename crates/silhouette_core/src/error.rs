//! Error type shared by every fallible constructor in the crate.

use thiserror::Error;

use crate::geometry::Aabb;

/// Errors produced while building silhouette acceleration structures.
///
/// Queries never fail: an out-of-volume light position or an unbuilt
/// accelerator yields an empty result instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SilhouetteError {
  /// The light space has zero or negative extent on at least one axis.
  #[error("light space {0:?} has zero or negative extent")]
  InvalidLightSpace(Aabb),

  /// At least one voxel count is zero.
  #[error("voxel counts must be non-zero, got {x}x{y}x{z}")]
  InvalidVoxelCounts { x: u32, y: u32, z: u32 },

  /// Requested octree depth cannot be addressed with 32-bit node IDs.
  #[error("octree depth {requested} exceeds the supported maximum of {max}")]
  DepthTooLarge { requested: u32, max: u32 },

  /// Bit array cell width outside `1..=32`.
  #[error("cell width {0} is outside 1..=32")]
  InvalidCellWidth(u32),

  /// The accelerator was queried or inspected before `initialize`.
  #[error("acceleration structure has not been initialized")]
  NotInitialized,
}
