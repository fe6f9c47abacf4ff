//! silhouette_core - precomputed silhouette edges for shadow volumes
//!
//! Stencil shadow volumes extrude every silhouette edge of a mesh away from
//! the light. Finding those edges naively means testing every edge against
//! the light each frame. This crate precomputes, over a volume of possible
//! light positions (the *light space*), which edges are always, never or
//! only potentially silhouettes, so a query is a lookup plus an exact test
//! of the few ambiguous edges.
//!
//! # Features
//!
//! - **Edge extraction**: deduplicated edges with the apex of every
//!   adjacent triangle
//! - **Voxel grid accelerator**: dense 2-bit classification per (edge, voxel)
//! - **Octree accelerator**: adaptive refinement only where an edge is
//!   ambiguous, with sibling merging and pruning
//! - **Parallel builds** on the rayon pool
//!
//! # Example
//!
//! ```ignore
//! use silhouette_core::{extract_edges, Accelerator, AcceleratorParams, OctreeParams};
//! use silhouette_core::SilhouetteAccelerator;
//!
//! let edges = extract_edges(&triangles);
//! let params = AcceleratorParams::Octree(OctreeParams::default().with_max_depth(6));
//! let accelerator = Accelerator::build(&edges, light_space, &params)?;
//!
//! // Per frame
//! let result = accelerator.silhouette_edges_for_light_pos(light_pos);
//! for edge in result.resolve(&edges, light_pos) {
//!   emit_shadow_quad(edges.get(edge.index), edge.orientation);
//! }
//! ```

pub mod accelerator;
pub mod bit_array;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod octree;
pub mod stats;
pub mod voxel_space;

#[cfg(test)]
pub mod test_utils;

pub use accelerator::{
  Accelerator, AcceleratorParams, BruteForceSilhouettes, BuildStrategy, OctreeParams,
  OctreeSilhouettes, SilhouetteAccelerator, SilhouetteEdges, VoxelGridParams, VoxelGridSilhouettes,
};
pub use bit_array::MultiBitArray;
pub use edges::{
  extract_edges, Edge, EdgeIndex, EdgeKind, EdgeRecord, EdgeTable, OppositeVertex, Orientation,
  SilhouetteEdge, Triangle, Winding,
};
pub use error::SilhouetteError;
pub use geometry::{Aabb, EdgeSilhouetteness, Plane, PlaneSide};
pub use octree::{NodeId, Octree, OctreeLayout, OctreeNode, MAX_OCTREE_DEPTH};
pub use stats::BuildStats;
pub use voxel_space::VoxelizedSpace;
