//! Geometric primitives and the silhouette predicates built on them.
//!
//! - [`aabb`]: `Aabb` - light-space volumes, voxels and octree cells
//! - [`plane`]: `Plane` - oriented plane with point/box side tests
//! - [`predicates`]: edge-triangle planes, multiplicity and the
//!   edge-versus-region classification every accelerator relies on

pub mod aabb;
pub mod plane;
pub mod predicates;

pub use aabb::Aabb;
pub use plane::{Plane, PlaneSide};
pub use predicates::{
  build_edge_triangle_plane, classify_edge_against_region, edge_multiplicity, EdgePlanes,
  EdgeSilhouetteness,
};
