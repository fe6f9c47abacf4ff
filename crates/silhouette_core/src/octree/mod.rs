//! Sparse octree over the light space.
//!
//! Nodes have no parent/child pointers: they are addressed by a
//! breadth-first integer ID and every structural relation is computed from
//! it. Only nodes actually visited during construction are stored.
//!
//! # Module Structure
//!
//! - [`layout`]: `OctreeLayout` - pure node-ID arithmetic
//! - [`tree`]: `Octree`, `OctreeNode` - the sparse node store
//! - [`visitor`]: `OctreeVisitor` - edge insertion, merge and prune passes

pub mod layout;
pub mod tree;
pub mod visitor;

pub use layout::{NodeId, OctreeLayout, MAX_OCTREE_DEPTH, OCTANTS, ROOT_ID};
pub use tree::{Octree, OctreeNode};
pub use visitor::{EdgeVisit, OctreeVisitor};
