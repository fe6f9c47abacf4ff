//! Implicit node-ID arithmetic for a full octree.
//!
//! Nodes are numbered breadth first. Level `L` holds `8^L` nodes, so the
//! first ID past level `L` is
//!
//! ```text
//! level_end(L) = 8^0 + 8^1 + ... + 8^L
//! ```
//!
//! and a node's children, parent and level follow from its ID alone:
//!
//! ```text
//! children_start(id) = 8 * id_in_level(id) + level_end(level(id))
//! parent(id)         = id_in_level(id) / 8 + level_start(level(id) - 1)
//! ```

use glam::Vec3;

use crate::error::SilhouetteError;
use crate::geometry::Aabb;

/// Breadth-first node ID. The root is `0`.
pub type NodeId = u32;

pub const ROOT_ID: NodeId = 0;

/// Deepest level addressable with 32-bit IDs (`level_end(10) ~ 1.23e9`).
pub const MAX_OCTREE_DEPTH: u32 = 10;

/// Children per node.
pub const OCTANTS: u32 = 8;

/// ID arithmetic for an octree of levels `0..=max_depth`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OctreeLayout {
  max_depth: u32,
  /// `level_end[L]` = number of nodes in levels `0..=L`.
  level_end: Vec<NodeId>,
}

impl OctreeLayout {
  pub fn new(max_depth: u32) -> Result<Self, SilhouetteError> {
    if max_depth > MAX_OCTREE_DEPTH {
      return Err(SilhouetteError::DepthTooLarge {
        requested: max_depth,
        max: MAX_OCTREE_DEPTH,
      });
    }

    let mut level_end = Vec::with_capacity(max_depth as usize + 1);
    let mut level_size: NodeId = 1;
    let mut total: NodeId = 0;
    for level in 0..=max_depth {
      total += level_size;
      level_end.push(total);
      if level < max_depth {
        level_size *= OCTANTS;
      }
    }
    Ok(Self {
      max_depth,
      level_end,
    })
  }

  #[inline]
  pub fn max_depth(&self) -> u32 {
    self.max_depth
  }

  /// Number of IDs in the full tree.
  #[inline]
  pub fn total_nodes(&self) -> NodeId {
    self.level_end[self.max_depth as usize]
  }

  #[inline]
  pub fn is_valid_id(&self, id: NodeId) -> bool {
    id < self.total_nodes()
  }

  /// First ID of `level`.
  #[inline]
  pub fn level_start(&self, level: u32) -> NodeId {
    if level == 0 {
      0
    } else {
      self.level_end[level as usize - 1]
    }
  }

  /// One past the last ID of `level`.
  #[inline]
  pub fn level_end(&self, level: u32) -> NodeId {
    self.level_end[level as usize]
  }

  /// Depth of `id` (root = 0), `None` past the deepest level.
  pub fn level(&self, id: NodeId) -> Option<u32> {
    // At most 11 entries, linear beats binary search here.
    self
      .level_end
      .iter()
      .position(|&end| id < end)
      .map(|level| level as u32)
  }

  /// Position of `id` among the nodes of its own level.
  pub fn id_in_level(&self, id: NodeId) -> Option<NodeId> {
    self.level(id).map(|level| id - self.level_start(level))
  }

  /// ID of the first of the 8 children, `None` on the deepest level.
  pub fn children_start(&self, id: NodeId) -> Option<NodeId> {
    let level = self.level(id)?;
    if level >= self.max_depth {
      return None;
    }
    Some(OCTANTS * (id - self.level_start(level)) + self.level_end(level))
  }

  /// ID of child `octant` (`0..8`).
  #[inline]
  pub fn child(&self, id: NodeId, octant: usize) -> Option<NodeId> {
    debug_assert!(octant < OCTANTS as usize);
    self.children_start(id).map(|start| start + octant as NodeId)
  }

  /// IDs of all 8 children.
  pub fn children(&self, id: NodeId) -> Option<[NodeId; 8]> {
    self
      .children_start(id)
      .map(|start| std::array::from_fn(|k| start + k as NodeId))
  }

  /// `None` for the root and for invalid IDs.
  pub fn parent(&self, id: NodeId) -> Option<NodeId> {
    let level = self.level(id)?;
    if level == 0 {
      return None;
    }
    let in_level = id - self.level_start(level);
    Some(in_level / OCTANTS + self.level_start(level - 1))
  }

  /// Octant of `id` inside its parent. `None` for the root.
  pub fn index_within_parent(&self, id: NodeId) -> Option<usize> {
    let level = self.level(id)?;
    if level == 0 {
      return None;
    }
    Some(((id - self.level_start(level)) % OCTANTS) as usize)
  }

  /// `id` followed by each ancestor up to and including the root.
  pub fn path_to_root(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    let start = self.is_valid_id(id).then_some(id);
    std::iter::successors(start, move |&node| self.parent(node))
  }

  /// Volume of `id` derived from the root volume, without touching any store.
  ///
  /// Octants are applied root-first so the result is bit-identical to the
  /// volume produced by splitting nodes one level at a time.
  pub fn node_volume_from_id(&self, root: &Aabb, id: NodeId) -> Option<Aabb> {
    if !self.is_valid_id(id) {
      return None;
    }
    let mut octants: Vec<usize> = Vec::with_capacity(self.max_depth as usize);
    let mut node = id;
    while let Some(octant) = self.index_within_parent(node) {
      octants.push(octant);
      node = self.parent(node)?;
    }
    Some(
      octants
        .iter()
        .rev()
        .fold(*root, |volume, &octant| volume.octant(octant)),
    )
  }

  /// Deepest ID of the full tree whose volume contains `point`.
  pub fn leaf_from_point(&self, root: &Aabb, point: Vec3) -> Option<NodeId> {
    if !root.contains_point(point) {
      return None;
    }
    let mut id = ROOT_ID;
    let mut volume = *root;
    while let Some(start) = self.children_start(id) {
      let octant = volume.octant_of(point);
      id = start + octant as NodeId;
      volume = volume.octant(octant);
    }
    Some(id)
  }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;
