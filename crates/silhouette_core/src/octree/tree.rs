//! Sparse octree node store.
//!
//! Only materialized nodes live in the map; everything structural (parent,
//! children, level, volume) comes from [`OctreeLayout`]. Splitting a node
//! always materializes all 8 children at once.

use std::collections::{BTreeSet, HashMap};

use glam::Vec3;

use super::layout::{NodeId, OctreeLayout, OCTANTS, ROOT_ID};
use crate::edges::{EdgeIndex, SilhouetteEdge};
use crate::error::SilhouetteError;
use crate::geometry::Aabb;

/// Edge sets attached to one octree cell.
#[derive(Clone, Debug, PartialEq)]
pub struct OctreeNode {
  pub volume: Aabb,
  /// Edges that are a silhouette for every light position in `volume`.
  pub edges_always_cast: BTreeSet<SilhouetteEdge>,
  /// Edges to resolve per light position with a multiplicity test.
  pub edges_may_cast: BTreeSet<EdgeIndex>,
}

impl OctreeNode {
  pub fn new(volume: Aabb) -> Self {
    Self {
      volume,
      edges_always_cast: BTreeSet::new(),
      edges_may_cast: BTreeSet::new(),
    }
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.edges_always_cast.is_empty() && self.edges_may_cast.is_empty()
  }

  /// Total stored entries across both sets.
  #[inline]
  pub fn entry_count(&self) -> usize {
    self.edges_always_cast.len() + self.edges_may_cast.len()
  }
}

/// Sparse octree over a light-space volume.
#[derive(Clone, Debug)]
pub struct Octree {
  layout: OctreeLayout,
  nodes: HashMap<NodeId, OctreeNode>,
}

impl Octree {
  /// Tree holding only the root node.
  pub fn new(volume: Aabb, max_depth: u32) -> Result<Self, SilhouetteError> {
    if !volume.is_valid() {
      return Err(SilhouetteError::InvalidLightSpace(volume));
    }
    let layout = OctreeLayout::new(max_depth)?;
    let mut nodes = HashMap::new();
    nodes.insert(ROOT_ID, OctreeNode::new(volume));
    Ok(Self { layout, nodes })
  }

  #[inline]
  pub fn layout(&self) -> &OctreeLayout {
    &self.layout
  }

  #[inline]
  pub fn max_depth(&self) -> u32 {
    self.layout.max_depth()
  }

  #[inline]
  pub fn root_volume(&self) -> Aabb {
    self
      .nodes
      .get(&ROOT_ID)
      .map(|root| root.volume)
      .unwrap_or_else(Aabb::invalid)
  }

  #[inline]
  pub fn node(&self, id: NodeId) -> Option<&OctreeNode> {
    self.nodes.get(&id)
  }

  #[inline]
  pub fn node_mut(&mut self, id: NodeId) -> Option<&mut OctreeNode> {
    self.nodes.get_mut(&id)
  }

  #[inline]
  pub fn node_exists(&self, id: NodeId) -> bool {
    self.nodes.contains_key(&id)
  }

  /// Whether any child of `id` is materialized.
  pub fn children_exist(&self, id: NodeId) -> bool {
    self
      .layout
      .children(id)
      .is_some_and(|children| children.iter().any(|c| self.nodes.contains_key(c)))
  }

  /// Number of materialized nodes.
  #[inline]
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Materialized nodes of `level`, in ID order.
  pub fn nodes_at_level(&self, level: u32) -> Vec<NodeId> {
    if level > self.layout.max_depth() {
      return Vec::new();
    }
    let (start, end) = (self.layout.level_start(level), self.layout.level_end(level));
    let mut ids: Vec<NodeId> = self
      .nodes
      .keys()
      .copied()
      .filter(|id| (start..end).contains(id))
      .collect();
    ids.sort_unstable();
    ids
  }

  /// Materialize the 8 children of `id`. Existing children are kept.
  ///
  /// Returns `false` when `id` is missing or already on the deepest level.
  pub fn split_node(&mut self, id: NodeId) -> bool {
    let Some(volume) = self.nodes.get(&id).map(|n| n.volume) else {
      return false;
    };
    let Some(start) = self.layout.children_start(id) else {
      return false;
    };
    for octant in 0..OCTANTS {
      self
        .nodes
        .entry(start + octant)
        .or_insert_with(|| OctreeNode::new(volume.octant(octant as usize)));
    }
    true
  }

  /// Materialize `id` by splitting every missing ancestor on its path.
  pub fn ensure_node(&mut self, id: NodeId) -> Option<&mut OctreeNode> {
    if !self.layout.is_valid_id(id) {
      return None;
    }
    let missing: Vec<NodeId> = self
      .layout
      .path_to_root(id)
      .take_while(|n| !self.nodes.contains_key(n))
      .collect();
    // Split from the highest missing node's parent downwards.
    for node in missing.iter().rev() {
      let parent = self.layout.parent(*node)?;
      self.split_node(parent);
    }
    self.nodes.get_mut(&id)
  }

  /// Remove a single node. Its children, if any, are left in place.
  pub fn delete_node(&mut self, id: NodeId) -> Option<OctreeNode> {
    self.nodes.remove(&id)
  }

  /// Remove `id` and every materialized descendant. Returns how many nodes
  /// were removed.
  pub fn delete_node_subtree(&mut self, id: NodeId) -> usize {
    let mut removed = 0;
    let mut stack = vec![id];
    while let Some(node) = stack.pop() {
      if self.nodes.remove(&node).is_none() {
        continue;
      }
      removed += 1;
      if let Some(children) = self.layout.children(node) {
        stack.extend(children.iter().filter(|c| self.nodes.contains_key(*c)));
      }
    }
    removed
  }

  /// Deepest materialized node containing `point`.
  ///
  /// Descent stops at the first node whose child on the point's side is not
  /// materialized. `None` when the point is outside the root volume.
  pub fn lowest_node_from_point(&self, point: Vec3) -> Option<NodeId> {
    let root = self.nodes.get(&ROOT_ID)?;
    if !root.volume.contains_point(point) {
      return None;
    }
    let mut id = ROOT_ID;
    let mut volume = root.volume;
    while let Some(start) = self.layout.children_start(id) {
      let child = start + volume.octant_of(point) as NodeId;
      match self.nodes.get(&child) {
        Some(node) => {
          id = child;
          volume = node.volume;
        }
        None => break,
      }
    }
    Some(id)
  }

  /// Iterate all materialized nodes in arbitrary order.
  pub fn iter(&self) -> impl Iterator<Item = (NodeId, &OctreeNode)> {
    self.nodes.iter().map(|(id, node)| (*id, node))
  }

  /// Approximate heap footprint: node slots plus stored edge entries.
  pub fn size_bytes(&self) -> usize {
    let per_node = std::mem::size_of::<NodeId>() + std::mem::size_of::<OctreeNode>();
    self
      .nodes
      .values()
      .map(|node| {
        per_node
          + node.edges_always_cast.len() * std::mem::size_of::<SilhouetteEdge>()
          + node.edges_may_cast.len() * std::mem::size_of::<EdgeIndex>()
      })
      .sum()
  }

  /// Total edge entries across all nodes.
  pub fn entry_count(&self) -> usize {
    self.nodes.values().map(OctreeNode::entry_count).sum()
  }

  /// Drop every node but the root, and empty the root.
  pub fn reset(&mut self) {
    let volume = self.root_volume();
    self.nodes.clear();
    self.nodes.insert(ROOT_ID, OctreeNode::new(volume));
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
