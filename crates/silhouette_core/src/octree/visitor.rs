//! Octree construction passes.
//!
//! Top-down: each edge descends from the root, splitting nodes only while
//! its classification stays potential, and is recorded where it first
//! becomes definite (or at the deepest level if it never does).
//!
//! Bottom-up: the tree is expanded to full depth, every leaf is classified
//! against every edge, and agreement between siblings is hoisted upward.
//!
//! Both finish with the same two passes: [`process_potential_edges`]
//! hoists potential edges shared by all 8 siblings into their parent, and
//! [`clean_empty_nodes`] drops childless nodes that hold nothing.
//!
//! [`process_potential_edges`]: OctreeVisitor::process_potential_edges
//! [`clean_empty_nodes`]: OctreeVisitor::clean_empty_nodes

use std::collections::BTreeSet;

use rayon::prelude::*;

use super::layout::{NodeId, OctreeLayout, OCTANTS, ROOT_ID};
use super::tree::{Octree, OctreeNode};
use crate::edges::{EdgeIndex, EdgeKind, EdgeRecord, EdgeTable, Orientation, SilhouetteEdge};
use crate::geometry::{Aabb, EdgePlanes, EdgeSilhouetteness};

/// Everything one edge's top-down descent does to the tree.
///
/// Computing it only reads the layout and root volume, so visits for
/// different edges can run in parallel and be applied afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeVisit {
  pub index: EdgeIndex,
  /// Nodes whose children must exist, parents before children.
  pub splits: Vec<NodeId>,
  /// Nodes where the edge became a definite silhouette.
  pub always: Vec<(NodeId, Orientation)>,
  /// Nodes where the edge stays potential.
  pub may: Vec<NodeId>,
}

impl EdgeVisit {
  fn new(index: EdgeIndex) -> Self {
    Self {
      index,
      ..Default::default()
    }
  }
}

/// Applies construction passes to an [`Octree`].
pub struct OctreeVisitor<'a> {
  octree: &'a mut Octree,
}

impl<'a> OctreeVisitor<'a> {
  pub fn new(octree: &'a mut Octree) -> Self {
    Self { octree }
  }

  /// Descend one edge from the root without touching the store.
  ///
  /// Boundary and non-manifold edges go straight to the root as potential;
  /// degenerate edges produce an empty visit.
  pub fn visit_edge(
    layout: &OctreeLayout,
    root: Aabb,
    index: EdgeIndex,
    record: &EdgeRecord,
  ) -> EdgeVisit {
    let mut visit = EdgeVisit::new(index);

    match record.kind() {
      EdgeKind::Degenerate => return visit,
      EdgeKind::Boundary | EdgeKind::NonManifold => {
        visit.may.push(ROOT_ID);
        return visit;
      }
      EdgeKind::Manifold => {}
    }
    let Some(planes) = EdgePlanes::for_record(record) else {
      return visit;
    };

    // Volumes ride along on the stack so no store lookup is needed.
    let mut stack = vec![(ROOT_ID, root)];
    while let Some((id, volume)) = stack.pop() {
      match planes.classify(record, &volume) {
        EdgeSilhouetteness::NotSilhouette => {}
        EdgeSilhouetteness::PotentiallySilhouette => match layout.children_start(id) {
          Some(start) => {
            visit.splits.push(id);
            for octant in (0..OCTANTS).rev() {
              stack.push((start + octant, volume.octant(octant as usize)));
            }
          }
          None => visit.may.push(id),
        },
        definite => {
          if let Some(orientation) = definite.orientation() {
            visit.always.push((id, orientation));
          }
        }
      }
    }
    visit
  }

  /// Write a visit into the store.
  pub fn apply(&mut self, visit: &EdgeVisit) {
    for &id in &visit.splits {
      if self.octree.ensure_node(id).is_some() {
        self.octree.split_node(id);
      }
    }
    for &(id, orientation) in &visit.always {
      if let Some(node) = self.octree.ensure_node(id) {
        node
          .edges_always_cast
          .insert(SilhouetteEdge::new(visit.index, orientation));
      }
    }
    for &id in &visit.may {
      if let Some(node) = self.octree.ensure_node(id) {
        node.edges_may_cast.insert(visit.index);
      }
    }
  }

  /// Insert a single edge top-down.
  pub fn add_edge(&mut self, index: EdgeIndex, record: &EdgeRecord) {
    let visit = Self::visit_edge(
      self.octree.layout(),
      self.octree.root_volume(),
      index,
      record,
    );
    self.apply(&visit);
  }

  /// Insert every edge of the table top-down.
  ///
  /// With `parallel` the descents run on the rayon pool; results are applied
  /// in edge order either way, so the tree is identical.
  pub fn add_edges(&mut self, edges: &EdgeTable, parallel: bool) {
    let _span = tracing::info_span!("octree_add_edges", edges = edges.len(), parallel).entered();

    let layout = self.octree.layout();
    let root = self.octree.root_volume();
    let visit = |(i, record): (usize, &EdgeRecord)| {
      Self::visit_edge(layout, root, i as EdgeIndex, record)
    };
    let visits: Vec<EdgeVisit> = if parallel {
      edges.records().par_iter().enumerate().map(visit).collect()
    } else {
      edges.records().iter().enumerate().map(visit).collect()
    };

    for visit in &visits {
      self.apply(visit);
    }
  }

  /// Expand the tree to full depth and classify every deepest node against
  /// every edge.
  ///
  /// Follow with [`process_silhouette_edges`](Self::process_silhouette_edges)
  /// and [`process_potential_edges`](Self::process_potential_edges) to hoist
  /// the leaf entries.
  pub fn load_bottom_up(&mut self, edges: &EdgeTable, parallel: bool) {
    let _span = tracing::info_span!("octree_load_bottom_up", edges = edges.len(), parallel).entered();

    let max_depth = self.octree.max_depth();
    for level in 0..max_depth {
      for id in self.octree.nodes_at_level(level) {
        self.octree.split_node(id);
      }
    }

    let planes: Vec<Option<EdgePlanes>> = edges.records().iter().map(EdgePlanes::for_record).collect();

    for (index, record) in edges.iter() {
      if matches!(record.kind(), EdgeKind::Boundary | EdgeKind::NonManifold) {
        if let Some(root) = self.octree.node_mut(ROOT_ID) {
          root.edges_may_cast.insert(index);
        }
      }
    }

    let leaves: Vec<(NodeId, Aabb)> = self
      .octree
      .nodes_at_level(max_depth)
      .into_iter()
      .filter_map(|id| self.octree.node(id).map(|n| (id, n.volume)))
      .collect();

    let classify = |&(id, volume): &(NodeId, Aabb)| {
      let mut always = Vec::new();
      let mut may = Vec::new();
      for (index, (record, planes)) in edges.records().iter().zip(&planes).enumerate() {
        let Some(planes) = planes else {
          continue;
        };
        let index = index as EdgeIndex;
        match planes.classify(record, &volume) {
          EdgeSilhouetteness::NotSilhouette => {}
          EdgeSilhouetteness::PotentiallySilhouette => may.push(index),
          definite => {
            if let Some(orientation) = definite.orientation() {
              always.push(SilhouetteEdge::new(index, orientation));
            }
          }
        }
      }
      (id, always, may)
    };
    let classified: Vec<(NodeId, Vec<SilhouetteEdge>, Vec<EdgeIndex>)> = if parallel {
      leaves.par_iter().map(classify).collect()
    } else {
      leaves.iter().map(classify).collect()
    };

    for (id, always, may) in classified {
      if let Some(node) = self.octree.node_mut(id) {
        node.edges_always_cast.extend(always);
        node.edges_may_cast.extend(may);
      }
    }
  }

  /// Hoist potential edges shared by all 8 siblings into their parent,
  /// deepest level first. Returns the number of hoisted entries.
  pub fn process_potential_edges(&mut self) -> usize {
    let _span = tracing::info_span!("octree_process_potential_edges").entered();
    let hoisted = self.hoist_levels(may_cast, may_cast_mut);
    tracing::debug!(hoisted, "potential edges merged");
    hoisted
  }

  /// Hoist definite entries (same edge, same orientation) shared by all 8
  /// siblings into their parent, deepest level first.
  pub fn process_silhouette_edges(&mut self) -> usize {
    let _span = tracing::info_span!("octree_process_silhouette_edges").entered();
    let hoisted = self.hoist_levels(always_cast, always_cast_mut);
    tracing::debug!(hoisted, "silhouette edges merged");
    hoisted
  }

  fn hoist_levels<T: Ord + Clone>(
    &mut self,
    get: fn(&OctreeNode) -> &BTreeSet<T>,
    get_mut: fn(&mut OctreeNode) -> &mut BTreeSet<T>,
  ) -> usize {
    let mut hoisted = 0;
    for level in (0..self.octree.max_depth()).rev() {
      for parent in self.octree.nodes_at_level(level) {
        hoisted += self.hoist_into(parent, get, get_mut);
      }
    }
    hoisted
  }

  fn hoist_into<T: Ord + Clone>(
    &mut self,
    parent: NodeId,
    get: fn(&OctreeNode) -> &BTreeSet<T>,
    get_mut: fn(&mut OctreeNode) -> &mut BTreeSet<T>,
  ) -> usize {
    let Some(children) = self.octree.layout().children(parent) else {
      return 0;
    };

    // Intersection over the full sibling group; a missing child means no
    // agreement is possible.
    let mut common: Option<BTreeSet<T>> = None;
    for child in children {
      let Some(node) = self.octree.node(child) else {
        return 0;
      };
      let set = get(node);
      let next = match common {
        None => set.clone(),
        Some(acc) => acc.intersection(set).cloned().collect(),
      };
      if next.is_empty() {
        return 0;
      }
      common = Some(next);
    }
    let Some(common) = common else {
      return 0;
    };

    for child in children {
      if let Some(node) = self.octree.node_mut(child) {
        get_mut(node).retain(|entry| !common.contains(entry));
      }
    }
    let count = common.len();
    if let Some(node) = self.octree.node_mut(parent) {
      get_mut(node).extend(common);
    }
    count
  }

  /// Delete childless nodes with no entries, deepest level first, so that
  /// emptied sibling groups expose their parent. The root is kept.
  pub fn clean_empty_nodes(&mut self) -> usize {
    let _span = tracing::info_span!("octree_clean_empty_nodes").entered();

    let mut removed = 0;
    for level in (1..=self.octree.max_depth()).rev() {
      for id in self.octree.nodes_at_level(level) {
        let empty = self.octree.node(id).is_some_and(OctreeNode::is_empty);
        if empty && !self.octree.children_exist(id) {
          self.octree.delete_node(id);
          removed += 1;
        }
      }
    }
    tracing::debug!(removed, remaining = self.octree.node_count(), "empty nodes pruned");
    removed
  }
}

fn may_cast(node: &OctreeNode) -> &BTreeSet<EdgeIndex> {
  &node.edges_may_cast
}

fn may_cast_mut(node: &mut OctreeNode) -> &mut BTreeSet<EdgeIndex> {
  &mut node.edges_may_cast
}

fn always_cast(node: &OctreeNode) -> &BTreeSet<SilhouetteEdge> {
  &node.edges_always_cast
}

fn always_cast_mut(node: &mut OctreeNode) -> &mut BTreeSet<SilhouetteEdge> {
  &mut node.edges_always_cast
}

#[cfg(test)]
#[path = "visitor_test.rs"]
mod visitor_test;
