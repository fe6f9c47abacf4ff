use glam::Vec3;

use super::*;
use crate::edges::Orientation;

fn tree(depth: u32) -> Octree {
  Octree::new(Aabb::new(Vec3::splat(-4.0), Vec3::splat(4.0)), depth).expect("valid tree")
}

// =========================================================================
// Batch 1: Construction
// =========================================================================

#[test]
fn test_new_holds_only_root() {
  let tree = tree(3);
  assert_eq!(tree.node_count(), 1);
  assert!(tree.node_exists(ROOT_ID));
  assert!(!tree.children_exist(ROOT_ID));
  assert_eq!(tree.root_volume().size(), Vec3::splat(8.0));
}

#[test]
fn test_new_rejects_bad_input() {
  let flat = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
  assert_eq!(
    Octree::new(flat, 3).map(|_| ()),
    Err(SilhouetteError::InvalidLightSpace(flat))
  );
  assert!(matches!(
    Octree::new(Aabb::new(Vec3::ZERO, Vec3::ONE), 11),
    Err(SilhouetteError::DepthTooLarge { requested: 11, .. })
  ));
}

// =========================================================================
// Batch 2: Split / ensure
// =========================================================================

#[test]
fn test_split_creates_eight_half_size_children() {
  let mut tree = tree(2);
  assert!(tree.split_node(ROOT_ID));
  assert_eq!(tree.node_count(), 9);

  for octant in 0..8 {
    let id = tree.layout().child(ROOT_ID, octant).expect("inner node");
    let node = tree.node(id).expect("child materialized");
    assert_eq!(node.volume.size(), Vec3::splat(4.0), "children are half size");
    assert_eq!(node.volume, tree.root_volume().octant(octant));
  }
}

#[test]
fn test_split_refuses_leaf_and_missing() {
  let mut tree = tree(1);
  assert!(tree.split_node(ROOT_ID));
  assert!(!tree.split_node(1), "depth 1 nodes are leaves");
  assert!(!tree.split_node(9), "invalid node");
}

#[test]
fn test_ensure_node_materializes_path() {
  let mut tree = tree(3);
  let layout = tree.layout().clone();
  let deep = layout.child(layout.child(layout.child(0, 6).unwrap(), 1).unwrap(), 3).unwrap();

  let expected = layout
    .node_volume_from_id(&tree.root_volume(), deep)
    .expect("valid id");
  let node = tree.ensure_node(deep).expect("valid id");
  assert_eq!(node.volume, expected, "stored volume matches derived volume");

  // root + 3 full sibling groups
  assert_eq!(tree.node_count(), 1 + 3 * 8);
  assert!(tree.ensure_node(layout.total_nodes()).is_none());
}

// =========================================================================
// Batch 3: Deletion
// =========================================================================

#[test]
fn test_delete_subtree_removes_descendants_only() {
  let mut tree = tree(3);
  for id in 0..tree.layout().level_start(3) {
    tree.ensure_node(id);
    tree.split_node(id);
  }
  assert_eq!(tree.node_count(), 585);

  let removed = tree.delete_node_subtree(1);
  assert_eq!(removed, 1 + 8 + 64);
  assert_eq!(tree.node_count(), 585 - 73);
  assert!(!tree.node_exists(1));
  assert!(tree.node_exists(2), "siblings survive");
  assert_eq!(tree.delete_node_subtree(1), 0, "already gone");
}

/// Subtree deletion at full depth runs on an explicit stack.
#[test]
fn test_delete_deep_chain() {
  let mut tree = tree(MAX_DEPTH_FOR_TEST);
  let leaf = tree
    .layout()
    .leaf_from_point(&tree.root_volume(), Vec3::splat(3.9))
    .expect("inside");
  tree.ensure_node(leaf).expect("valid id");
  let count = tree.node_count();
  assert_eq!(count, 1 + 8 * MAX_DEPTH_FOR_TEST as usize);

  assert_eq!(tree.delete_node_subtree(ROOT_ID), count);
  assert_eq!(tree.node_count(), 0);
}

const MAX_DEPTH_FOR_TEST: u32 = crate::octree::MAX_OCTREE_DEPTH;

// =========================================================================
// Batch 4: Point location
// =========================================================================

#[test]
fn test_lowest_node_stops_at_missing_child() {
  let mut tree = tree(3);
  let point = Vec3::new(1.0, -1.0, 3.0);

  assert_eq!(tree.lowest_node_from_point(point), Some(ROOT_ID));

  tree.split_node(ROOT_ID);
  let child = tree.lowest_node_from_point(point).expect("inside");
  assert_eq!(tree.layout().level(child), Some(1));
  assert_eq!(tree.layout().index_within_parent(child), Some(1 + 4));

  tree.delete_node(child);
  assert_eq!(tree.lowest_node_from_point(point), Some(ROOT_ID));

  assert_eq!(tree.lowest_node_from_point(Vec3::splat(5.0)), None);
}

#[test]
fn test_nodes_at_level_sorted() {
  let mut tree = tree(2);
  tree.split_node(ROOT_ID);
  tree.split_node(5);
  tree.split_node(2);

  assert_eq!(tree.nodes_at_level(0), vec![ROOT_ID]);
  assert_eq!(tree.nodes_at_level(1), (1..9).collect::<Vec<_>>());
  let level2 = tree.nodes_at_level(2);
  assert_eq!(level2.len(), 16);
  assert!(level2.windows(2).all(|w| w[0] < w[1]));
  assert!(tree.nodes_at_level(3).is_empty());
}

// =========================================================================
// Batch 5: Accounting
// =========================================================================

#[test]
fn test_size_grows_with_entries() {
  let mut tree = tree(1);
  let empty = tree.size_bytes();

  let root = tree.node_mut(ROOT_ID).expect("root exists");
  root.edges_may_cast.insert(3);
  root
    .edges_always_cast
    .insert(SilhouetteEdge::new(7, Orientation::Minus));

  assert!(tree.size_bytes() > empty);
  assert_eq!(tree.entry_count(), 2);
  assert!(!tree.node(ROOT_ID).expect("root exists").is_empty());

  tree.split_node(ROOT_ID);
  tree.reset();
  assert_eq!(tree.node_count(), 1);
  assert!(tree.node(ROOT_ID).expect("root exists").is_empty());
}
