//! Adaptive octree accelerator.
//!
//! Memory follows where edges are ambiguous instead of a fixed grid: a
//! node is only subdivided while some edge is potential over it. Entries
//! live at the highest node where they hold, so a query gathers the sets of
//! the located node and all of its ancestors.

use std::collections::BTreeSet;

use glam::Vec3;

use super::{not_initialized, outside_light_space, SilhouetteAccelerator, SilhouetteEdges};
use crate::edges::{EdgeIndex, EdgeTable, SilhouetteEdge};
use crate::error::SilhouetteError;
use crate::geometry::Aabb;
use crate::octree::{Octree, OctreeVisitor};
use crate::stats::{BuildStats, BuildTimer};

const NAME: &str = "octree";

/// How the tree is populated before the merge and prune passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildStrategy {
  /// Descend per edge, splitting only while the edge stays potential.
  #[default]
  TopDown,
  /// Expand to full depth, classify every leaf, hoist agreement upward.
  BottomUp,
}

/// Octree depth and build options.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OctreeParams {
  /// Deepest subdivision level (root = 0), at most
  /// [`MAX_OCTREE_DEPTH`](crate::octree::MAX_OCTREE_DEPTH).
  pub max_depth: u32,
  pub strategy: BuildStrategy,
  /// Run per-edge descents (or per-leaf classification) on the rayon pool.
  pub parallel: bool,
}

impl Default for OctreeParams {
  fn default() -> Self {
    Self {
      max_depth: 5,
      strategy: BuildStrategy::TopDown,
      parallel: true,
    }
  }
}

impl OctreeParams {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_depth(mut self, depth: u32) -> Self {
    self.max_depth = depth;
    self
  }

  pub fn with_strategy(mut self, strategy: BuildStrategy) -> Self {
    self.strategy = strategy;
    self
  }

  pub fn with_parallel(mut self, parallel: bool) -> Self {
    self.parallel = parallel;
    self
  }
}

#[derive(Clone, Debug, Default)]
pub struct OctreeSilhouettes {
  octree: Option<Octree>,
  stats: Option<BuildStats>,
}

impl OctreeSilhouettes {
  pub fn new(
    edges: &EdgeTable,
    light_space: Aabb,
    params: &OctreeParams,
  ) -> Result<Self, SilhouetteError> {
    let mut accelerator = Self::default();
    accelerator.initialize(edges, light_space, params)?;
    Ok(accelerator)
  }

  /// The built tree, for inspection.
  pub fn octree(&self) -> Option<&Octree> {
    self.octree.as_ref()
  }
}

impl SilhouetteAccelerator for OctreeSilhouettes {
  type Params = OctreeParams;

  fn initialize(
    &mut self,
    edges: &EdgeTable,
    light_space: Aabb,
    params: &OctreeParams,
  ) -> Result<(), SilhouetteError> {
    self.clear();
    let timer = BuildTimer::start();
    let mut octree = Octree::new(light_space, params.max_depth)?;

    let _span = tracing::info_span!(
      "octree_initialize",
      edges = edges.len(),
      max_depth = params.max_depth,
      strategy = ?params.strategy
    )
    .entered();

    let mut visitor = OctreeVisitor::new(&mut octree);
    match params.strategy {
      BuildStrategy::TopDown => {
        visitor.add_edges(edges, params.parallel);
      }
      BuildStrategy::BottomUp => {
        visitor.load_bottom_up(edges, params.parallel);
        visitor.process_silhouette_edges();
      }
    }
    visitor.process_potential_edges();
    visitor.clean_empty_nodes();

    let mut stats = BuildStats::for_edges(edges);
    stats.cells = octree.node_count();
    stats.size_bytes = octree.size_bytes();
    stats.elapsed = timer.elapsed();
    stats.log(NAME);

    self.octree = Some(octree);
    self.stats = Some(stats);
    Ok(())
  }

  /// Union of the entries on the path from the deepest node containing the
  /// light up to the root.
  fn silhouette_edges_for_light_pos(&self, light_pos: Vec3) -> SilhouetteEdges {
    let Some(octree) = &self.octree else {
      return not_initialized(NAME);
    };
    let Some(lowest) = octree.lowest_node_from_point(light_pos) else {
      return outside_light_space(NAME, light_pos, &octree.root_volume());
    };

    let mut silhouette: BTreeSet<SilhouetteEdge> = BTreeSet::new();
    let mut potential: BTreeSet<EdgeIndex> = BTreeSet::new();
    for id in octree.layout().path_to_root(lowest) {
      if let Some(node) = octree.node(id) {
        silhouette.extend(node.edges_always_cast.iter().copied());
        potential.extend(node.edges_may_cast.iter().copied());
      }
    }

    SilhouetteEdges {
      potential: potential.into_iter().collect(),
      silhouette: silhouette.into_iter().collect(),
    }
  }

  fn size_bytes(&self) -> usize {
    self.octree.as_ref().map_or(0, Octree::size_bytes)
  }

  fn clear(&mut self) {
    self.octree = None;
    self.stats = None;
  }

  fn build_stats(&self) -> Option<&BuildStats> {
    self.stats.as_ref()
  }
}
