//! Reference accelerator: no precomputation, every edge tested per query.

use glam::Vec3;

use super::{not_initialized, outside_light_space, SilhouetteAccelerator, SilhouetteEdges};
use crate::edges::{EdgeIndex, EdgeKind, EdgeRecord, EdgeTable, Orientation, SilhouetteEdge};
use crate::error::SilhouetteError;
use crate::geometry::{edge_multiplicity, Aabb};
use crate::stats::{BuildStats, BuildTimer};

const NAME: &str = "brute_force";

/// Copy of the edge table, classified from scratch on every query.
#[derive(Clone, Debug, Default)]
pub struct BruteForceSilhouettes {
  light_space: Option<Aabb>,
  edges: Vec<EdgeRecord>,
  stats: Option<BuildStats>,
}

impl BruteForceSilhouettes {
  pub fn new(edges: &EdgeTable, light_space: Aabb) -> Result<Self, SilhouetteError> {
    let mut brute = Self::default();
    brute.initialize(edges, light_space, &())?;
    Ok(brute)
  }
}

impl SilhouetteAccelerator for BruteForceSilhouettes {
  type Params = ();

  fn initialize(
    &mut self,
    edges: &EdgeTable,
    light_space: Aabb,
    _params: &(),
  ) -> Result<(), SilhouetteError> {
    self.clear();
    if !light_space.is_valid() {
      return Err(SilhouetteError::InvalidLightSpace(light_space));
    }
    let timer = BuildTimer::start();

    self.edges = edges.records().to_vec();
    self.light_space = Some(light_space);

    let mut stats = BuildStats::for_edges(edges);
    stats.cells = self.edges.len();
    stats.size_bytes = self.size_bytes();
    stats.elapsed = timer.elapsed();
    stats.log(NAME);
    self.stats = Some(stats);
    Ok(())
  }

  /// Manifold edges are decided by their multiplicity at the light, the
  /// same test [`SilhouetteEdges::resolve`] applies to potential edges, so
  /// lights on a triangle plane agree with the precomputed accelerators.
  /// Boundary and non-manifold edges come back as potential.
  fn silhouette_edges_for_light_pos(&self, light_pos: Vec3) -> SilhouetteEdges {
    let Some(light_space) = &self.light_space else {
      return not_initialized(NAME);
    };
    if !light_space.contains_point(light_pos) {
      return outside_light_space(NAME, light_pos, light_space);
    }

    let mut result = SilhouetteEdges::default();
    for (index, record) in self.edges.iter().enumerate() {
      let index = index as EdgeIndex;
      match record.kind() {
        EdgeKind::Manifold => {
          let multiplicity = edge_multiplicity(record, light_pos);
          if multiplicity != 0 {
            result.silhouette.push(SilhouetteEdge::new(
              index,
              Orientation::from_multiplicity(multiplicity),
            ));
          }
        }
        EdgeKind::Boundary | EdgeKind::NonManifold => result.potential.push(index),
        EdgeKind::Degenerate => {}
      }
    }
    result
  }

  fn size_bytes(&self) -> usize {
    self.edges.len() * std::mem::size_of::<EdgeRecord>()
  }

  fn clear(&mut self) {
    self.light_space = None;
    self.edges = Vec::new();
    self.stats = None;
  }

  fn build_stats(&self) -> Option<&BuildStats> {
    self.stats.as_ref()
  }
}
