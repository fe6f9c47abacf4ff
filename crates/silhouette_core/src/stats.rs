//! Counters and timing collected while building an accelerator.

use std::time::Duration;

use web_time::Instant;

use crate::edges::{EdgeKind, EdgeTable};

/// Summary of one `initialize` call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuildStats {
  pub edges_total: usize,
  pub edges_manifold: usize,
  pub edges_boundary: usize,
  pub edges_non_manifold: usize,
  pub edges_degenerate: usize,
  /// Voxels for the grid, materialized nodes for the octree, edges for
  /// brute force.
  pub cells: usize,
  pub size_bytes: usize,
  pub elapsed: Duration,
}

impl BuildStats {
  /// Edge counts of `edges`; cells, size and time are filled in by the caller.
  pub fn for_edges(edges: &EdgeTable) -> Self {
    let mut stats = Self {
      edges_total: edges.len(),
      ..Default::default()
    };
    for (_, record) in edges.iter() {
      match record.kind() {
        EdgeKind::Degenerate => stats.edges_degenerate += 1,
        EdgeKind::Boundary => stats.edges_boundary += 1,
        EdgeKind::Manifold => stats.edges_manifold += 1,
        EdgeKind::NonManifold => stats.edges_non_manifold += 1,
      }
    }
    stats
  }

  /// Edges resolved per query instead of precomputed.
  #[inline]
  pub fn edges_deferred(&self) -> usize {
    self.edges_boundary + self.edges_non_manifold
  }

  pub fn log(&self, accelerator: &str) {
    tracing::debug!(
      accelerator,
      edges = self.edges_total,
      manifold = self.edges_manifold,
      deferred = self.edges_deferred(),
      cells = self.cells,
      bytes = self.size_bytes,
      elapsed_ms = self.elapsed.as_secs_f64() * 1000.0,
      "silhouette accelerator built"
    );
  }
}

/// Wall-clock stopwatch for a build.
#[derive(Clone, Copy, Debug)]
pub struct BuildTimer {
  start: Instant,
}

impl BuildTimer {
  pub fn start() -> Self {
    Self {
      start: Instant::now(),
    }
  }

  #[inline]
  pub fn elapsed(&self) -> Duration {
    self.start.elapsed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::edges::extract_edges;
  use crate::test_utils::{cube_triangles, open_quad_triangles};

  #[test]
  fn test_counts_closed_mesh() {
    let stats = BuildStats::for_edges(&extract_edges(&cube_triangles(1.0)));
    assert_eq!(stats.edges_total, 18);
    assert_eq!(stats.edges_manifold, 18);
    assert_eq!(stats.edges_deferred(), 0);
    assert_eq!(stats.elapsed, Duration::ZERO);
  }

  #[test]
  fn test_counts_open_mesh() {
    let stats = BuildStats::for_edges(&extract_edges(&open_quad_triangles()));
    assert_eq!(stats.edges_total, 5);
    assert_eq!(stats.edges_boundary, 4);
    assert_eq!(stats.edges_manifold, 1);
  }

  #[test]
  fn test_timer_is_monotonic() {
    let timer = BuildTimer::start();
    let first = timer.elapsed();
    assert!(timer.elapsed() >= first);
  }
}
