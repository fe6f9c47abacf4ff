//! Triangle soup to deduplicated edge table.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use super::{Edge, EdgeRecord, EdgeTable, OppositeVertex, Triangle};

/// Break triangles into canonical edges and collect each edge's opposite
/// vertices.
///
/// Each triangle contributes its three directed edges `v1->v2`, `v2->v3`,
/// `v3->v1` with apexes `v3`, `v1`, `v2`. Edges are indexed in canonical
/// order, so the same mesh always yields the same table. Zero-length edges
/// from collapsed triangles are dropped.
pub fn extract_edges(triangles: &[Triangle]) -> EdgeTable {
  let _span = tracing::info_span!("extract_edges", triangles = triangles.len()).entered();

  let mut edges: BTreeMap<Edge, SmallVec<[OppositeVertex; 2]>> = BTreeMap::new();
  let mut skipped = 0usize;

  for triangle in triangles {
    let [a, b, c] = triangle.points();

    for (from, to, apex) in [(a, b, c), (b, c, a), (c, a, b)] {
      let (edge, winding) = Edge::new(from, to);
      if edge.is_degenerate() {
        skipped += 1;
        continue;
      }
      edges
        .entry(edge)
        .or_default()
        .push(OppositeVertex::new(apex, winding));
    }
  }

  if skipped > 0 {
    tracing::trace!(skipped, "dropped zero-length edges");
  }

  EdgeTable::new(
    edges
      .into_iter()
      .map(|(edge, opposite)| EdgeRecord { edge, opposite })
      .collect(),
  )
}
