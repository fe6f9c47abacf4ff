//! Silhouette predicates.
//!
//! An edge shared by two triangles is a silhouette edge for a light when the
//! light sees exactly one of the two triangles. For a whole region of light
//! positions that question has three answers: never, always (with a fixed
//! orientation), or "depends on where in the region the light is". The last
//! case is [`EdgeSilhouetteness::PotentiallySilhouette`] and is resolved per
//! light position with [`edge_multiplicity`].

use glam::Vec3;

use super::{Aabb, Plane, PlaneSide};
use crate::edges::{Edge, EdgeRecord, OppositeVertex, Orientation, Winding};

/// Silhouette state of one edge over one spatial region.
///
/// Discriminants are the 2-bit codes stored by the voxel grid accelerator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EdgeSilhouetteness {
  NotSilhouette = 0,
  /// Region straddles a triangle plane; decide per light position.
  PotentiallySilhouette = 1,
  SilhouettePlus = 2,
  SilhouetteMinus = 3,
}

impl EdgeSilhouetteness {
  /// Number of bits needed to store any state.
  pub const BITS: u32 = 2;

  /// Definite silhouette (`Plus` or `Minus`), i.e. code `>= 2`.
  #[inline]
  pub fn is_silhouette(self) -> bool {
    self as u8 >= 2
  }

  #[inline]
  pub fn bits(self) -> u32 {
    self as u32
  }

  /// Decode a stored cell value. Only the low [`BITS`](Self::BITS) bits matter.
  #[inline]
  pub fn from_bits(bits: u32) -> Self {
    match bits & 0b11 {
      0 => EdgeSilhouetteness::NotSilhouette,
      1 => EdgeSilhouetteness::PotentiallySilhouette,
      2 => EdgeSilhouetteness::SilhouettePlus,
      _ => EdgeSilhouetteness::SilhouetteMinus,
    }
  }

  /// Orientation of a definite silhouette, `None` otherwise.
  #[inline]
  pub fn orientation(self) -> Option<Orientation> {
    match self {
      EdgeSilhouetteness::SilhouettePlus => Some(Orientation::Plus),
      EdgeSilhouetteness::SilhouetteMinus => Some(Orientation::Minus),
      _ => None,
    }
  }

  #[inline]
  pub fn from_orientation(orientation: Orientation) -> Self {
    match orientation {
      Orientation::Plus => EdgeSilhouetteness::SilhouettePlus,
      Orientation::Minus => EdgeSilhouetteness::SilhouetteMinus,
    }
  }
}

/// Plane through `edge` and one adjacent triangle's apex.
///
/// The vertex order follows the triangle's original winding so the normal
/// always points out of that triangle's front face.
pub fn build_edge_triangle_plane(edge: &Edge, opposite: &OppositeVertex) -> Plane {
  match opposite.winding {
    Winding::Ccw => Plane::from_points_ccw(edge.lower, edge.higher, opposite.position),
    Winding::Cw => Plane::from_points_ccw(edge.higher, edge.lower, opposite.position),
  }
}

/// Net count of opposite vertices above (+1) and below (-1) the plane
/// through the edge and `test_point`.
///
/// Zero means the edge is not a silhouette for a light at `test_point`; the
/// sign of a non-zero result is the silhouette orientation.
pub fn edge_multiplicity(record: &EdgeRecord, test_point: Vec3) -> i32 {
  let light_plane = Plane::from_points_ccw(record.edge.lower, record.edge.higher, test_point);

  record
    .opposite
    .iter()
    .map(|v| light_plane.side_of_point(v.position).sign())
    .sum()
}

/// Classify an edge against a region of light positions.
///
/// `p1`/`p2` are the edge's two triangle planes. If the region straddles
/// either plane the answer is potential. If the region lies on opposite sides
/// of the two planes the edge is a silhouette everywhere in it, oriented by
/// the multiplicity at the region's min corner. Otherwise never.
pub fn classify_edge_against_region(
  p1: &Plane,
  p2: &Plane,
  record: &EdgeRecord,
  region: &Aabb,
) -> EdgeSilhouetteness {
  let side1 = p1.test_aabb(region);
  let side2 = p2.test_aabb(region);

  if side1 == PlaneSide::Intersects || side2 == PlaneSide::Intersects {
    EdgeSilhouetteness::PotentiallySilhouette
  } else if side1.is_opposite(side2) {
    let orientation = Orientation::from_multiplicity(edge_multiplicity(record, region.min));
    EdgeSilhouetteness::from_orientation(orientation)
  } else {
    EdgeSilhouetteness::NotSilhouette
  }
}

/// Both triangle planes of a manifold edge, built once and reused for every
/// region the edge is tested against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePlanes {
  pub p1: Plane,
  pub p2: Plane,
}

impl EdgePlanes {
  /// `None` unless the edge has exactly two opposite vertices.
  pub fn for_record(record: &EdgeRecord) -> Option<Self> {
    match record.opposite.as_slice() {
      [a, b] => Some(Self {
        p1: build_edge_triangle_plane(&record.edge, a),
        p2: build_edge_triangle_plane(&record.edge, b),
      }),
      _ => None,
    }
  }

  #[inline]
  pub fn classify(&self, record: &EdgeRecord, region: &Aabb) -> EdgeSilhouetteness {
    classify_edge_against_region(&self.p1, &self.p2, record, region)
  }

  /// Exact test for a single light position: the light sees exactly one face.
  #[inline]
  pub fn separates(&self, light_pos: Vec3) -> bool {
    self
      .p1
      .side_of_point(light_pos)
      .is_opposite(self.p2.side_of_point(light_pos))
  }
}

#[cfg(test)]
#[path = "predicates_test.rs"]
mod predicates_test;
