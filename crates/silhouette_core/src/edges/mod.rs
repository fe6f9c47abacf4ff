//! Edge model shared by every accelerator.
//!
//! Triangles are broken into undirected edges keyed by a canonical endpoint
//! order, so the two half-edges of neighbouring triangles land on the same
//! [`EdgeRecord`]. Each record keeps the apex ("opposite vertex") of every
//! adjacent triangle together with the winding that triangle gave the edge.
//!
//! The position of a record in the [`EdgeTable`] is its [`EdgeIndex`]; the
//! accelerators report silhouettes by that index.

use std::cmp::Ordering;

use glam::{Vec3, Vec4};
use smallvec::SmallVec;

use crate::geometry::Aabb;

pub mod extractor;

pub use extractor::extract_edges;

/// Position of an edge in its [`EdgeTable`].
pub type EdgeIndex = u32;

/// World-space triangle with homogeneous vertices (`w` is ignored).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
  pub v1: Vec4,
  pub v2: Vec4,
  pub v3: Vec4,
}

impl Triangle {
  /// Triangle from cartesian points, counter-clockwise seen from its front.
  pub fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
    Self {
      v1: v1.extend(1.0),
      v2: v2.extend(1.0),
      v3: v3.extend(1.0),
    }
  }

  pub fn from_homogeneous(v1: Vec4, v2: Vec4, v3: Vec4) -> Self {
    Self { v1, v2, v3 }
  }

  #[inline]
  pub fn points(&self) -> [Vec3; 3] {
    [self.v1.truncate(), self.v2.truncate(), self.v3.truncate()]
  }

  /// Unnormalized front-face normal.
  pub fn normal(&self) -> Vec3 {
    let [a, b, c] = self.points();
    (b - a).cross(c - a)
  }
}

/// Whether the stored (canonical) edge direction matches the direction the
/// adjacent triangle traverses it in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Winding {
  /// Triangle walks `lower -> higher`.
  Ccw,
  /// Triangle walks `higher -> lower`.
  Cw,
}

/// Apex of a triangle adjacent to an edge, tagged with that triangle's winding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OppositeVertex {
  pub position: Vec3,
  pub winding: Winding,
}

impl OppositeVertex {
  pub fn new(position: Vec3, winding: Winding) -> Self {
    Self { position, winding }
  }

  #[inline]
  pub fn is_ccw(&self) -> bool {
    self.winding == Winding::Ccw
  }
}

/// Lexicographic (x, y, z) total order on points.
///
/// Negative zero is folded into positive zero so `-0.0` and `0.0` endpoints
/// produce the same key.
pub fn cmp_points(a: Vec3, b: Vec3) -> Ordering {
  let key = |p: Vec3| [p.x + 0.0, p.y + 0.0, p.z + 0.0];
  let (ka, kb) = (key(a), key(b));
  ka[0]
    .total_cmp(&kb[0])
    .then_with(|| ka[1].total_cmp(&kb[1]))
    .then_with(|| ka[2].total_cmp(&kb[2]))
}

/// Undirected edge with endpoints in canonical order (`lower < higher`).
#[derive(Clone, Copy, Debug)]
pub struct Edge {
  pub lower: Vec3,
  pub higher: Vec3,
}

impl Edge {
  /// Canonicalize the directed edge `from -> to`.
  ///
  /// Returns the edge and `Winding::Ccw` when no swap was needed, i.e. the
  /// stored direction is the one the source triangle used.
  pub fn new(from: Vec3, to: Vec3) -> (Self, Winding) {
    if cmp_points(from, to) == Ordering::Less {
      (
        Self {
          lower: from,
          higher: to,
        },
        Winding::Ccw,
      )
    } else {
      (
        Self {
          lower: to,
          higher: from,
        },
        Winding::Cw,
      )
    }
  }

  #[inline]
  pub fn is_degenerate(&self) -> bool {
    cmp_points(self.lower, self.higher) == Ordering::Equal
  }

  #[inline]
  pub fn midpoint(&self) -> Vec3 {
    (self.lower + self.higher) * 0.5
  }
}

impl PartialEq for Edge {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for Edge {}

impl PartialOrd for Edge {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Edge {
  fn cmp(&self, other: &Self) -> Ordering {
    cmp_points(self.lower, other.lower).then_with(|| cmp_points(self.higher, other.higher))
  }
}

/// Topological category of an edge, by number of adjacent triangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
  /// No adjacent triangle. Never classified, never reported.
  Degenerate,
  /// One adjacent triangle (mesh boundary). Always potential.
  Boundary,
  /// Two adjacent triangles. Fully classified.
  Manifold,
  /// Three or more adjacent triangles. Treated like a boundary edge.
  NonManifold,
}

/// An edge and the apexes of its adjacent triangles.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
  pub edge: Edge,
  pub opposite: SmallVec<[OppositeVertex; 2]>,
}

impl EdgeRecord {
  pub fn new(edge: Edge, opposite: impl IntoIterator<Item = OppositeVertex>) -> Self {
    Self {
      edge,
      opposite: opposite.into_iter().collect(),
    }
  }

  pub fn kind(&self) -> EdgeKind {
    match self.opposite.len() {
      0 => EdgeKind::Degenerate,
      1 => EdgeKind::Boundary,
      2 => EdgeKind::Manifold,
      _ => EdgeKind::NonManifold,
    }
  }
}

/// Silhouette orientation; decides the winding of the extruded shadow quad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
  /// Non-negative multiplicity (CCW).
  Plus,
  /// Negative multiplicity (CW).
  Minus,
}

impl Orientation {
  #[inline]
  pub fn from_multiplicity(multiplicity: i32) -> Self {
    if multiplicity >= 0 {
      Orientation::Plus
    } else {
      Orientation::Minus
    }
  }

  #[inline]
  pub fn sign(self) -> i32 {
    match self {
      Orientation::Plus => 1,
      Orientation::Minus => -1,
    }
  }
}

/// Edge index with its silhouette orientation.
///
/// Replaces sign-encoded indices, which cannot carry a sign for edge 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SilhouetteEdge {
  pub index: EdgeIndex,
  pub orientation: Orientation,
}

impl SilhouetteEdge {
  pub fn new(index: EdgeIndex, orientation: Orientation) -> Self {
    Self { index, orientation }
  }

  /// `±(index + 1)` for consumers that want a single signed integer.
  #[inline]
  pub fn to_signed_offset(self) -> i64 {
    (self.index as i64 + 1) * self.orientation.sign() as i64
  }

  /// Inverse of [`to_signed_offset`](Self::to_signed_offset); `None` for 0.
  pub fn from_signed_offset(value: i64) -> Option<Self> {
    if value == 0 {
      return None;
    }
    let orientation = if value > 0 {
      Orientation::Plus
    } else {
      Orientation::Minus
    };
    let index = EdgeIndex::try_from(value.unsigned_abs() - 1).ok()?;
    Some(Self { index, orientation })
  }
}

/// Deduplicated edges of a mesh with stable indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeTable {
  records: Vec<EdgeRecord>,
}

impl EdgeTable {
  pub fn new(records: Vec<EdgeRecord>) -> Self {
    Self { records }
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn get(&self, index: EdgeIndex) -> Option<&EdgeRecord> {
    self.records.get(index as usize)
  }

  pub fn records(&self) -> &[EdgeRecord] {
    &self.records
  }

  /// Iterate `(index, record)` pairs.
  pub fn iter(&self) -> impl Iterator<Item = (EdgeIndex, &EdgeRecord)> {
    self
      .records
      .iter()
      .enumerate()
      .map(|(i, r)| (i as EdgeIndex, r))
  }

  /// Index of the edge between two points, in either order.
  pub fn find(&self, a: Vec3, b: Vec3) -> Option<EdgeIndex> {
    let (key, _) = Edge::new(a, b);
    self
      .records
      .iter()
      .position(|r| r.edge == key)
      .map(|i| i as EdgeIndex)
  }

  pub fn count_of(&self, kind: EdgeKind) -> usize {
    self.records.iter().filter(|r| r.kind() == kind).count()
  }

  /// Bounding box of all edge endpoints.
  pub fn bounds(&self) -> Option<Aabb> {
    Aabb::from_points(
      self
        .records
        .iter()
        .flat_map(|r| [r.edge.lower, r.edge.higher]),
    )
  }
}
