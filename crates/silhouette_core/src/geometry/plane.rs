//! Oriented plane `n·p + d = 0` with side tests for points and boxes.

use glam::Vec3;

use super::Aabb;

/// Which side of a plane a point or box lies on.
///
/// Discriminants match the sign of the plane equation so that two results
/// can be compared by multiplying them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum PlaneSide {
  /// Strictly on the side the normal points to.
  Above = 1,
  /// Strictly on the opposite side.
  Below = -1,
  /// On the plane, or (for boxes) corners on both sides.
  Intersects = 0,
}

impl PlaneSide {
  /// Interpret a signed plane distance.
  #[inline]
  pub fn from_distance(distance: f32) -> Self {
    if distance > 0.0 {
      PlaneSide::Above
    } else if distance < 0.0 {
      PlaneSide::Below
    } else {
      PlaneSide::Intersects
    }
  }

  #[inline]
  pub fn sign(self) -> i32 {
    self as i8 as i32
  }

  /// True for `Above`/`Below` pairs in either order.
  #[inline]
  pub fn is_opposite(self, other: PlaneSide) -> bool {
    self.sign() * other.sign() < 0
  }
}

/// Plane stored as unit normal and offset.
///
/// A degenerate input (collinear points) yields a zero normal; such a plane
/// reports every point as `Intersects`, which keeps classifications
/// conservative instead of producing NaNs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub normal: Vec3,
  pub d: f32,
}

impl Plane {
  pub fn new(normal: Vec3, d: f32) -> Self {
    Self { normal, d }
  }

  /// Plane through `point` with the given normal.
  pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
    Self {
      normal,
      d: -normal.dot(point),
    }
  }

  /// Plane through three points, normal facing the side from which
  /// `v1 -> v2 -> v3` appears counter-clockwise.
  pub fn from_points_ccw(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
    let normal = (v3 - v2).cross(v1 - v2).normalize_or_zero();
    Self::from_point_normal(v2, normal)
  }

  /// Signed distance of `point` (scaled by the normal length).
  #[inline]
  pub fn test_point(&self, point: Vec3) -> f32 {
    self.normal.dot(point) + self.d
  }

  #[inline]
  pub fn side_of_point(&self, point: Vec3) -> PlaneSide {
    PlaneSide::from_distance(self.test_point(point))
  }

  /// Classify all 8 box corners.
  ///
  /// The first corner sets the provisional side; any corner that disagrees
  /// makes the whole box `Intersects`. A corner exactly on the plane never
  /// agrees with a strictly-signed corner.
  pub fn test_aabb(&self, bbox: &Aabb) -> PlaneSide {
    let corners = bbox.vertices();
    let first = self.side_of_point(corners[0]);

    for corner in &corners[1..] {
      if self.side_of_point(*corner) != first {
        return PlaneSide::Intersects;
      }
    }

    first
  }
}
