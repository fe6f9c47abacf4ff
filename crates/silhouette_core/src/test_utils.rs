//! Mesh fixtures shared by the unit tests.
//!
//! Every closed fixture is centered on the origin and wound so that each
//! triangle faces away from the center.

use glam::Vec3;

use crate::edges::Triangle;
use crate::geometry::Aabb;

/// Flip `(a, b, c)` if needed so the triangle faces away from `center`.
pub fn outward(a: Vec3, b: Vec3, c: Vec3, center: Vec3) -> Triangle {
  let normal = (b - a).cross(c - a);
  let centroid = (a + b + c) / 3.0;
  if normal.dot(centroid - center) >= 0.0 {
    Triangle::new(a, b, c)
  } else {
    Triangle::new(a, c, b)
  }
}

/// Axis-aligned cube `[-half, half]^3`, two triangles per face (12 total).
pub fn cube_triangles(half: f32) -> Vec<Triangle> {
  let corner = |i: usize| {
    Vec3::new(
      if i & 1 != 0 { half } else { -half },
      if i & 2 != 0 { half } else { -half },
      if i & 4 != 0 { half } else { -half },
    )
  };
  // Each face as 4 corners walking around its perimeter.
  let faces: [[usize; 4]; 6] = [
    [0, 2, 6, 4], // -X
    [1, 3, 7, 5], // +X
    [0, 1, 5, 4], // -Y
    [2, 3, 7, 6], // +Y
    [0, 1, 3, 2], // -Z
    [4, 5, 7, 6], // +Z
  ];

  faces
    .iter()
    .flat_map(|f| {
      let [a, b, c, d] = f.map(corner);
      [outward(a, b, c, Vec3::ZERO), outward(a, c, d, Vec3::ZERO)]
    })
    .collect()
}

/// Regular octahedron with vertices at `±radius` on each axis (8 triangles).
pub fn octahedron_triangles(radius: f32) -> Vec<Triangle> {
  let mut triangles = Vec::with_capacity(8);
  for sx in [-1.0, 1.0] {
    for sy in [-1.0, 1.0] {
      for sz in [-1.0, 1.0] {
        triangles.push(outward(
          Vec3::X * sx * radius,
          Vec3::Y * sy * radius,
          Vec3::Z * sz * radius,
          Vec3::ZERO,
        ));
      }
    }
  }
  triangles
}

/// Latitude/longitude sphere, closed at the poles with triangle fans.
pub fn uv_sphere_triangles(radius: f32, rings: usize, segments: usize) -> Vec<Triangle> {
  let point = |ring: usize, seg: usize| {
    let theta = std::f32::consts::PI * ring as f32 / rings as f32;
    let phi = std::f32::consts::TAU * (seg % segments) as f32 / segments as f32;
    if ring == 0 {
      return Vec3::Y * radius;
    }
    if ring == rings {
      return -Vec3::Y * radius;
    }
    Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()) * radius
  };

  let mut triangles = Vec::new();
  for ring in 0..rings {
    for seg in 0..segments {
      let a = point(ring, seg);
      let b = point(ring, seg + 1);
      let c = point(ring + 1, seg);
      let d = point(ring + 1, seg + 1);
      if ring != 0 {
        triangles.push(outward(a, b, d, Vec3::ZERO));
      }
      if ring + 1 != rings {
        triangles.push(outward(a, d, c, Vec3::ZERO));
      }
    }
  }
  triangles
}

/// Two triangles forming an open unit square in the XZ plane, facing +Y.
pub fn open_quad_triangles() -> Vec<Triangle> {
  let a = Vec3::new(0.0, 0.0, 0.0);
  let b = Vec3::new(1.0, 0.0, 0.0);
  let c = Vec3::new(1.0, 0.0, 1.0);
  let d = Vec3::new(0.0, 0.0, 1.0);
  let up = |p: Vec3, q: Vec3, r: Vec3| {
    if (q - p).cross(r - p).y >= 0.0 {
      Triangle::new(p, q, r)
    } else {
      Triangle::new(p, r, q)
    }
  };
  vec![up(a, b, c), up(a, c, d)]
}

/// Light space used with the unit cube: narrow on X/Z, tall on Y so that a
/// far overhead light sits in a cell clear of every face plane.
pub fn tall_light_space() -> Aabb {
  Aabb::new(Vec3::new(-1.0, -2048.0, -1.0), Vec3::new(1.0, 2048.0, 1.0))
}
