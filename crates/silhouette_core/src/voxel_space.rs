//! Uniform voxel grid over a light space.
//!
//! Voxels are addressed by integer coordinates `(x, y, z)` or by a linear
//! index with X varying fastest:
//!
//! ```text
//! index = x + X * (y + Y * z)
//! ```

use glam::{UVec3, Vec3};

use crate::error::SilhouetteError;
use crate::geometry::Aabb;

/// Light space cut into `counts.x * counts.y * counts.z` equal voxels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelizedSpace {
  space: Aabb,
  counts: UVec3,
  segment: Vec3,
}

impl VoxelizedSpace {
  /// Grid over `space` with `counts` voxels per axis.
  ///
  /// Fails for a zero count or a box without positive extent, since both
  /// would make the per-axis segment length meaningless.
  pub fn new(space: Aabb, counts: [u32; 3]) -> Result<Self, SilhouetteError> {
    let [x, y, z] = counts;
    if x == 0 || y == 0 || z == 0 {
      return Err(SilhouetteError::InvalidVoxelCounts { x, y, z });
    }
    if !space.is_valid() {
      return Err(SilhouetteError::InvalidLightSpace(space));
    }
    let counts = UVec3::from_array(counts);
    Ok(Self {
      space,
      counts,
      segment: space.size() / counts.as_vec3(),
    })
  }

  #[inline]
  pub fn space(&self) -> &Aabb {
    &self.space
  }

  #[inline]
  pub fn counts(&self) -> UVec3 {
    self.counts
  }

  /// Edge lengths of a single voxel.
  #[inline]
  pub fn segment_lengths(&self) -> Vec3 {
    self.segment
  }

  #[inline]
  pub fn num_voxels(&self) -> usize {
    self.counts.x as usize * self.counts.y as usize * self.counts.z as usize
  }

  #[inline]
  fn coords_valid(&self, coords: UVec3) -> bool {
    coords.x < self.counts.x && coords.y < self.counts.y && coords.z < self.counts.z
  }

  /// Linear index of voxel `coords`, `None` outside the grid.
  pub fn linear_index(&self, coords: UVec3) -> Option<usize> {
    if !self.coords_valid(coords) {
      return None;
    }
    let (cx, cy) = (self.counts.x as usize, self.counts.y as usize);
    Some(coords.x as usize + cx * (coords.y as usize + cy * coords.z as usize))
  }

  /// Inverse of [`linear_index`](Self::linear_index).
  pub fn coords_from_linear_index(&self, index: usize) -> Option<UVec3> {
    if index >= self.num_voxels() {
      return None;
    }
    let (cx, cy) = (self.counts.x as usize, self.counts.y as usize);
    Some(UVec3::new(
      (index % cx) as u32,
      ((index / cx) % cy) as u32,
      (index / (cx * cy)) as u32,
    ))
  }

  /// Lower face of voxel `i` along `axis`. `i == count` is the max face of
  /// the space, returned exactly.
  #[inline]
  fn axis_bound(&self, axis: usize, i: u32) -> f32 {
    let count = self.counts[axis];
    if i >= count {
      return self.space.max[axis];
    }
    self.space.min[axis] + self.space.size()[axis] * i as f32 / count as f32
  }

  /// Voxel coordinates containing `point`.
  ///
  /// The grid is closed: a point on the max face maps to the last voxel of
  /// that axis. The estimate from the segment length is corrected against
  /// [`voxel_from_coords`](Self::voxel_from_coords) bounds, so the returned
  /// voxel always contains the point. `None` outside the light space.
  pub fn coords_from_point(&self, point: Vec3) -> Option<UVec3> {
    if !self.space.contains_point(point) {
      return None;
    }
    let mut coords = [0u32; 3];
    for (axis, coord) in coords.iter_mut().enumerate() {
      let count = self.counts[axis];
      let p = point[axis];
      let estimate = ((p - self.space.min[axis]) / self.segment[axis]).floor();
      let mut cell = (estimate.max(0.0) as u32).min(count - 1);
      while cell > 0 && p < self.axis_bound(axis, cell) {
        cell -= 1;
      }
      while cell + 1 < count && p >= self.axis_bound(axis, cell + 1) {
        cell += 1;
      }
      *coord = cell;
    }
    Some(UVec3::from_array(coords))
  }

  pub fn linear_index_from_point(&self, point: Vec3) -> Option<usize> {
    self
      .coords_from_point(point)
      .and_then(|c| self.linear_index(c))
  }

  /// Volume of voxel `coords`, `None` outside the grid.
  ///
  /// Neighbouring voxels share faces exactly and the last voxel on each
  /// axis ends on the max face of the space.
  pub fn voxel_from_coords(&self, coords: UVec3) -> Option<Aabb> {
    if !self.coords_valid(coords) {
      return None;
    }
    let bound = |offset: u32| {
      Vec3::new(
        self.axis_bound(0, coords.x + offset),
        self.axis_bound(1, coords.y + offset),
        self.axis_bound(2, coords.z + offset),
      )
    };
    Some(Aabb {
      min: bound(0),
      max: bound(1),
    })
  }

  pub fn voxel_from_linear_index(&self, index: usize) -> Option<Aabb> {
    self
      .coords_from_linear_index(index)
      .and_then(|c| self.voxel_from_coords(c))
  }

  pub fn voxel_from_point(&self, point: Vec3) -> Option<Aabb> {
    self
      .coords_from_point(point)
      .and_then(|c| self.voxel_from_coords(c))
  }

  /// Iterate `(linear index, voxel volume)` in index order.
  pub fn voxels(&self) -> impl Iterator<Item = (usize, Aabb)> + '_ {
    (0..self.num_voxels()).filter_map(move |i| self.voxel_from_linear_index(i).map(|v| (i, v)))
  }
}

#[cfg(test)]
#[path = "voxel_space_test.rs"]
mod voxel_space_test;
