//! Axis-aligned bounding box used for light spaces, voxels and octree cells.

use glam::Vec3;

/// Single-precision axis-aligned bounding box.
///
/// Every spatial cell in the crate is one of these: the light space handed
/// to an accelerator, each voxel of a [`VoxelizedSpace`](crate::VoxelizedSpace)
/// and the volume of every octree node.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl Aabb {
	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Create a new AABB from center and half-extents.
	pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Smallest box containing every point, or `None` for an empty iterator.
	pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
		let mut points = points.into_iter();
		let first = points.next()?;
		let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
		Some(Self { min, max })
	}

	/// Box with inverted extents. Never valid; returned for out-of-range lookups.
	pub fn invalid() -> Self {
		Self {
			min: Vec3::splat(f32::INFINITY),
			max: Vec3::splat(f32::NEG_INFINITY),
		}
	}

	/// True when the box has strictly positive extent on every axis.
	///
	/// Index math over a grid or octree divides by these extents, so
	/// anything built over an invalid box is rejected up front.
	#[inline]
	pub fn is_valid(&self) -> bool {
		let size = self.size();
		size.x > 0.0 && size.y > 0.0 && size.z > 0.0 && size.is_finite()
	}

	/// Check if this AABB contains a point (boundary inclusive).
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	/// Half of [`size`](Self::size).
	#[inline]
	pub fn half_extents(&self) -> Vec3 {
		self.size() * 0.5
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}

	/// All 8 corners.
	///
	/// Corner `i` takes max on X when bit 0 is set, on Y for bit 1 and on Z
	/// for bit 2, so corner 0 is `min` and corner 7 is `max`.
	pub fn vertices(&self) -> [Vec3; 8] {
		std::array::from_fn(|i| {
			Vec3::new(
				if i & 1 != 0 { self.max.x } else { self.min.x },
				if i & 2 != 0 { self.max.y } else { self.min.y },
				if i & 4 != 0 { self.max.z } else { self.min.z },
			)
		})
	}

	/// One of the 8 half-size sub-boxes.
	///
	/// Octant bits follow [`vertices`](Self::vertices): bit 0 selects +X,
	/// bit 1 +Y and bit 2 +Z.
	///
	/// Bounds are taken from `min`, [`center`](Self::center) and `max`, so
	/// siblings share faces exactly and the children tile the parent with
	/// the same split [`octant_of`](Self::octant_of) uses.
	pub fn octant(&self, octant: usize) -> Self {
		let c = self.center();
		let pick = |bit: usize, lo: f32, mid: f32, hi: f32| {
			if octant & bit != 0 {
				(mid, hi)
			} else {
				(lo, mid)
			}
		};
		let (min_x, max_x) = pick(1, self.min.x, c.x, self.max.x);
		let (min_y, max_y) = pick(2, self.min.y, c.y, self.max.y);
		let (min_z, max_z) = pick(4, self.min.z, c.z, self.max.z);
		Self {
			min: Vec3::new(min_x, min_y, min_z),
			max: Vec3::new(max_x, max_y, max_z),
		}
	}

	/// Octant of this box that `point` falls into, comparing against the center.
	#[inline]
	pub fn octant_of(&self, point: Vec3) -> usize {
		let c = self.center();
		(point.x >= c.x) as usize + 2 * (point.y >= c.y) as usize + 4 * (point.z >= c.z) as usize
	}

	/// Scale the box about its center.
	pub fn scaled(&self, factor: f32) -> Self {
		Self::from_center_half_extents(self.center(), self.half_extents() * factor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_new() {
		let aabb = Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -3.0));
		assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
	}

	#[test]
	fn test_from_center_half_extents() {
		let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(10.0));
		assert_eq!(aabb.min, Vec3::splat(-10.0));
		assert_eq!(aabb.max, Vec3::splat(10.0));
	}

	#[test]
	fn test_from_points() {
		let aabb = Aabb::from_points([
			Vec3::new(1.0, -1.0, 0.0),
			Vec3::new(-2.0, 3.0, 0.5),
			Vec3::new(0.0, 0.0, -4.0),
		])
		.expect("non-empty input");
		assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, -4.0));
		assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
		assert!(Aabb::from_points(std::iter::empty()).is_none());
	}

	#[test]
	fn test_validity() {
		assert!(Aabb::new(Vec3::ZERO, Vec3::ONE).is_valid());
		// Flat box: zero extent on Y
		assert!(!Aabb::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)).is_valid());
		assert!(!Aabb::invalid().is_valid());
	}

	#[test]
	fn test_contains_point() {
		let aabb = Aabb::new(Vec3::ZERO, Vec3::splat(10.0));

		// Inside
		assert!(aabb.contains_point(Vec3::splat(5.0)));

		// On boundary
		assert!(aabb.contains_point(Vec3::ZERO));
		assert!(aabb.contains_point(Vec3::splat(10.0)));

		// Outside
		assert!(!aabb.contains_point(Vec3::splat(-1.0)));
		assert!(!aabb.contains_point(Vec3::splat(11.0)));
	}

	#[test]
	fn test_size_and_center() {
		let aabb = Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 6.0));
		assert_eq!(aabb.half_extents(), Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(aabb.center(), Vec3::ZERO);
	}

	#[test]
	fn test_vertices_order() {
		let aabb = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
		let v = aabb.vertices();
		assert_eq!(v[0], aabb.min);
		assert_eq!(v[7], aabb.max);
		assert_eq!(v[1], Vec3::new(1.0, 0.0, 0.0));
		assert_eq!(v[2], Vec3::new(0.0, 2.0, 0.0));
		assert_eq!(v[4], Vec3::new(0.0, 0.0, 3.0));
	}

	/// Every octant is half the parent size and the 8 of them tile the parent.
	#[test]
	fn test_octants_tile_parent() {
		let parent = Aabb::new(Vec3::new(-4.0, 0.0, 2.0), Vec3::new(4.0, 2.0, 6.0));
		let mut volume = 0.0;
		for octant in 0..8 {
			let child = parent.octant(octant);
			assert_eq!(child.size(), parent.half_extents(), "octant {} size", octant);
			assert_eq!(
				parent.octant_of(child.center()),
				octant,
				"center of octant {} maps back to it",
				octant
			);
			let s = child.size();
			volume += s.x * s.y * s.z;
		}
		let s = parent.size();
		assert_eq!(volume, s.x * s.y * s.z);
	}

	/// Non-dyadic bounds: children still share exact faces with the parent
	/// and each other, and the octant picked for a point contains it.
	#[test]
	fn test_octants_share_exact_bounds() {
		let parent = Aabb::new(Vec3::new(-1.1, -0.7, -0.3), Vec3::new(2.3, 0.9, 0.1));
		let c = parent.center();

		assert_eq!(parent.octant(0).min, parent.min);
		assert_eq!(parent.octant(0).max, c);
		assert_eq!(parent.octant(7).min, c);
		assert_eq!(parent.octant(7).max, parent.max);

		let mut points: Vec<Vec3> = parent.vertices().to_vec();
		points.push(c);
		points.push(Vec3::new(c.x, parent.max.y, parent.min.z));
		points.push(Vec3::new(parent.max.x, c.y, 0.05));
		for p in points {
			let octant = parent.octant_of(p);
			assert!(
				parent.octant(octant).contains_point(p),
				"octant {} of {:?} must contain {:?}",
				octant,
				parent,
				p
			);
		}
	}

	#[test]
	fn test_scaled() {
		let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)).scaled(3.0);
		assert_eq!(aabb.min, Vec3::splat(-3.0));
		assert_eq!(aabb.max, Vec3::splat(3.0));
	}
}
