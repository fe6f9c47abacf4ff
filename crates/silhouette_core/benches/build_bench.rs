//! Accelerator build benchmarks.
//!
//! Builds each accelerator over a UV sphere of increasing tessellation:
//! - **voxel_grid**: 16³ and 32³ voxels
//! - **octree**: top-down and bottom-up, depth 4 and 5
//! - **serial vs parallel**: same octree build with and without rayon

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use silhouette_core::{
  extract_edges, Aabb, BuildStrategy, EdgeTable, OctreeParams, OctreeSilhouettes, Triangle,
  VoxelGridParams, VoxelGridSilhouettes,
};

// =============================================================================
// Mesh
// =============================================================================

/// Closed latitude/longitude sphere, faces wound outward.
fn sphere(radius: f32, rings: usize, segments: usize) -> Vec<Triangle> {
  let point = |ring: usize, seg: usize| {
    // Exact poles so the fans close.
    if ring == 0 {
      return Vec3::Y * radius;
    }
    if ring == rings {
      return -Vec3::Y * radius;
    }
    let theta = std::f32::consts::PI * ring as f32 / rings as f32;
    let phi = std::f32::consts::TAU * (seg % segments) as f32 / segments as f32;
    Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()) * radius
  };
  let outward = |a: Vec3, b: Vec3, c: Vec3| {
    if (b - a).cross(c - a).dot(a + b + c) >= 0.0 {
      Triangle::new(a, b, c)
    } else {
      Triangle::new(a, c, b)
    }
  };

  let mut triangles = Vec::new();
  for ring in 0..rings {
    for seg in 0..segments {
      let (a, b) = (point(ring, seg), point(ring, seg + 1));
      let (c, d) = (point(ring + 1, seg), point(ring + 1, seg + 1));
      if ring != 0 {
        triangles.push(outward(a, b, d));
      }
      if ring + 1 != rings {
        triangles.push(outward(a, d, c));
      }
    }
  }
  triangles
}

fn light_space() -> Aabb {
  Aabb::new(Vec3::splat(-4.0), Vec3::splat(4.0))
}

fn sphere_edges(rings: usize) -> EdgeTable {
  extract_edges(&sphere(1.0, rings, rings * 2))
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_extract_edges(c: &mut Criterion) {
  let mut group = c.benchmark_group("extract_edges");
  for rings in [8, 16, 32] {
    let triangles = sphere(1.0, rings, rings * 2);
    group.bench_with_input(BenchmarkId::from_parameter(triangles.len()), &triangles, |b, t| {
      b.iter(|| extract_edges(black_box(t)))
    });
  }
  group.finish();
}

fn bench_voxel_grid_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("voxel_grid_build");
  group.sample_size(10);
  let edges = sphere_edges(8);

  for resolution in [16, 32] {
    let params = VoxelGridParams::default().with_resolution(resolution);
    group.bench_with_input(BenchmarkId::from_parameter(resolution), &params, |b, p| {
      b.iter(|| VoxelGridSilhouettes::new(black_box(&edges), light_space(), p))
    });
  }
  group.finish();
}

fn bench_octree_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("octree_build");
  group.sample_size(10);
  let edges = sphere_edges(8);

  for depth in [4, 5] {
    for strategy in [BuildStrategy::TopDown, BuildStrategy::BottomUp] {
      let params = OctreeParams::default()
        .with_max_depth(depth)
        .with_strategy(strategy);
      let id = BenchmarkId::new(format!("{:?}", strategy), depth);
      group.bench_with_input(id, &params, |b, p| {
        b.iter(|| OctreeSilhouettes::new(black_box(&edges), light_space(), p))
      });
    }
  }
  group.finish();
}

fn bench_parallel_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("octree_parallel");
  group.sample_size(10);
  let edges = sphere_edges(16);

  for parallel in [false, true] {
    let params = OctreeParams::default()
      .with_max_depth(5)
      .with_parallel(parallel);
    let id = BenchmarkId::from_parameter(if parallel { "rayon" } else { "serial" });
    group.bench_with_input(id, &params, |b, p| {
      b.iter(|| OctreeSilhouettes::new(black_box(&edges), light_space(), p))
    });
  }
  group.finish();
}

criterion_group!(
  benches,
  bench_extract_edges,
  bench_voxel_grid_build,
  bench_octree_build,
  bench_parallel_build
);
criterion_main!(benches);
