//! Benchmarks for picking and editing
//!
//! Run with: cargo bench --bench editing_benchmark

use cgmath::{Point3, Vector3};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nuum::grid::{create_grid, raycast, set_voxel, GridDescriptor, Ray, VoxelGridData, VoxelPos};
use nuum::tools::{use_brush, ToolAction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn filled_grid(dim: u32) -> VoxelGridData {
    let mut grid = create_grid(&GridDescriptor {
        width: dim,
        height: dim,
        depth: dim,
        brick_size: Some(8),
    })
    .expect("valid grid");

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..(dim * dim) {
        let pos = VoxelPos::new(
            rng.gen_range(0..dim as i32),
            rng.gen_range(0..dim as i32),
            rng.gen_range(0..dim as i32),
        );
        set_voxel(&mut grid, pos, rng.gen_range(1..=16) as f32 / 255.0);
    }
    grid
}

fn benchmark_raycast(c: &mut Criterion) {
    let mut group = c.benchmark_group("raycast");

    for dim in [16u32, 64, 128] {
        let grid = filled_grid(dim);
        let mut rng = StdRng::seed_from_u64(42);
        let rays: Vec<Ray> = (0..256)
            .map(|_| {
                let target = Point3::new(
                    rng.gen_range(-0.4..0.4) * dim as f32,
                    rng.gen_range(0.1..0.9) * dim as f32,
                    rng.gen_range(-0.4..0.4) * dim as f32,
                );
                let origin = Point3::new(0.0, dim as f32 * 0.5, dim as f32 * 2.0);
                Ray::new(origin, target - origin)
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(dim), &rays, |b, rays| {
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 1) % rays.len();
                black_box(raycast(&grid, &rays[i], 1.0, 0.5))
            });
        });
    }

    group.finish();
}

fn benchmark_brush(c: &mut Criterion) {
    let mut group = c.benchmark_group("brush_stroke");
    let base = filled_grid(64);

    for radius in [1u32, 4, 6] {
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            let mut grid = base.clone();
            let mut z = 0i32;
            b.iter(|| {
                z = (z + 1) % 64;
                let hit = nuum::HitInfo {
                    voxel: VoxelPos::new(32, 32, z),
                    face: None,
                    palette_value: 0.0,
                    is_edge_hit: true,
                };
                let action = if z % 2 == 0 { ToolAction::Primary } else { ToolAction::Secondary };
                black_box(use_brush(&mut grid, &hit, radius, 3.0 / 255.0, action))
            });
        });
    }

    group.finish();
}

fn benchmark_empty_traversal(c: &mut Criterion) {
    let grid = create_grid(&GridDescriptor {
        width: 128,
        height: 128,
        depth: 128,
        brick_size: Some(8),
    })
    .expect("valid grid");
    let ray = Ray::new(Point3::new(0.3, 64.2, -200.0), Vector3::new(0.01, 0.0, 1.0));

    c.bench_function("raycast_empty_128", |b| {
        b.iter(|| black_box(raycast(&grid, black_box(&ray), 1.0, 0.5)))
    });
}

criterion_group!(benches, benchmark_raycast, benchmark_brush, benchmark_empty_traversal);
criterion_main!(benches);
