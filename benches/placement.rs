//! Benchmarks for the per-frame placement hot paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{IVec3, Quat, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use cubefit::pieces::SOMA_SHAPES;
use cubefit::{InputSnapshot, Piece, PuzzleSession, Ray, ViewerBasis, VoxelGrid};

/// Benchmark snapping a continuous position to the nearest cell center.
fn bench_snap(c: &mut Criterion) {
    let grid = VoxelGrid::new(3, 3, 3, 1.0).unwrap();
    let point = Vec3::new(0.37, -0.81, 1.12);

    c.bench_function("snap", |b| b.iter(|| grid.snap(black_box(point))));
}

/// Benchmark mapping a rotated piece's cells to grid indices.
fn bench_occupied_indices(c: &mut Criterion) {
    let grid = VoxelGrid::new(3, 3, 3, 1.0).unwrap();
    let mut piece = Piece::new(1, "L", SOMA_SHAPES[1].1);
    piece.position = grid.index_to_world_center(IVec3::new(1, 1, 1));
    piece.rotation = Quat::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_2);

    c.bench_function("occupied_indices", |b| {
        b.iter(|| black_box(&piece).occupied_indices(&grid))
    });
}

/// Benchmark picking a piece out of the full set with a pointer ray.
fn bench_intersect_ray(c: &mut Criterion) {
    let pieces: Vec<Piece> = Piece::standard_set()
        .into_iter()
        .enumerate()
        .map(|(slot, mut piece)| {
            piece.position = Vec3::new(slot as f32 * 3.0, 0.0, 0.0);
            piece
        })
        .collect();
    let ray = Ray::new(Vec3::new(9.0, 0.0, 20.0), Vec3::NEG_Z);

    c.bench_function("intersect_ray_set", |b| {
        b.iter(|| {
            pieces
                .iter()
                .filter_map(|piece| piece.intersect_ray(black_box(&ray), 1.0))
                .count()
        })
    });
}

/// Benchmark a full select-drag-drop cycle for every piece in a session.
fn bench_place_all(c: &mut Criterion) {
    let viewer = ViewerBasis::looking_down_neg_z();
    let ray_through = |point: Vec3| Ray::new(point - viewer.forward * 50.0, viewer.forward);

    let mut group = c.benchmark_group("session");
    group.sample_size(50);
    group.bench_function("place_all_pieces", |b| {
        b.iter(|| {
            let grid = VoxelGrid::new(3, 3, 3, 1.0).unwrap();
            let mut session = PuzzleSession::new(grid);
            let mut rng = StdRng::seed_from_u64(17);
            session.new_puzzle(&mut rng);

            // cycle pivots along z so every drop is attempted, some rejected
            for slot in 0..7 {
                let target = session
                    .grid()
                    .index_to_world_center(IVec3::new(0, 0, (slot % 3) as i32));
                // stage clear of the grid on the target's z plane
                let staging = Vec3::new(10.0 + 3.0 * slot as f32, 0.0, target.z);
                session.pieces_mut()[slot].position = staging;
                session.pieces_mut()[slot].rotation = Quat::IDENTITY;

                let select = InputSnapshot {
                    pointer_ray: Some(ray_through(staging)),
                    pressed: true,
                    held: true,
                    ..Default::default()
                };
                session.tick(&select, &viewer, 0.016);

                let drag = InputSnapshot {
                    pointer_ray: Some(ray_through(target)),
                    held: true,
                    ..Default::default()
                };
                session.tick(&drag, &viewer, 0.016);

                let release = InputSnapshot {
                    released: true,
                    ..Default::default()
                };
                session.tick(&release, &viewer, 0.016);
            }
            black_box(session.grid().occupied_count())
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_snap,
    bench_occupied_indices,
    bench_intersect_ray,
    bench_place_all
);
criterion_main!(benches);
