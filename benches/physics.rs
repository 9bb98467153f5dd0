//! Benchmarks for the charsim solvers and rasterizer.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use charsim::projection::{render_mesh, resolve_all};
use charsim::*;

fn bench_cloth(c: &mut Criterion) {
    c.bench_function("cloth_20x16_60_steps", |b| {
        b.iter(|| {
            let config = GridConfig::<f32>::new(20, 16)
                .with_extent(Vec2::new(10.0, 2.0), Vec2::new(80.0, 30.0));
            let mut cloth = SpringGrid::new(&config).unwrap();
            cloth.lock_top_corners();
            let solver = SolverConfig::new().with_gravity(Vec2::new(0.0, 32.0));
            for _ in 0..60 {
                cloth.step(1.0 / 120.0, &solver, &mut NoOpStepObserver);
            }
            cloth.system().positions()
        });
    });
}

fn bench_rope(c: &mut Criterion) {
    c.bench_function("rope_50_segments_60_steps", |b| {
        b.iter(|| {
            let mut rope = Rope::new(
                Vec2::new(0.0f32, 10.0),
                Vec2::new(10.0, 10.0),
                50,
                RopeConfig::default(),
            )
            .unwrap();
            let config = SolverConfig::new()
                .with_integrator(Integrator::Verlet)
                .with_gravity(Vec2::new(0.0, -9.81))
                .with_iterations(8);
            for _ in 0..60 {
                rope.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
            }
            rope.positions()
        });
    });
}

fn bench_lattice(c: &mut Criterion) {
    c.bench_function("lattice_4x6x4_60_steps", |b| {
        let half = Vec3::new(0.5f32, 0.5, 0.5);
        let config = SolverConfig::new()
            .with_gravity(Vec3::new(0.0, 4.0, 0.0))
            .with_bounds(Aabb::new(-half, half), BoundaryResponse::Reflect)
            .with_iterations(1)
            .with_sub_steps(4);
        b.iter(|| {
            let mut body = SoftBody3d::new(&LatticeConfig::new(4, 6, 4)).unwrap();
            for _ in 0..60 {
                body.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
            }
            body.centroid()
        });
    });
}

fn bench_fluid(c: &mut Criterion) {
    c.bench_function("fluid_64x32_step", |b| {
        let mut fluid = FluidGrid::<f32>::new(64, 32, FluidConfig::new()).unwrap();
        b.iter(|| {
            fluid.add_density_source(8, 16, 100.0);
            fluid.add_velocity_source(8, 16, 40.0, 0.0);
            fluid.step(black_box(1.0 / 30.0), &mut NoOpStepObserver);
        });
    });
}

fn bench_render(c: &mut Criterion) {
    c.bench_function("render_lattice_120x60", |b| {
        let body = SoftBody3d::<f32>::new(&LatticeConfig::new(4, 6, 4)).unwrap();
        let camera = Camera::new(2.074755, -1.060102, 40.0, Vec2::new(60.0, 30.0));
        let style = MeshStyle::new(Vec3::new(1.0, -1.0, 1.0));
        let mut raster = Raster::new(120, 60);
        b.iter(|| {
            raster.clear();
            let tris = resolve_all(body.triangles(), body.system().particles());
            render_mesh(&mut raster, &camera, camera.orbit_position(5.0), &style, tris)
        });
    });
}

criterion_group!(benches, bench_cloth, bench_rope, bench_lattice, bench_fluid, bench_render);
criterion_main!(benches);
