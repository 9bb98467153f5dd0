use charsim::projection::resolve_all;
use charsim::{
    Aabb, BoundaryResponse, LatticeConfig, NoOpStepObserver, SoftBody3d, SolverConfig, Vec3,
};

fn bounded(gravity: Vec3<f32>) -> SolverConfig<Vec3<f32>> {
    let half = Vec3::new(0.5, 0.5, 0.5);
    SolverConfig::new()
        .with_gravity(gravity)
        .with_bounds(Aabb::new(-half, half), BoundaryResponse::Reflect)
        .with_iterations(1)
}

#[test]
fn lattice_has_closed_form_counts() {
    let body = SoftBody3d::<f32>::new(&LatticeConfig::new(4, 6, 4)).unwrap();
    assert_eq!(body.particle_count(), 96);
    assert_eq!(body.spring_count(), 752);
    assert_eq!(body.triangles().len(), 156);
}

#[test]
fn lattice_falls_and_stays_in_box() {
    let mut body = SoftBody3d::<f32>::new(&LatticeConfig::new(3, 4, 3)).unwrap();
    let config = bounded(Vec3::new(0.0, 4.0, 0.0));
    let start = body.centroid();
    for _ in 0..480 {
        body.step(1.0 / 240.0, &config, &mut NoOpStepObserver);
    }
    let end = body.centroid();
    assert!(end.y > start.y, "centroid should move with gravity");
    for p in body.system().particles().values() {
        let q = p.pos;
        assert!(q.x.abs() <= 0.5 && q.y.abs() <= 0.5 && q.z.abs() <= 0.5);
    }
}

#[test]
fn lattice_holds_its_shape() {
    let mut body = SoftBody3d::<f64>::new(&LatticeConfig::new(3, 3, 3)).unwrap();
    let config = SolverConfig::new().with_gravity(Vec3::new(0.0, 0.0, 0.0));
    // kick one corner
    let corner = body.id(0, 0, 0).unwrap();
    body.system_mut().particle_mut(corner).unwrap().vel = Vec3::new(-1.0, -1.0, -1.0);
    for _ in 0..600 {
        body.step(1.0 / 240.0, &config, &mut NoOpStepObserver);
    }
    let max_stretch = body
        .system()
        .springs()
        .iter()
        .filter_map(|s| s.extension(body.system().particles()))
        .fold(0.0f64, |m, e| m.max(e.abs()));
    assert!(max_stretch < 0.05, "springs stretched by {}", max_stretch);
}

#[test]
fn surface_resolves_against_live_particles() {
    let mut body = SoftBody3d::<f32>::new(&LatticeConfig::new(2, 2, 2)).unwrap();
    let tris = resolve_all(body.triangles(), body.system().particles());
    assert_eq!(tris.len(), 12);

    // triangles are views: moving a particle moves the face
    let id = body.id(1, 1, 1).unwrap();
    body.system_mut().move_particle(id, Vec3::new(1.0, 1.0, 1.0)).unwrap();
    let moved = resolve_all(body.triangles(), body.system().particles());
    assert!(moved.iter().any(|t| t.a == Vec3::new(1.0, 1.0, 1.0)
        || t.b == Vec3::new(1.0, 1.0, 1.0)
        || t.c == Vec3::new(1.0, 1.0, 1.0)));

    body.system_mut().remove_particle(id).unwrap();
    let remaining = resolve_all(body.triangles(), body.system().particles());
    assert!(remaining.len() < 12);
}

#[test]
fn surface_normals_face_into_the_body() {
    let body = SoftBody3d::<f64>::new(&LatticeConfig::new(3, 3, 3)).unwrap();
    let center = body.centroid();
    for t in resolve_all(body.triangles(), body.system().particles()) {
        let out = t.centroid() - center;
        let n = t.normal();
        let d = n.x * out.x + n.y * out.y + n.z * out.z;
        assert!(d < 0.0, "outward face {:?}", t);
    }
}

#[test]
fn spring_constants_reach_every_spring() {
    let config = LatticeConfig::new(2, 2, 2).with_springs(300.0, 2.0);
    let body = SoftBody3d::<f32>::new(&config).unwrap();
    assert!(body.system().springs().iter().all(|s| s.stiffness == 300.0 && s.damping == 2.0));
}
