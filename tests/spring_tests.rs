use charsim::{
    spring_force, Arena, Integrator, NoOpStepObserver, Particle, ParticleSystem, SolverConfig,
    Spring, Vec, Vec2, Vec3,
};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -100.0f32..100.0
}

fn vec2() -> impl Strategy<Value = Vec2<f32>> {
    (coord(), coord()).prop_map(|(x, y)| Vec2::new(x, y))
}

fn vec3() -> impl Strategy<Value = Vec3<f32>> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    #[test]
    fn spring_forces_sum_to_zero(
        pa in vec2(), pb in vec2(), va in vec2(), vb in vec2(),
        rest in 0.0f32..50.0, k in 0.0f32..1000.0, c in 0.0f32..10.0,
    ) {
        let mut arena = Arena::new();
        let a = arena.insert(Particle::at(pa).with_velocity(va));
        let b = arena.insert(Particle::at(pb).with_velocity(vb));
        let spring = Spring::new(a, b, rest, k, c);
        spring.apply(&mut arena, Integrator::Euler).unwrap();

        let fa = arena.get(a).unwrap().acceleration;
        let fb = arena.get(b).unwrap().acceleration;
        let sum = fa + fb;
        prop_assert_eq!(sum, Vec2::zero());
    }

    #[test]
    fn spring_force_is_antisymmetric_in_3d(
        pa in vec3(), pb in vec3(), va in vec3(), vb in vec3(),
        rest in 0.0f32..50.0, k in 0.0f32..1000.0, c in 0.0f32..10.0,
    ) {
        let on_a = spring_force(pa, va, pb, vb, rest, k, c);
        let on_b = spring_force(pb, vb, pa, va, rest, k, c);
        let tol = 1e-3 * (1.0 + on_a.length());
        prop_assert!((on_a + on_b).length() <= tol);
    }

    #[test]
    fn normalize_is_unit_or_zero(v in vec3()) {
        let n = v.normalize();
        if v.length() == 0.0 {
            prop_assert_eq!(n, Vec3::zero());
        } else {
            prop_assert!((n.length() - 1.0).abs() < 1e-4);
        }
    }
}

#[test]
fn normalize_zero_vector_is_zero() {
    assert_eq!(Vec2::<f32>::zero().normalize(), Vec2::zero());
    assert_eq!(Vec3::<f64>::zero().normalize(), Vec3::zero());
}

#[test]
fn coincident_spring_ends_produce_no_force() {
    let f = spring_force(
        Vec2::new(1.0f32, 1.0),
        Vec2::new(3.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::zero(),
        2.0,
        100.0,
        5.0,
    );
    assert_eq!(f, Vec2::zero());
}

#[test]
fn rest_length_is_captured_at_creation() {
    let mut sys = ParticleSystem::new();
    let a = sys.add_particle(Particle::at(Vec2::new(0.0f32, 0.0)));
    let b = sys.add_particle(Particle::at(Vec2::new(3.0, 4.0)));
    sys.connect_spring(a, b, 50.0, 1.0).unwrap();
    assert_eq!(sys.springs()[0].rest_length, 5.0);
}

#[test]
fn stretched_pair_oscillates_about_rest() {
    let mut sys = ParticleSystem::new();
    let a = sys.add_particle(Particle::at(Vec2::new(0.0f64, 0.0)));
    let b = sys.add_particle(Particle::at(Vec2::new(1.0, 0.0)));
    sys.connect_spring(a, b, 20.0, 1.0).unwrap();
    sys.move_particle(b, Vec2::new(2.0, 0.0)).unwrap();

    let config = SolverConfig::new();
    let mut min_len = f64::INFINITY;
    for _ in 0..600 {
        sys.step(1.0 / 120.0, &config, &mut NoOpStepObserver);
        let len = sys.springs()[0].current_length(sys.particles()).unwrap();
        min_len = min_len.min(len);
    }
    let len = sys.springs()[0].current_length(sys.particles()).unwrap();
    assert!(min_len < 1.0, "spring never compressed: {}", min_len);
    assert!((len - 1.0).abs() < 0.1, "did not settle near rest: {}", len);

    // momentum is conserved, so the midpoint stays put
    let mid = (sys.particle(a).unwrap().pos + sys.particle(b).unwrap().pos) * 0.5;
    assert!((mid.x - 1.0).abs() < 1e-6);
}

#[test]
fn springs_to_dead_particles_are_skipped() {
    let mut arena = Arena::new();
    let a = arena.insert(Particle::at(Vec2::new(0.0f32, 0.0)));
    let b = arena.insert(Particle::at(Vec2::new(1.0, 0.0)));
    let spring = Spring::new(a, b, 0.5, 10.0, 0.0);
    arena.remove(b);
    assert_eq!(spring.apply(&mut arena, Integrator::Euler), None);
    assert_eq!(arena.get(a).unwrap().acceleration, Vec2::zero());
}
