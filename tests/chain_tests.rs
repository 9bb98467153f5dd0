use charsim::{Integrator, NoOpStepObserver, PhysicsError, Rope, RopeConfig, SolverConfig, Vec2};
use charsim::Vec;

fn rope(segments: usize) -> Rope<Vec2<f32>> {
    Rope::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0), segments, RopeConfig::default()).unwrap()
}

fn verlet() -> SolverConfig<Vec2<f32>> {
    SolverConfig::new()
        .with_integrator(Integrator::Verlet)
        .with_gravity(Vec2::new(0.0, -9.81))
        .with_iterations(8)
        .with_sub_steps(2)
}

#[test]
fn rope_correct_particle_count() {
    let r = rope(10);
    assert_eq!(r.len(), 11); // segments + 1
    assert_eq!(r.segment_count(), 10);
}

#[test]
fn rope_swings_under_gravity() {
    let mut r = rope(10);
    let config = verlet();
    for _ in 0..120 {
        r.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
    }

    let start = r.system().particle(r.first()).unwrap().pos;
    let end = r.system().particle(r.last()).unwrap().pos;
    assert_eq!(start, Vec2::new(0.0, 10.0));
    assert!(end.y < start.y, "end should drop below the locked start");
}

#[test]
fn rope_keeps_its_length() {
    let mut r = rope(10);
    let config = verlet();
    for _ in 0..240 {
        r.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
    }
    let len = r.length();
    assert!((len - 10.0).abs() < 0.5, "rope stretched to {}", len);
}

#[test]
fn moving_the_start_drags_the_rope() {
    let mut r = rope(5);
    let config = verlet().with_gravity(Vec2::zero());
    r.move_start(Vec2::new(3.0, 14.0));
    for _ in 0..60 {
        r.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
    }
    let positions = r.positions();
    assert_eq!(positions[0], Vec2::new(3.0, 14.0));
    assert!(positions[1].distance(positions[0]) < 2.1);
}

#[test]
fn removed_particle_splits_rope() {
    let mut r = rope(4);
    let mid = r.ids()[2];
    r.system_mut().remove_particle(mid).unwrap();
    assert_eq!(r.segment_count(), 2);
    assert_eq!(r.positions().len(), 4);
}

#[test]
fn invalid_ropes_are_rejected() {
    let zero = Rope::<Vec2<f32>>::new(Vec2::zero(), Vec2::new(1.0, 0.0), 0, RopeConfig::default());
    assert_eq!(zero.err(), Some(PhysicsError::InsufficientSegments));
    let massless = RopeConfig { particle_mass: 0.0, ..RopeConfig::default() };
    let r = Rope::<Vec2<f32>>::new(Vec2::zero(), Vec2::new(1.0, 0.0), 3, massless);
    assert_eq!(r.err(), Some(PhysicsError::InvalidMass));
}

#[test]
fn log_observer_counts_whole_steps() {
    let mut r = rope(4);
    let mut observer = charsim::LogStepObserver::new();
    for _ in 0..7 {
        r.step(1.0 / 60.0, &verlet(), &mut observer);
    }
    assert_eq!(observer.steps(), 7);
}
