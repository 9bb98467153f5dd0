use charsim::contact::line_intersection;
use charsim::{
    apply_circle_contacts, Arena, Capsule, ContactParams, Integrator, Particle, Polygon, Vec2,
};
use charsim::vec::Vec;

const DT: f32 = 1.0 / 240.0;

fn params() -> ContactParams<f32> {
    ContactParams::new(200.0, 2.0)
}

#[test]
fn overlapping_circles_separate_with_equal_and_opposite_momentum() {
    let mut arena = Arena::new();
    let a = arena.insert(Particle::at(Vec2::new(0.0f32, 0.0)).with_radius(1.0));
    let b = arena.insert(Particle::at(Vec2::new(1.5, 0.2)).with_radius(1.0));

    for _ in 0..480 {
        apply_circle_contacts(&mut arena, Integrator::Euler, params());
        for p in arena.values_mut() {
            p.integrate(Integrator::Euler, DT, 1.0);
        }
        let (pa, pb) = (arena.get(a).unwrap(), arena.get(b).unwrap());
        let momentum = pa.vel.scale(pa.mass) + pb.vel.scale(pb.mass);
        assert!(momentum.length() < 1e-5, "net momentum {:?}", momentum);
    }

    let (pa, pb) = (arena.get(a).unwrap(), arena.get(b).unwrap());
    assert!(pa.pos.distance(pb.pos) >= 2.0, "still overlapping at {}", pa.pos.distance(pb.pos));
    assert!(pa.vel.x < 0.0 && pb.vel.x > 0.0);
    assert_eq!(apply_circle_contacts(&mut arena, Integrator::Euler, params()), 0);
}

#[test]
fn locked_circle_stays_put_while_the_other_is_pushed() {
    let mut arena = Arena::new();
    let wall = arena.insert(Particle::locked(Vec2::new(0.0f32, 0.0)).with_radius(1.0));
    let ball = arena.insert(Particle::at(Vec2::new(0.0, 1.0)).with_radius(1.0));

    for _ in 0..480 {
        apply_circle_contacts(&mut arena, Integrator::Euler, params());
        for p in arena.values_mut() {
            p.integrate(Integrator::Euler, DT, 1.0);
        }
    }

    assert_eq!(arena.get(wall).unwrap().pos, Vec2::new(0.0, 0.0));
    assert!(arena.get(ball).unwrap().pos.y >= 2.0);
}

#[test]
fn capsule_pushes_a_particle_clear_of_its_surface() {
    let cap = Capsule::new(Vec2::new(0.0f32, 0.0), Vec2::new(10.0, 0.0), 2.0);
    let mut p = Particle::at(Vec2::new(5.0f32, 1.0)).with_radius(1.0);

    for _ in 0..480 {
        cap.push(&mut p, Integrator::Euler, params());
        p.integrate(Integrator::Euler, DT, 1.0);
    }

    let clearance = cap.closest_point(p.pos).distance(p.pos);
    assert!(clearance >= 3.0, "clearance {}", clearance);
    assert!(p.vel.y > 0.0);
}

#[test]
fn polygon_ejects_a_particle_and_reflects_it_outward() {
    let poly = Polygon::rectangle(Vec2::new(0.0f32, 0.0), 10.0, 2.0, 0.0);
    let mut p = Particle::at(Vec2::new(1.0f32, -0.75)).with_velocity(Vec2::new(1.0, 2.0));
    assert!(poly.contains(p.pos));

    for _ in 0..24 {
        poly.resolve(&mut p, Integrator::Euler);
        p.integrate(Integrator::Euler, DT, 1.0);
    }

    assert!(!poly.contains(p.pos));
    assert!(p.pos.y < -1.0);
    assert!((p.vel - Vec2::new(1.0, -2.0)).length() < 1e-6, "velocity {:?}", p.vel);
}

#[test]
fn polygon_resolves_verlet_particles_through_prev_pos() {
    let poly = Polygon::rectangle(Vec2::new(0.0f32, 0.0), 10.0, 2.0, 0.0);
    let mut p = Particle::at(Vec2::new(1.0f32, 0.75));
    p.set_velocity(Integrator::Verlet, Vec2::new(0.0, -0.1));

    assert!(poly.resolve(&mut p, Integrator::Verlet));
    assert!((p.pos.y - 1.0).abs() < 1e-6);
    let v = p.velocity(Integrator::Verlet);
    assert!((v.y - 0.1).abs() < 1e-6, "velocity {:?}", v);
}

#[test]
fn segments_meet_at_their_midpoints() {
    let (t, u) = line_intersection(
        Vec2::new(0.0f32, 0.0),
        Vec2::new(2.0, 2.0),
        Vec2::new(0.0, 2.0),
        Vec2::new(2.0, 0.0),
    );
    assert!((t - 0.5).abs() < 1e-6);
    assert!((u - 0.5).abs() < 1e-6);

    let (t, _) = line_intersection(
        Vec2::new(0.0f32, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
    );
    assert!(!t.is_finite());
}
