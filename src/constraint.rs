//! Position constraints: rigid sticks and the pointer tether.

use crate::arena::{Arena, ParticleId};
use crate::config::Integrator;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec;

/// Inextensible distance constraint solved by direct position correction.
///
/// Each end moves half of the error along the axis (equal mass assumption).
/// A locked end skips its half, so a stick hanging from a locked particle
/// closes only half of its error per pass and relies on repeated relaxation.
#[derive(Clone, Debug, PartialEq)]
pub struct Stick<V: Vec> {
    pub a: ParticleId,
    pub b: ParticleId,
    pub rest_length: V::Scalar,
}

impl<V: Vec> Stick<V> {
    pub fn new(a: ParticleId, b: ParticleId, rest_length: V::Scalar) -> Self {
        Stick { a, b, rest_length }
    }

    /// Build a stick holding the current distance between `a` and `b`.
    pub fn from_particles(
        a: ParticleId,
        b: ParticleId,
        particles: &Arena<Particle<V>>,
    ) -> Result<Self, PhysicsError> {
        if a == b {
            return Err(PhysicsError::SelfConnection(a));
        }
        let pa = particles.get(a).ok_or(PhysicsError::StaleParticle(a))?;
        let pb = particles.get(b).ok_or(PhysicsError::StaleParticle(b))?;
        Ok(Stick::new(a, b, pa.pos.distance(pb.pos)))
    }

    pub fn involves(&self, id: ParticleId) -> bool {
        self.a == id || self.b == id
    }

    /// One relaxation pass. Returns false if either end is gone.
    ///
    /// Coincident endpoints divide by zero and poison both positions with
    /// NaN; the solver does not guard against it.
    pub fn solve(&self, particles: &mut Arena<Particle<V>>) -> bool {
        let Some((pa, pb)) = particles.get_pair_mut(self.a, self.b) else {
            return false;
        };
        let axis = pa.pos - pb.pos;
        let dist = axis.length();
        let n = axis.divide(dist);
        let delta = self.rest_length - dist;
        let correction = n.scale(delta * V::Scalar::half());
        if !pa.locked {
            pa.pos += correction;
        }
        if !pb.locked {
            pb.pos -= correction;
        }
        true
    }

    /// Absolute deviation from the rest length.
    pub fn error(&self, particles: &Arena<Particle<V>>) -> Option<V::Scalar> {
        let pa = particles.get(self.a)?;
        let pb = particles.get(self.b)?;
        Some((pa.pos.distance(pb.pos) - self.rest_length).abs())
    }

    pub fn rebase(&mut self, particles: &Arena<Particle<V>>) {
        if let (Some(pa), Some(pb)) = (particles.get(self.a), particles.get(self.b)) {
            self.rest_length = pa.pos.distance(pb.pos);
        }
    }
}

/// Pulls one particle toward a pointer position.
#[derive(Clone, Debug, PartialEq)]
pub struct Tether<V: Vec> {
    pub particle: ParticleId,
    pub target: V,
    /// Fraction of the gap closed per second.
    pub strength: V::Scalar,
}

impl<V: Vec> Tether<V> {
    pub fn new(particle: ParticleId, target: V, strength: V::Scalar) -> Self {
        Tether { particle, target, strength }
    }

    /// `pos += (target - pos) * strength * dt`, then drop the particle's
    /// velocity so the pull does not accumulate into momentum.
    pub fn apply(
        &self,
        particles: &mut Arena<Particle<V>>,
        integrator: Integrator,
        dt: V::Scalar,
    ) -> bool {
        let Some(p) = particles.get_mut(self.particle) else {
            return false;
        };
        let pull = (self.target - p.pos).scale(self.strength * dt);
        p.pos += pull;
        match integrator {
            Integrator::Euler => p.vel = V::zero(),
            Integrator::Verlet => p.prev_pos = p.pos,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec2;

    fn pair(a: Vec2<f32>, b: Vec2<f32>) -> (Arena<Particle<Vec2<f32>>>, ParticleId, ParticleId) {
        let mut arena = Arena::new();
        let ia = arena.insert(Particle::at(a));
        let ib = arena.insert(Particle::at(b));
        (arena, ia, ib)
    }

    #[test]
    fn single_pass_restores_free_pair() {
        let (mut arena, a, b) = pair(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        let stick = Stick::new(a, b, 2.0);
        assert!(stick.solve(&mut arena));
        assert_eq!(arena.get(a).unwrap().pos, Vec2::new(1.0, 0.0));
        assert_eq!(arena.get(b).unwrap().pos, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn locked_end_skips_its_half() {
        let (mut arena, a, b) = pair(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        arena.get_mut(a).unwrap().lock();
        let stick = Stick::new(a, b, 2.0);
        stick.solve(&mut arena);
        assert_eq!(arena.get(a).unwrap().pos, Vec2::zero());
        assert_eq!(arena.get(b).unwrap().pos, Vec2::new(3.0, 0.0));
        assert_eq!(stick.error(&arena), Some(1.0));
    }

    #[test]
    fn coincident_ends_go_nan() {
        let (mut arena, a, b) = pair(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        Stick::new(a, b, 1.0).solve(&mut arena);
        assert!(!arena.get(a).unwrap().pos.is_finite());
    }

    #[test]
    fn tether_pulls_and_kills_velocity() {
        let mut arena = Arena::new();
        let id = arena.insert(Particle::at(Vec2::new(0.0f32, 0.0)).with_velocity(Vec2::new(5.0, 5.0)));
        let tether = Tether::new(id, Vec2::new(10.0, 0.0), 2.0);
        assert!(tether.apply(&mut arena, Integrator::Euler, 0.25));
        let p = arena.get(id).unwrap();
        assert_eq!(p.pos, Vec2::new(5.0, 0.0));
        assert_eq!(p.vel, Vec2::zero());
    }
}
