//! Damped penalty springs between two particles.

use crate::arena::{Arena, ParticleId};
use crate::config::Integrator;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec;

/// Force on particle A for a damped spring from A to B.
///
/// `f = k * (|b - a| - rest) + c * dot(dir, vel_b - vel_a)` along
/// `dir = normalize(b - a)`. A stretched spring pulls A toward B. Particle B
/// receives the exact negation, so the pair always sums to zero.
///
/// A zero-length spring has `dir = 0` and produces no force.
pub fn spring_force<V: Vec>(
    pos_a: V,
    vel_a: V,
    pos_b: V,
    vel_b: V,
    rest_length: V::Scalar,
    stiffness: V::Scalar,
    damping: V::Scalar,
) -> V {
    let sub = pos_b - pos_a;
    let dir = sub.normalize();
    let fs = stiffness * (sub.length() - rest_length);
    let fd = dir.dot(vel_b - vel_a) * damping;
    dir.scale(fs + fd)
}

/// A spring joining two particles by id.
///
/// The rest length is the distance the particles had when the spring was
/// built; it is not a design parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring<V: Vec> {
    pub a: ParticleId,
    pub b: ParticleId,
    pub rest_length: V::Scalar,
    pub stiffness: V::Scalar,
    pub damping: V::Scalar,
}

impl<V: Vec> Spring<V> {
    pub fn new(
        a: ParticleId,
        b: ParticleId,
        rest_length: V::Scalar,
        stiffness: V::Scalar,
        damping: V::Scalar,
    ) -> Self {
        Spring { a, b, rest_length, stiffness, damping }
    }

    /// Build a spring whose rest length is the current distance between `a`
    /// and `b`.
    pub fn from_particles(
        a: ParticleId,
        b: ParticleId,
        particles: &Arena<Particle<V>>,
        stiffness: V::Scalar,
        damping: V::Scalar,
    ) -> Result<Self, PhysicsError> {
        if a == b {
            return Err(PhysicsError::SelfConnection(a));
        }
        let pa = particles.get(a).ok_or(PhysicsError::StaleParticle(a))?;
        let pb = particles.get(b).ok_or(PhysicsError::StaleParticle(b))?;
        Ok(Spring::new(a, b, pa.pos.distance(pb.pos), stiffness, damping))
    }

    pub fn involves(&self, id: ParticleId) -> bool {
        self.a == id || self.b == id
    }

    /// Accumulate the spring force on both ends.
    ///
    /// Returns the force applied to A (B received its negation), or `None`
    /// when either end no longer exists.
    pub fn apply(&self, particles: &mut Arena<Particle<V>>, integrator: Integrator) -> Option<V> {
        let (pa, pb) = particles.get_pair_mut(self.a, self.b)?;
        let f = spring_force(
            pa.pos,
            pa.velocity(integrator),
            pb.pos,
            pb.velocity(integrator),
            self.rest_length,
            self.stiffness,
            self.damping,
        );
        pa.apply_force(f);
        pb.apply_force(-f);
        Some(f)
    }

    pub fn current_length(&self, particles: &Arena<Particle<V>>) -> Option<V::Scalar> {
        let pa = particles.get(self.a)?;
        let pb = particles.get(self.b)?;
        Some(pa.pos.distance(pb.pos))
    }

    /// Signed stretch beyond the rest length.
    pub fn extension(&self, particles: &Arena<Particle<V>>) -> Option<V::Scalar> {
        self.current_length(particles).map(|len| len - self.rest_length)
    }

    /// Capture the current distance as the new rest length.
    pub fn rebase(&mut self, particles: &Arena<Particle<V>>) {
        if let Some(len) = self.current_length(particles) {
            self.rest_length = len;
        }
    }
}
