//! Rope built from particles and rigid sticks.

use alloc::vec::Vec as AllocVec;

use crate::arena::ParticleId;
use crate::config::SolverConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::solver::ParticleSystem;
use crate::vec::Vec;

/// Configuration for creating a rope.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RopeConfig<F: Float> {
    pub particle_mass: F,
    pub particle_radius: F,
    /// Lock the first particle in place.
    pub lock_start: bool,
}

impl<F: Float> Default for RopeConfig<F> {
    fn default() -> Self {
        RopeConfig {
            particle_mass: F::one(),
            particle_radius: F::zero(),
            lock_start: true,
        }
    }
}

/// A chain of `segments + 1` particles joined end to end by sticks.
#[derive(Clone, Debug)]
pub struct Rope<V: Vec> {
    system: ParticleSystem<V>,
    ids: AllocVec<ParticleId>,
}

impl<V: Vec> Rope<V> {
    pub fn new(
        start: V,
        end: V,
        segments: usize,
        config: RopeConfig<V::Scalar>,
    ) -> Result<Self, PhysicsError> {
        if segments == 0 {
            return Err(PhysicsError::InsufficientSegments);
        }
        let mass = config.particle_mass;
        if mass <= V::Scalar::zero() || !mass.is_finite() {
            return Err(PhysicsError::InvalidMass);
        }

        let mut system = ParticleSystem::with_capacity(segments + 1);
        let mut ids = AllocVec::with_capacity(segments + 1);
        for i in 0..=segments {
            let t = V::Scalar::from_usize(i) / V::Scalar::from_usize(segments);
            let p = Particle::new(start.lerp(end, t), mass).with_radius(config.particle_radius);
            ids.push(system.add_particle(p));
        }
        if config.lock_start {
            if let Some(p) = system.particle_mut(ids[0]) {
                p.lock();
            }
        }
        for pair in ids.windows(2) {
            system.connect_stick(pair[0], pair[1])?;
        }

        Ok(Rope { system, ids })
    }

    pub fn ids(&self) -> &[ParticleId] {
        &self.ids
    }

    pub fn first(&self) -> ParticleId {
        self.ids[0]
    }

    pub fn last(&self) -> ParticleId {
        self.ids[self.ids.len() - 1]
    }

    /// Move the first particle, e.g. to follow the pointer.
    pub fn move_start(&mut self, pos: V) {
        if let Some(p) = self.system.particle_mut(self.ids[0]) {
            p.move_to(pos);
        }
    }

    /// Positions from start to end. Removed particles are skipped.
    pub fn positions(&self) -> AllocVec<V> {
        self.ids
            .iter()
            .filter_map(|&id| self.system.particle(id))
            .map(|p| p.pos)
            .collect()
    }

    /// Sum of current segment lengths.
    pub fn length(&self) -> V::Scalar {
        let pts = self.positions();
        pts.windows(2)
            .fold(V::Scalar::zero(), |acc, w| acc + w[0].distance(w[1]))
    }

    pub fn step<O: StepObserver>(&mut self, dt: V::Scalar, config: &SolverConfig<V>, observer: &mut O) {
        self.system.step(dt, config, observer);
    }

    pub fn system(&self) -> &ParticleSystem<V> {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ParticleSystem<V> {
        &mut self.system
    }

    pub fn len(&self) -> usize {
        self.system.particle_count()
    }

    pub fn is_empty(&self) -> bool {
        self.system.particle_count() == 0
    }

    pub fn segment_count(&self) -> usize {
        self.system.stick_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec2;

    #[test]
    fn builds_even_segments() {
        let rope = Rope::new(Vec2::new(0.0f32, 0.0), Vec2::new(10.0, 0.0), 5, RopeConfig::default()).unwrap();
        assert_eq!(rope.len(), 6);
        assert_eq!(rope.segment_count(), 5);
        assert!((rope.length() - 10.0).abs() < 1e-5);
        assert!(rope.system().particle(rope.first()).unwrap().locked);
    }

    #[test]
    fn zero_segments_is_an_error() {
        let r = Rope::new(Vec2::new(0.0f32, 0.0), Vec2::new(1.0, 0.0), 0, RopeConfig::default());
        assert_eq!(r.err(), Some(PhysicsError::InsufficientSegments));
    }
}
