//! Particle system: arena-owned particles plus springs, sticks and a pointer
//! tether, stepped under one of two phase schedules.

use alloc::vec::Vec as AllocVec;

use crate::arena::{Arena, ParticleId};
use crate::config::{Schedule, SolverConfig};
use crate::constraint::{Stick, Tether};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::spring::Spring;
use crate::vec::Vec;

/// Point masses and the constraint network between them.
///
/// Springs and sticks refer to particles by [`ParticleId`]. Removing a
/// particle through [`ParticleSystem::remove_particle`] drops every constraint
/// touching it; a constraint whose end died some other way is skipped.
#[derive(Clone, Debug)]
pub struct ParticleSystem<V: Vec> {
    particles: Arena<Particle<V>>,
    springs: AllocVec<Spring<V>>,
    sticks: AllocVec<Stick<V>>,
    tether: Option<Tether<V>>,
}

impl<V: Vec> ParticleSystem<V> {
    pub fn new() -> Self {
        ParticleSystem {
            particles: Arena::new(),
            springs: AllocVec::new(),
            sticks: AllocVec::new(),
            tether: None,
        }
    }

    pub fn with_capacity(particles: usize) -> Self {
        ParticleSystem {
            particles: Arena::with_capacity(particles),
            springs: AllocVec::new(),
            sticks: AllocVec::new(),
            tether: None,
        }
    }

    pub fn add_particle(&mut self, particle: Particle<V>) -> ParticleId {
        self.particles.insert(particle)
    }

    /// Remove a particle along with every spring and stick attached to it.
    ///
    /// A tether holding the particle is released. Stale ids return `None`.
    pub fn remove_particle(&mut self, id: ParticleId) -> Option<Particle<V>> {
        let particle = self.particles.remove(id)?;
        let springs_before = self.springs.len();
        let sticks_before = self.sticks.len();
        self.springs.retain(|s| !s.involves(id));
        self.sticks.retain(|s| !s.involves(id));
        if self.tether.as_ref().is_some_and(|t| t.particle == id) {
            self.tether = None;
        }
        log::debug!(
            "removed particle {} with {} springs and {} sticks",
            id.index(),
            springs_before - self.springs.len(),
            sticks_before - self.sticks.len()
        );
        Some(particle)
    }

    /// Join two particles with a damped spring at their current distance.
    pub fn connect_spring(
        &mut self,
        a: ParticleId,
        b: ParticleId,
        stiffness: V::Scalar,
        damping: V::Scalar,
    ) -> Result<usize, PhysicsError> {
        let spring = Spring::from_particles(a, b, &self.particles, stiffness, damping)?;
        self.springs.push(spring);
        Ok(self.springs.len() - 1)
    }

    /// Join two particles with a rigid stick at their current distance.
    pub fn connect_stick(&mut self, a: ParticleId, b: ParticleId) -> Result<usize, PhysicsError> {
        let stick = Stick::from_particles(a, b, &self.particles)?;
        self.sticks.push(stick);
        Ok(self.sticks.len() - 1)
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle<V>> {
        self.particles.get(id)
    }

    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle<V>> {
        self.particles.get_mut(id)
    }

    pub fn particles(&self) -> &Arena<Particle<V>> {
        &self.particles
    }

    pub fn springs(&self) -> &[Spring<V>] {
        &self.springs
    }

    pub fn sticks(&self) -> &[Stick<V>] {
        &self.sticks
    }

    /// Nearest live particle strictly within `radius` of `point`.
    pub fn pick(&self, point: V, radius: V::Scalar) -> Option<ParticleId> {
        let mut best: Option<(ParticleId, V::Scalar)> = None;
        for (id, p) in self.particles.iter() {
            let d = p.pos.distance_sq(point);
            if d < radius * radius && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Flip the locked flag. Returns the new state.
    pub fn toggle_lock(&mut self, id: ParticleId) -> Result<bool, PhysicsError> {
        let p = self.particles.get_mut(id).ok_or(PhysicsError::StaleParticle(id))?;
        p.toggle_lock();
        Ok(p.locked)
    }

    /// Attach the pointer tether to `id`, replacing any previous grab.
    pub fn grab(&mut self, id: ParticleId, target: V, strength: V::Scalar) -> Result<(), PhysicsError> {
        if !self.particles.contains(id) {
            return Err(PhysicsError::StaleParticle(id));
        }
        self.tether = Some(Tether::new(id, target, strength));
        Ok(())
    }

    pub fn release(&mut self) {
        self.tether = None;
    }

    pub fn set_grab_target(&mut self, target: V) {
        if let Some(t) = self.tether.as_mut() {
            t.target = target;
        }
    }

    pub fn grabbed(&self) -> Option<ParticleId> {
        self.tether.as_ref().map(|t| t.particle)
    }

    /// Place a particle at `pos` with no velocity.
    pub fn move_particle(&mut self, id: ParticleId, pos: V) -> Result<(), PhysicsError> {
        let p = self.particles.get_mut(id).ok_or(PhysicsError::StaleParticle(id))?;
        p.move_to(pos);
        Ok(())
    }

    /// Re-capture the rest length of every spring and stick touching `id`.
    ///
    /// Used while editing a paused scene so dragged nodes keep their new shape.
    pub fn rebase_constraints(&mut self, id: ParticleId) {
        for s in self.springs.iter_mut().filter(|s| s.involves(id)) {
            s.rebase(&self.particles);
        }
        for s in self.sticks.iter_mut().filter(|s| s.involves(id)) {
            s.rebase(&self.particles);
        }
    }

    pub fn apply_acceleration(&mut self, accel: V) {
        for p in self.particles.values_mut() {
            p.apply_acceleration(accel);
        }
    }

    pub fn apply_force(&mut self, force: V) {
        for p in self.particles.values_mut() {
            p.apply_force(force);
        }
    }

    /// Advance the system by `dt`, split into `config.sub_steps` sub-steps.
    ///
    /// [`Schedule::ForcesFirst`]: springs, tether, gravity and drag,
    /// integrate, then `iterations` rounds of sticks and bounds (at least one).
    ///
    /// [`Schedule::ConstraintsFirst`]: one stick pass, springs, tether,
    /// gravity and drag, integrate, bounds. The tether and drag use the full
    /// frame `dt` here; only integration uses the sub-step.
    pub fn step<O: StepObserver>(&mut self, dt: V::Scalar, config: &SolverConfig<V>, observer: &mut O) {
        let sub_steps = config.sub_steps.max(1);
        let sub_dt = dt / V::Scalar::from_usize(sub_steps);

        for _sub in 0..sub_steps {
            match config.schedule {
                Schedule::ForcesFirst => self.forces_first(sub_dt, config, observer),
                Schedule::ConstraintsFirst => self.constraints_first(sub_dt, dt, config, observer),
            }
        }

        observer.on_step_complete();
    }

    fn forces_first<O: StepObserver>(&mut self, dt: V::Scalar, config: &SolverConfig<V>, observer: &mut O) {
        self.apply_springs(config);
        self.apply_tether(config, dt);
        for p in self.particles.values_mut() {
            p.apply_acceleration(config.gravity);
            p.apply_drag(config.integrator, config.drag, dt);
            p.integrate(config.integrator, dt, config.damping);
        }
        observer.on_integrate();

        for i in 0..config.iterations.max(1) {
            self.solve_sticks();
            self.constrain_bounds(config);
            observer.on_constraint_iteration(i);
        }
    }

    fn constraints_first<O: StepObserver>(
        &mut self,
        sub_dt: V::Scalar,
        frame_dt: V::Scalar,
        config: &SolverConfig<V>,
        observer: &mut O,
    ) {
        self.solve_sticks();
        observer.on_constraint_iteration(0);

        self.apply_springs(config);
        self.apply_tether(config, frame_dt);
        for p in self.particles.values_mut() {
            p.apply_acceleration(config.gravity);
            p.apply_drag(config.integrator, config.drag, frame_dt);
            p.integrate(config.integrator, sub_dt, config.damping);
        }
        observer.on_integrate();
        self.constrain_bounds(config);
    }

    fn apply_springs(&mut self, config: &SolverConfig<V>) {
        for s in &self.springs {
            s.apply(&mut self.particles, config.integrator);
        }
    }

    fn apply_tether(&mut self, config: &SolverConfig<V>, dt: V::Scalar) {
        if let Some(t) = &self.tether {
            t.apply(&mut self.particles, config.integrator, dt);
        }
    }

    fn solve_sticks(&mut self) {
        for s in &self.sticks {
            s.solve(&mut self.particles);
        }
    }

    fn constrain_bounds(&mut self, config: &SolverConfig<V>) {
        if let Some(bounds) = &config.bounds {
            for p in self.particles.values_mut() {
                bounds.constrain(p, config.boundary, config.integrator);
            }
        }
    }

    /// Positions of all live particles, in slot order.
    pub fn positions(&self) -> AllocVec<V> {
        self.particles.values().map(|p| p.pos).collect()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn stick_count(&self) -> usize {
        self.sticks.len()
    }

    /// Drop every particle and constraint. Outstanding ids go stale.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.springs.clear();
        self.sticks.clear();
        self.tether = None;
    }
}

impl<V: Vec> Default for ParticleSystem<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb;
    use crate::config::{BoundaryResponse, Integrator};
    use crate::observer::NoOpStepObserver;
    use crate::vec::Vec2;

    fn v(x: f32, y: f32) -> Vec2<f32> {
        Vec2::new(x, y)
    }

    #[test]
    fn removing_particle_drops_its_constraints() {
        let mut sys = ParticleSystem::new();
        let a = sys.add_particle(Particle::at(v(0.0, 0.0)));
        let b = sys.add_particle(Particle::at(v(1.0, 0.0)));
        let c = sys.add_particle(Particle::at(v(2.0, 0.0)));
        sys.connect_spring(a, b, 10.0, 0.1).unwrap();
        sys.connect_stick(b, c).unwrap();
        sys.connect_stick(a, c).unwrap();
        sys.grab(b, v(5.0, 5.0), 10.0).unwrap();

        assert!(sys.remove_particle(b).is_some());
        assert_eq!(sys.spring_count(), 0);
        assert_eq!(sys.stick_count(), 1);
        assert_eq!(sys.grabbed(), None);
        assert!(sys.particle(b).is_none());
        assert!(sys.remove_particle(b).is_none());
    }

    #[test]
    fn connect_rejects_bad_ids() {
        let mut sys: ParticleSystem<Vec2<f32>> = ParticleSystem::new();
        let a = sys.add_particle(Particle::at(v(0.0, 0.0)));
        let b = sys.add_particle(Particle::at(v(1.0, 0.0)));
        assert_eq!(sys.connect_stick(a, a), Err(PhysicsError::SelfConnection(a)));
        sys.remove_particle(b);
        assert_eq!(sys.connect_spring(a, b, 1.0, 0.0), Err(PhysicsError::StaleParticle(b)));
        assert_eq!(sys.toggle_lock(b), Err(PhysicsError::StaleParticle(b)));
    }

    #[test]
    fn pick_returns_nearest_within_radius() {
        let mut sys = ParticleSystem::new();
        let _a = sys.add_particle(Particle::at(v(0.0, 0.0)));
        let b = sys.add_particle(Particle::at(v(2.0, 0.0)));
        assert_eq!(sys.pick(v(1.6, 0.0), 2.5), Some(b));
        assert_eq!(sys.pick(v(10.0, 0.0), 2.5), None);
    }

    #[test]
    fn toggle_lock_round_trips() {
        let mut sys = ParticleSystem::new();
        let a = sys.add_particle(Particle::at(v(0.0, 0.0)));
        assert_eq!(sys.toggle_lock(a), Ok(true));
        assert_eq!(sys.toggle_lock(a), Ok(false));
    }

    #[test]
    fn verlet_falls_under_gravity() {
        let mut sys = ParticleSystem::new();
        let a = sys.add_particle(Particle::at(v(0.0, 0.0)));
        let config = SolverConfig::new()
            .with_integrator(Integrator::Verlet)
            .with_gravity(v(0.0, 10.0));
        for _ in 0..10 {
            sys.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
        }
        assert!(sys.particle(a).unwrap().pos.y > 0.0);
    }

    #[test]
    fn bounds_hold_particles_in_box() {
        let mut sys = ParticleSystem::new();
        let a = sys.add_particle(Particle::at(v(5.0, 9.0)).with_radius(1.0));
        let config = SolverConfig::new()
            .with_gravity(v(0.0, 100.0))
            .with_bounds(Aabb::new(v(0.0, 0.0), v(10.0, 10.0)), BoundaryResponse::Reflect);
        for _ in 0..30 {
            sys.step(1.0 / 30.0, &config, &mut NoOpStepObserver);
            assert!(sys.particle(a).unwrap().pos.y <= 9.0);
        }
    }

    #[test]
    fn tether_drags_particle_toward_target() {
        let mut sys = ParticleSystem::new();
        let a = sys.add_particle(Particle::at(v(0.0, 0.0)));
        sys.grab(a, v(10.0, 0.0), 5.0).unwrap();
        let config = SolverConfig::new()
            .with_integrator(Integrator::Verlet)
            .with_schedule(Schedule::ConstraintsFirst)
            .with_sub_steps(4);
        sys.step(0.1, &config, &mut NoOpStepObserver);
        let x = sys.particle(a).unwrap().pos.x;
        assert!(x > 0.0 && x < 10.0);
    }

    #[test]
    fn rebase_keeps_dragged_shape() {
        let mut sys = ParticleSystem::new();
        let a = sys.add_particle(Particle::at(v(0.0, 0.0)));
        let b = sys.add_particle(Particle::at(v(1.0, 0.0)));
        sys.connect_stick(a, b).unwrap();
        sys.move_particle(b, v(3.0, 0.0)).unwrap();
        sys.rebase_constraints(b);
        assert_eq!(sys.sticks()[0].rest_length, 3.0);
    }
}
