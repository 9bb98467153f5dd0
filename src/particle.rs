//! Point masses driven by either semi-implicit Euler or Verlet integration.

use crate::config::Integrator;
use crate::float::Float;
use crate::vec::Vec;

/// A point mass.
///
/// Carries both an explicit velocity (used by [`Integrator::Euler`]) and a
/// previous position (used by [`Integrator::Verlet`], where velocity is
/// implicit in `pos - prev_pos`). A system picks one scheme for all of its
/// particles.
#[derive(Clone, Debug)]
pub struct Particle<V: Vec> {
    pub pos: V,
    pub prev_pos: V,
    pub vel: V,
    pub acceleration: V,
    pub mass: V::Scalar,
    pub inv_mass: V::Scalar,
    pub radius: V::Scalar,
    pub locked: bool,
}

fn inverse_mass<F: Float>(mass: F) -> F {
    if mass.is_near_zero(F::from_f32(1e-10)) {
        F::zero()
    } else {
        F::one() / mass
    }
}

impl<V: Vec> Particle<V> {
    pub fn new(pos: V, mass: V::Scalar) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            vel: V::zero(),
            acceleration: V::zero(),
            mass,
            inv_mass: inverse_mass(mass),
            radius: V::Scalar::zero(),
            locked: false,
        }
    }

    /// A unit-mass particle, the default throughout the demos.
    pub fn at(pos: V) -> Self {
        Self::new(pos, V::Scalar::one())
    }

    /// A particle that never moves under forces or integration.
    pub fn locked(pos: V) -> Self {
        let mut p = Self::at(pos);
        p.locked = true;
        p
    }

    pub fn with_radius(mut self, radius: V::Scalar) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_velocity(mut self, vel: V) -> Self {
        self.vel = vel;
        self
    }

    /// Accumulate a force; converted to acceleration through the inverse mass.
    pub fn apply_force(&mut self, force: V) {
        if !self.locked {
            self.acceleration += force.scale(self.inv_mass);
        }
    }

    pub fn apply_acceleration(&mut self, accel: V) {
        if !self.locked {
            self.acceleration += accel;
        }
    }

    /// `vel += acc*dt; pos += vel*dt; acc = 0`.
    pub fn integrate_euler(&mut self, dt: V::Scalar) {
        self.prev_pos = self.pos;
        if !self.locked {
            self.vel += self.acceleration.scale(dt);
            self.pos += self.vel.scale(dt);
        }
        self.acceleration = V::zero();
    }

    /// `prev = pos; pos += (pos - prev) * damping + acc*dt*dt; acc = 0`.
    ///
    /// Locked particles still refresh `prev_pos` so they carry no implicit
    /// velocity once unlocked.
    pub fn integrate_verlet(&mut self, dt: V::Scalar, damping: V::Scalar) {
        let velocity = (self.pos - self.prev_pos).scale(damping);
        self.prev_pos = self.pos;
        if !self.locked {
            self.pos += velocity + self.acceleration.scale(dt * dt);
        }
        self.acceleration = V::zero();
    }

    pub fn integrate(&mut self, integrator: Integrator, dt: V::Scalar, damping: V::Scalar) {
        match integrator {
            Integrator::Euler => self.integrate_euler(dt),
            Integrator::Verlet => self.integrate_verlet(dt, damping),
        }
    }

    /// Velocity as seen by the given scheme.
    ///
    /// For Verlet this is the per-step displacement, which is what the spring
    /// damping term consumes.
    pub fn velocity(&self, integrator: Integrator) -> V {
        match integrator {
            Integrator::Euler => self.vel,
            Integrator::Verlet => self.pos - self.prev_pos,
        }
    }

    /// Velocity-proportional drag.
    pub fn apply_drag(&mut self, integrator: Integrator, drag: V::Scalar, dt: V::Scalar) {
        if self.locked || drag == V::Scalar::zero() {
            return;
        }
        match integrator {
            Integrator::Euler => {
                let f = self.vel.scale(-drag);
                self.apply_force(f);
            }
            Integrator::Verlet => {
                let implied = self.pos - self.prev_pos;
                self.prev_pos += implied.scale(dt * drag);
            }
        }
    }

    /// Set a scheme-appropriate velocity.
    pub fn set_velocity(&mut self, integrator: Integrator, vel: V) {
        match integrator {
            Integrator::Euler => self.vel = vel,
            Integrator::Verlet => self.prev_pos = self.pos - vel,
        }
    }

    /// Move to `pos` carrying no velocity.
    pub fn move_to(&mut self, pos: V) {
        self.pos = pos;
        self.prev_pos = pos;
        self.vel = V::zero();
    }

    pub fn lock(&mut self) {
        self.locked = true;
        self.prev_pos = self.pos;
        self.vel = V::zero();
        self.acceleration = V::zero();
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn toggle_lock(&mut self) {
        if self.locked { self.unlock() } else { self.lock() }
    }
}
