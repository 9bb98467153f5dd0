//! Configuration types for the particle solver and the fluid grid.

use crate::bounds::Aabb;
use crate::float::Float;
use crate::vec::Vec;

/// Time integration scheme shared by every particle in a system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Semi-implicit Euler with explicit velocity. Pairs with penalty springs.
    #[default]
    Euler,
    /// Position Verlet with implicit velocity. Pairs with stick constraints.
    Verlet,
}

/// Order of the per-substep phases.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Schedule {
    /// Springs, gravity and drag, integrate, then `iterations` rounds of
    /// stick relaxation and boundary clamping.
    #[default]
    ForcesFirst,
    /// One stick pass, springs, tether, gravity and drag, integrate, then a
    /// single boundary pass.
    ConstraintsFirst,
}

/// What happens to a particle that leaves the simulation box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BoundaryResponse {
    /// Clamp the position and negate the offending velocity component.
    /// With Verlet the implicit velocity is mirrored through `prev_pos`.
    #[default]
    Reflect,
    /// Clamp the position only; Verlet `prev_pos` is left alone.
    Clamp,
}

/// Configuration for [`crate::solver::ParticleSystem::step`].
///
/// # Builder Pattern
/// ```
/// use charsim::config::{Integrator, SolverConfig};
/// use charsim::vec::Vec2;
///
/// let config: SolverConfig<Vec2<f32>> = SolverConfig::new()
///     .with_integrator(Integrator::Verlet)
///     .with_iterations(10)
///     .with_gravity(Vec2::new(0.0, 32.0))
///     .with_sub_steps(4);
/// ```
#[derive(Clone, Debug)]
pub struct SolverConfig<V: Vec> {
    /// Stick relaxation rounds per sub-step. Default: 10.
    pub iterations: usize,
    /// Gravity acceleration vector. Default: zero.
    pub gravity: V,
    /// Verlet velocity retention per step. 1.0 keeps all of it. Default: 1.0.
    pub damping: V::Scalar,
    /// Velocity-proportional drag coefficient. Default: 0.
    pub drag: V::Scalar,
    /// Sub-steps per frame; `dt` is split evenly. Default: 1.
    pub sub_steps: usize,
    pub integrator: Integrator,
    pub schedule: Schedule,
    /// Optional simulation box.
    pub bounds: Option<Aabb<V>>,
    pub boundary: BoundaryResponse,
}

impl<V: Vec> SolverConfig<V> {
    pub fn new() -> Self {
        SolverConfig {
            iterations: 10,
            gravity: V::zero(),
            damping: V::Scalar::one(),
            drag: V::Scalar::zero(),
            sub_steps: 1,
            integrator: Integrator::Euler,
            schedule: Schedule::ForcesFirst,
            bounds: None,
            boundary: BoundaryResponse::Reflect,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_gravity(mut self, gravity: V) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_damping(mut self, damping: V::Scalar) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_drag(mut self, drag: V::Scalar) -> Self {
        self.drag = drag;
        self
    }

    /// Set the number of sub-steps (at least 1).
    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_bounds(mut self, bounds: Aabb<V>, response: BoundaryResponse) -> Self {
        self.bounds = Some(bounds);
        self.boundary = response;
        self
    }
}

impl<V: Vec> Default for SolverConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`crate::fluid::FluidGrid`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FluidConfig<F: Float> {
    /// Density diffusion rate. Default: 0.001.
    pub diffusion: F,
    /// Kinematic viscosity. Default: 0.001.
    pub viscosity: F,
    /// Gauss-Seidel sweeps for diffusion and pressure. Default: 20.
    pub iterations: usize,
    /// Exponential density decay per second. Default: 0.
    pub fade: F,
}

impl<F: Float> FluidConfig<F> {
    pub fn new() -> Self {
        FluidConfig {
            diffusion: F::from_f32(0.001),
            viscosity: F::from_f32(0.001),
            iterations: 20,
            fade: F::zero(),
        }
    }

    pub fn with_diffusion(mut self, diffusion: F) -> Self {
        self.diffusion = diffusion;
        self
    }

    pub fn with_viscosity(mut self, viscosity: F) -> Self {
        self.viscosity = viscosity;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_fade(mut self, fade: F) -> Self {
        self.fade = fade;
        self
    }
}

impl<F: Float> Default for FluidConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec2;

    #[test]
    fn sub_steps_never_drop_to_zero() {
        let config: SolverConfig<Vec2<f32>> = SolverConfig::new().with_sub_steps(0);
        assert_eq!(config.sub_steps, 1);
    }

    #[test]
    fn builders_set_fields() {
        let bounds = Aabb::new(Vec2::zero(), Vec2::new(8.0f32, 4.0));
        let config = SolverConfig::new()
            .with_damping(0.99)
            .with_drag(0.09)
            .with_bounds(bounds, BoundaryResponse::Clamp);
        assert_eq!(config.damping, 0.99);
        assert_eq!(config.drag, 0.09);
        assert_eq!(config.bounds, Some(bounds));
        assert_eq!(config.boundary, BoundaryResponse::Clamp);

        let fluid = FluidConfig::<f32>::default().with_diffusion(0.5).with_viscosity(0.25);
        assert_eq!((fluid.diffusion, fluid.viscosity, fluid.iterations), (0.5, 0.25, 20));
    }
}
