//! Axis-aligned boxes and particle boundary handling.

use crate::config::{BoundaryResponse, Integrator};
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec;

/// Axis-aligned bounding box in 2D or 3D.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb<V: Vec> {
    pub min: V,
    pub max: V,
}

impl<V: Vec> Aabb<V> {
    pub fn new(min: V, max: V) -> Self {
        Aabb { min, max }
    }

    /// Square/cube box of half-extent `radius` around `center`.
    pub fn from_center_radius(center: V, radius: V::Scalar) -> Self {
        let r = V::splat(radius);
        Aabb { min: center - r, max: center + r }
    }

    /// Inclusive on every face.
    pub fn contains_point(&self, pt: V) -> bool {
        (0..V::DIM).all(|a| {
            pt.component(a) >= self.min.component(a) && pt.component(a) <= self.max.component(a)
        })
    }

    /// Touching boxes count as overlapping.
    pub fn overlaps(&self, other: &Aabb<V>) -> bool {
        (0..V::DIM).all(|a| {
            self.min.component(a) <= other.max.component(a)
                && self.max.component(a) >= other.min.component(a)
        })
    }

    pub fn center(&self) -> V {
        (self.min + self.max).scale(V::Scalar::half())
    }

    pub fn size(&self) -> V {
        self.max - self.min
    }

    /// Keep a particle (inset by its radius) inside the box.
    ///
    /// A component is corrected when it lies beyond a face, or exactly on a
    /// face while moving outward. Once reflected, a particle sitting on the
    /// face with inward velocity is left untouched. Locked particles are
    /// skipped. Returns whether anything changed.
    pub fn constrain(
        &self,
        p: &mut Particle<V>,
        response: BoundaryResponse,
        integrator: Integrator,
    ) -> bool {
        if p.locked {
            return false;
        }
        let mut touched = false;
        for axis in 0..V::DIM {
            let lo = self.min.component(axis) + p.radius;
            let hi = self.max.component(axis) - p.radius;
            let pos = p.pos.component(axis);
            let vel = p.velocity(integrator).component(axis);
            let zero = V::Scalar::zero();

            let wall = if pos < lo || (pos == lo && vel < zero) {
                lo
            } else if pos > hi || (pos == hi && vel > zero) {
                hi
            } else {
                continue;
            };
            touched = true;

            match (response, integrator) {
                (BoundaryResponse::Reflect, Integrator::Euler) => {
                    *p.pos.component_mut(axis) = wall;
                    *p.vel.component_mut(axis) = -vel;
                }
                (BoundaryResponse::Reflect, Integrator::Verlet) => {
                    *p.pos.component_mut(axis) = wall;
                    *p.prev_pos.component_mut(axis) = wall + vel;
                }
                (BoundaryResponse::Clamp, _) => {
                    *p.pos.component_mut(axis) = wall;
                }
            }
        }
        touched
    }
}
