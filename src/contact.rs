//! Penalty contacts and static obstacles.
//!
//! Collisions are resolved with temporary springs (circle pairs, capsule
//! barriers) or by projecting onto the nearest surface (polygons). There is
//! no impulse or LCP solve.

use alloc::vec::Vec as AllocVec;

use crate::arena::{Arena, ParticleId};
use crate::bounds::Aabb;
use crate::config::Integrator;
use crate::float::Float;
use crate::particle::Particle;
use crate::spring::spring_force;
use crate::vec::{Vec, Vec2};

/// Stiffness and damping of the temporary contact springs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactParams<F: Float> {
    pub stiffness: F,
    pub damping: F,
}

impl<F: Float> ContactParams<F> {
    pub fn new(stiffness: F, damping: F) -> Self {
        ContactParams { stiffness, damping }
    }
}

/// Push apart every overlapping pair of circles.
///
/// Each unordered pair is visited once. Pairs whose bounding boxes overlap and
/// whose centres are closer than `ra + rb` get a one-shot spring with that
/// rest length. Returns the number of contacts resolved.
pub fn apply_circle_contacts<V: Vec>(
    particles: &mut Arena<Particle<V>>,
    integrator: Integrator,
    params: ContactParams<V::Scalar>,
) -> usize {
    let ids: AllocVec<ParticleId> = particles.ids();
    let mut contacts = 0;
    for (i, &ia) in ids.iter().enumerate() {
        for &ib in &ids[i + 1..] {
            let Some((pa, pb)) = particles.get_pair_mut(ia, ib) else {
                continue;
            };
            let box_a = Aabb::from_center_radius(pa.pos, pa.radius);
            let box_b = Aabb::from_center_radius(pb.pos, pb.radius);
            if !box_a.overlaps(&box_b) {
                continue;
            }
            let total = pa.radius + pb.radius;
            if pa.pos.distance(pb.pos) >= total {
                continue;
            }
            let f = spring_force(
                pa.pos,
                pa.velocity(integrator),
                pb.pos,
                pb.velocity(integrator),
                total,
                params.stiffness,
                params.damping,
            );
            pa.apply_force(f);
            pb.apply_force(-f);
            contacts += 1;
        }
    }
    contacts
}

/// A thick segment that particles bounce off.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Capsule<V: Vec> {
    pub a: V,
    pub b: V,
    pub radius: V::Scalar,
}

impl<V: Vec> Capsule<V> {
    pub fn new(a: V, b: V, radius: V::Scalar) -> Self {
        Capsule { a, b, radius }
    }

    /// Closest point to `p` on the core segment.
    pub fn closest_point(&self, p: V) -> V {
        let pa = p - self.a;
        let ba = self.b - self.a;
        let denom = ba.dot(ba);
        if denom == V::Scalar::zero() {
            return self.a;
        }
        let t = (pa.dot(ba) / denom).clamp(V::Scalar::zero(), V::Scalar::one());
        self.a + ba.scale(t)
    }

    /// Apply a penalty force if `particle` overlaps the capsule.
    ///
    /// The contact is a spring from the particle to a motionless stand-in at
    /// the closest segment point, with rest length `particle.radius +
    /// self.radius`. Only the moving particle receives a force.
    pub fn push(
        &self,
        particle: &mut Particle<V>,
        integrator: Integrator,
        params: ContactParams<V::Scalar>,
    ) -> bool {
        let closest = self.closest_point(particle.pos);
        let total = self.radius + particle.radius;
        if closest.distance(particle.pos) >= total {
            return false;
        }
        let f = spring_force(
            particle.pos,
            particle.velocity(integrator),
            closest,
            V::zero(),
            total,
            params.stiffness,
            params.damping,
        );
        particle.apply_force(f);
        true
    }

    /// Move whichever endpoint lies within `radius` of `p` onto `p`.
    pub fn drag_endpoint(&mut self, p: V) -> bool {
        let mut moved = false;
        if self.a.distance(p) < self.radius {
            self.a = p;
            moved = true;
        }
        if self.b.distance(p) < self.radius {
            self.b = p;
            moved = true;
        }
        moved
    }
}

/// Parameters `(t, u)` where segment `a-b` meets line `c-d`:
/// the hit is `a + (b - a) * t` and `c + (d - c) * u`.
///
/// Parallel lines divide by zero and return non-finite values.
pub fn line_intersection<F: Float>(a: Vec2<F>, b: Vec2<F>, c: Vec2<F>, d: Vec2<F>) -> (F, F) {
    let q = (a.x - b.x) * (c.y - d.y) - (a.y - b.y) * (c.x - d.x);
    let t = ((a.x - c.x) * (c.y - d.y) - (a.y - c.y) * (c.x - d.x)) / q;
    let u = ((b.x - a.x) * (a.y - c.y) - (b.y - a.y) * (a.x - c.x)) / q;
    (t, u)
}

/// Where a point inside a polygon gets pushed to.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceHit<F: Float> {
    /// Projection of the point onto the nearest edge line.
    pub point: Vec2<F>,
    /// Unit normal of that edge.
    pub normal: Vec2<F>,
    /// Signed distance from the point to the edge line.
    pub distance: F,
}

/// Static 2D obstacle given by a closed loop of vertices.
///
/// Vertices are stored in a local frame and placed in the world by a centre
/// and rotation. Convex and concave loops both work.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon<F: Float> {
    center: Vec2<F>,
    angle: F,
    local: AllocVec<Vec2<F>>,
    points: AllocVec<Vec2<F>>,
}

impl<F: Float> Polygon<F> {
    pub fn new(center: Vec2<F>, angle: F, local: AllocVec<Vec2<F>>) -> Self {
        let mut poly = Polygon { center, angle, points: AllocVec::with_capacity(local.len()), local };
        poly.update_points();
        poly
    }

    /// A `w` by `h` box rotated by `angle` around `center`.
    pub fn rectangle(center: Vec2<F>, w: F, h: F, angle: F) -> Self {
        let (hw, hh) = (w * F::half(), h * F::half());
        let local = alloc::vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ];
        Polygon::new(center, angle, local)
    }

    pub fn set_transform(&mut self, center: Vec2<F>, angle: F) {
        self.center = center;
        self.angle = angle;
        self.update_points();
    }

    fn update_points(&mut self) {
        self.points.clear();
        for m in &self.local {
            self.points.push(m.rotate(self.angle) + self.center);
        }
    }

    pub fn center(&self) -> Vec2<F> {
        self.center
    }

    /// World-space vertices.
    pub fn points(&self) -> &[Vec2<F>] {
        &self.points
    }

    /// World-space edges as `(start, end)` pairs, closing the loop.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2<F>, Vec2<F>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn aabb(&self) -> Aabb<Vec2<F>> {
        let mut min = Vec2::splat(F::infinity());
        let mut max = Vec2::splat(-F::infinity());
        for p in &self.points {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        Aabb::new(min, max)
    }

    /// Even-odd test with a ray cast toward +x.
    pub fn contains(&self, pt: Vec2<F>) -> bool {
        if !self.aabb().contains_point(pt) {
            return false;
        }
        let ray_end = pt + Vec2::new(F::one(), F::zero());
        let crossings = self
            .edges()
            .filter(|&(a, b)| {
                let (t, u) = line_intersection(a, b, pt, ray_end);
                t >= F::zero() && t <= F::one() && u >= F::zero()
            })
            .count();
        crossings % 2 == 1
    }

    /// Nearest edge of a point inside the polygon, or `None` when outside.
    pub fn closest_surface(&self, pt: Vec2<F>) -> Option<SurfaceHit<F>> {
        if !self.contains(pt) {
            return None;
        }
        let mut best: Option<(F, Vec2<F>, Vec2<F>)> = None;
        for (a, b) in self.edges() {
            let d = b - a;
            let dist = (d.x * (a.y - pt.y) - d.y * (a.x - pt.x)) / d.length();
            if best.map_or(true, |(record, _, _)| dist.abs() < record.abs()) {
                best = Some((dist, a, b));
            }
        }
        let (distance, a, b) = best?;
        let normal = (b - a).normalize().perp();
        Some(SurfaceHit { point: pt + normal.scale(distance), normal, distance })
    }

    /// Snap a particle inside the polygon onto its nearest edge and mirror its
    /// velocity about that edge's normal.
    pub fn resolve(&self, particle: &mut Particle<Vec2<F>>, integrator: Integrator) -> bool {
        if particle.locked {
            return false;
        }
        let Some(hit) = self.closest_surface(particle.pos) else {
            return false;
        };
        let reflected = particle.velocity(integrator).reflect(hit.normal);
        particle.pos = hit.point;
        particle.set_velocity(integrator, reflected);
        true
    }
}
