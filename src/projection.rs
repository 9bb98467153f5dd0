//! Yaw/pitch projection, back-face culling, painter's sort and flat shading
//! for drawing 3D meshes into a [`Raster`].

use alloc::vec::Vec as AllocVec;
use core::cmp::Ordering;

use crate::arena::{Arena, ParticleId};
use crate::bounds::Aabb;
use crate::float::Float;
use crate::particle::Particle;
use crate::raster::Raster;
use crate::vec::{Vec, Vec2, Vec3};

/// Shading ramp from darkest to brightest.
pub const ASCII_RAMP: [char; 7] = ['.', ',', '~', '=', '#', '&', '@'];

/// Pseudo-orthographic camera.
///
/// Screen coordinates are
/// `x = sin(yaw) * px - cos(yaw) * pz` and
/// `y = (cos(yaw) * px + sin(yaw) * pz) * cos(pitch) + sin(pitch) * py`,
/// both scaled by `zoom` and offset by `center`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera<F: Float> {
    pub yaw: F,
    pub pitch: F,
    pub zoom: F,
    pub center: Vec2<F>,
}

impl<F: Float> Camera<F> {
    pub fn new(yaw: F, pitch: F, zoom: F, center: Vec2<F>) -> Self {
        Camera { yaw, pitch, zoom, center }
    }

    pub fn project(&self, p: Vec3<F>) -> Vec2<F> {
        let (sy, cy) = (self.yaw.sin(), self.yaw.cos());
        let (sp, cp) = (self.pitch.sin(), self.pitch.cos());
        let x = sy * p.x - cy * p.z;
        let y = (cy * p.x + sy * p.z) * cp + sp * p.y;
        Vec2::new(x * self.zoom + self.center.x, y * self.zoom + self.center.y)
    }

    /// Point `distance` along the depth axis, screen x crossed with screen y.
    ///
    /// It sits behind the scene as seen on screen, so culling inward-facing
    /// normals against it keeps the faces nearest the viewer.
    pub fn orbit_position(&self, distance: F) -> Vec3<F> {
        let (sy, cy) = (self.yaw.sin(), self.yaw.cos());
        let (sp, cp) = (self.pitch.sin(), self.pitch.cos());
        Vec3::new(cy * sp, -cp, sy * sp) * distance
    }

    /// Turn the camera. Pitch stays within `[-pi, 0]`.
    pub fn orbit(&mut self, d_yaw: F, d_pitch: F) {
        self.yaw = self.yaw + d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-F::pi(), F::zero());
    }

    /// Change zoom, never below 1.
    pub fn zoom_by(&mut self, dz: F) {
        self.zoom = (self.zoom + dz).max(F::one());
    }
}

/// A resolved triangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle<F: Float> {
    pub a: Vec3<F>,
    pub b: Vec3<F>,
    pub c: Vec3<F>,
}

impl<F: Float> Triangle<F> {
    pub fn new(a: Vec3<F>, b: Vec3<F>, c: Vec3<F>) -> Self {
        Triangle { a, b, c }
    }

    /// Unit normal of `(b - a) x (c - a)`; zero for degenerate triangles.
    pub fn normal(&self) -> Vec3<F> {
        (self.b - self.a).cross(self.c - self.a).normalize()
    }

    pub fn centroid(&self) -> Vec3<F> {
        (self.a + self.b + self.c) / F::from_f32(3.0)
    }

    /// Faces the eye when `dot(normal, a - eye) < 0`.
    pub fn faces(&self, eye: Vec3<F>) -> bool {
        self.normal().dot(self.a - eye) < F::zero()
    }
}

/// Triangle over three particles, resolved against the arena each frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TriangleRef {
    pub a: ParticleId,
    pub b: ParticleId,
    pub c: ParticleId,
}

impl TriangleRef {
    pub fn new(a: ParticleId, b: ParticleId, c: ParticleId) -> Self {
        TriangleRef { a, b, c }
    }

    /// Current vertex positions, or `None` if any particle is gone.
    pub fn resolve<F: Float>(&self, particles: &Arena<Particle<Vec3<F>>>) -> Option<Triangle<F>> {
        Some(Triangle::new(
            particles.get(self.a)?.pos,
            particles.get(self.b)?.pos,
            particles.get(self.c)?.pos,
        ))
    }
}

/// Resolve every reference, dropping triangles with dead vertices.
pub fn resolve_all<F: Float>(
    refs: &[TriangleRef],
    particles: &Arena<Particle<Vec3<F>>>,
) -> AllocVec<Triangle<F>> {
    refs.iter().filter_map(|t| t.resolve(particles)).collect()
}

/// Front-facing triangles ordered far to near from `eye`.
///
/// The sort is stable, so equally distant triangles keep their input order.
pub fn visible_sorted<F, I>(triangles: I, eye: Vec3<F>) -> AllocVec<Triangle<F>>
where
    F: Float,
    I: IntoIterator<Item = Triangle<F>>,
{
    let mut visible: AllocVec<(F, Triangle<F>)> = triangles
        .into_iter()
        .filter(|t| t.faces(eye))
        .map(|t| (t.centroid().distance(eye), t))
        .collect();
    visible.sort_by(|l, r| r.0.partial_cmp(&l.0).unwrap_or(Ordering::Equal));
    visible.into_iter().map(|(_, t)| t).collect()
}

/// Ramp index for a face lit by a unit `light` direction:
/// `dot(normal, light) * levels`, clamped to `[0, levels - 1]` and truncated.
pub fn shade_index<F: Float>(normal: Vec3<F>, light: Vec3<F>, levels: usize) -> usize {
    if levels == 0 {
        return 0;
    }
    let top = F::from_usize(levels - 1);
    let s = (normal.dot(light) * F::from_usize(levels)).clamp(F::zero(), top);
    if s.is_finite() {
        s.floor().to_f32() as usize
    } else {
        0
    }
}

/// How [`render_mesh`] draws each face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshStyle<F: Float> {
    /// Unit light direction.
    pub light: Vec3<F>,
    /// Characters from dark to bright.
    pub ramp: &'static [char],
    /// Character for triangle outlines; `None` draws fills only.
    pub outline: Option<char>,
}

impl<F: Float> MeshStyle<F> {
    pub fn new(light: Vec3<F>) -> Self {
        MeshStyle { light: light.normalize(), ramp: &ASCII_RAMP, outline: None }
    }

    pub fn with_outline(mut self, outline: Option<char>) -> Self {
        self.outline = outline;
        self
    }
}

/// Painter's-algorithm mesh draw. Returns the number of faces drawn.
pub fn render_mesh<F, I>(
    raster: &mut Raster,
    camera: &Camera<F>,
    eye: Vec3<F>,
    style: &MeshStyle<F>,
    triangles: I,
) -> usize
where
    F: Float,
    I: IntoIterator<Item = Triangle<F>>,
{
    let faces = visible_sorted(triangles, eye);
    for t in &faces {
        let idx = shade_index(t.normal(), style.light, style.ramp.len());
        if let Some(&ch) = style.ramp.get(idx) {
            raster.set_char(ch);
        }
        let (a, b, c) = (camera.project(t.a), camera.project(t.b), camera.project(t.c));
        raster.fill_triangle_vec(a, b, c);
        if let Some(ch) = style.outline {
            raster.set_char(ch);
            raster.draw_triangle_vec(a, b, c);
        }
    }
    faces.len()
}

/// Draw the twelve edges of a box with the current pen.
pub fn draw_box_wireframe<F: Float>(raster: &mut Raster, camera: &Camera<F>, bounds: &Aabb<Vec3<F>>) {
    let (n, x) = (bounds.min, bounds.max);
    let corner = |i: usize| {
        camera.project(Vec3::new(
            if i & 1 == 0 { n.x } else { x.x },
            if i & 2 == 0 { n.y } else { x.y },
            if i & 4 == 0 { n.z } else { x.z },
        ))
    };
    for i in 0..8usize {
        for bit in [1usize, 2, 4] {
            if i & bit == 0 {
                raster.draw_line_vec(corner(i), corner(i | bit));
            }
        }
    }
}
