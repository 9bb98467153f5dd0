//! 3D spring lattice soft body with a renderable surface.

use alloc::vec::Vec as AllocVec;

use crate::arena::ParticleId;
use crate::config::SolverConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::projection::TriangleRef;
use crate::solver::ParticleSystem;
use crate::vec::Vec3;

/// Configuration for a spring lattice.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatticeConfig<F: Float> {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    /// Corner of the body with the smallest coordinates.
    pub min: Vec3<F>,
    /// Opposite corner.
    pub max: Vec3<F>,
    pub stiffness: F,
    pub damping: F,
    pub particle_mass: F,
}

impl<F: Float> LatticeConfig<F> {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        let (sx, sy) = (F::from_f32(0.1667), F::from_f32(0.3333));
        LatticeConfig {
            width,
            height,
            depth,
            min: Vec3::new(-sx, -sy, -sx),
            max: Vec3::new(sx, sy, sx),
            stiffness: F::from_f32(1220.67),
            damping: F::from_f32(4.83),
            particle_mass: F::one(),
        }
    }

    pub fn with_bounds(mut self, min: Vec3<F>, max: Vec3<F>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_springs(mut self, stiffness: F, damping: F) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
        self
    }

    pub fn with_particle_mass(mut self, mass: F) -> Self {
        self.particle_mass = mass;
        self
    }
}

/// A `width` x `height` x `depth` block of particles.
///
/// Every particle connects to its axis neighbours, to the face diagonals on
/// each of the three planes, and to the four body diagonals of each cube. The
/// outer faces are covered by two triangles per cell with normals facing into
/// the body, the orientation [`crate::projection::render_mesh`] culls against.
#[derive(Clone, Debug)]
pub struct SoftBody3d<F: Float> {
    system: ParticleSystem<Vec3<F>>,
    ids: AllocVec<ParticleId>,
    triangles: AllocVec<TriangleRef>,
    width: usize,
    height: usize,
    depth: usize,
}

/// Flat index of lattice cell `(x, y, z)`.
pub fn lattice_index(x: usize, y: usize, z: usize, width: usize, depth: usize) -> usize {
    x + z * width + y * width * depth
}

impl<F: Float> SoftBody3d<F> {
    pub fn new(config: &LatticeConfig<F>) -> Result<Self, PhysicsError> {
        let (w, h, d) = (config.width, config.height, config.depth);
        if w < 2 || h < 2 || d < 2 {
            return Err(PhysicsError::InvalidLatticeDimensions { width: w, height: h, depth: d });
        }
        let mass = config.particle_mass;
        if mass <= F::zero() || !mass.is_finite() {
            return Err(PhysicsError::InvalidMass);
        }

        let mut system = ParticleSystem::with_capacity(w * h * d);
        let mut slots: AllocVec<Option<ParticleId>> = alloc::vec![None; w * h * d];
        let span = config.max - config.min;
        for x in 0..w {
            for y in 0..h {
                for z in 0..d {
                    let pos = Vec3::new(
                        config.min.x + span.x * F::from_usize(x) / F::from_usize(w - 1),
                        config.min.y + span.y * F::from_usize(y) / F::from_usize(h - 1),
                        config.min.z + span.z * F::from_usize(z) / F::from_usize(d - 1),
                    );
                    slots[lattice_index(x, y, z, w, d)] =
                        Some(system.add_particle(Particle::new(pos, mass)));
                }
            }
        }
        let ids: AllocVec<ParticleId> = slots.into_iter().flatten().collect();

        let ix = |x: usize, y: usize, z: usize| ids[lattice_index(x, y, z, w, d)];
        let (k, c) = (config.stiffness, config.damping);
        let mut spring = |a: ParticleId, b: ParticleId| system.connect_spring(a, b, k, c).map(|_| ());

        // axis aligned
        for x in 0..w {
            for y in 0..h {
                for z in 0..d {
                    if x < w - 1 { spring(ix(x, y, z), ix(x + 1, y, z))?; }
                    if y < h - 1 { spring(ix(x, y, z), ix(x, y + 1, z))?; }
                    if z < d - 1 { spring(ix(x, y, z), ix(x, y, z + 1))?; }
                }
            }
        }
        // yz face diagonals
        for x in 0..w {
            for y in 0..h - 1 {
                for z in 0..d - 1 {
                    spring(ix(x, y, z), ix(x, y + 1, z + 1))?;
                    spring(ix(x, y, z + 1), ix(x, y + 1, z))?;
                }
            }
        }
        // zx face diagonals
        for y in 0..h {
            for z in 0..d - 1 {
                for x in 0..w - 1 {
                    spring(ix(x, y, z), ix(x + 1, y, z + 1))?;
                    spring(ix(x + 1, y, z), ix(x, y, z + 1))?;
                }
            }
        }
        // xy face diagonals
        for z in 0..d {
            for x in 0..w - 1 {
                for y in 0..h - 1 {
                    spring(ix(x, y, z), ix(x + 1, y + 1, z))?;
                    spring(ix(x + 1, y, z), ix(x, y + 1, z))?;
                }
            }
        }
        // body diagonals
        for x in 0..w - 1 {
            for y in 0..h - 1 {
                for z in 0..d - 1 {
                    spring(ix(x, y, z), ix(x + 1, y + 1, z + 1))?;
                    spring(ix(x, y, z + 1), ix(x + 1, y + 1, z))?;
                    spring(ix(x, y + 1, z), ix(x + 1, y, z + 1))?;
                    spring(ix(x, y + 1, z + 1), ix(x + 1, y, z))?;
                }
            }
        }

        let triangles = surface(&ids, w, h, d);
        log::debug!(
            "built {}x{}x{} lattice: {} particles, {} springs, {} surface triangles",
            w,
            h,
            d,
            system.particle_count(),
            system.spring_count(),
            triangles.len()
        );
        Ok(SoftBody3d { system, ids, triangles, width: w, height: h, depth: d })
    }

    pub fn id(&self, x: usize, y: usize, z: usize) -> Option<ParticleId> {
        if x >= self.width || y >= self.height || z >= self.depth {
            return None;
        }
        self.ids.get(lattice_index(x, y, z, self.width, self.depth)).copied()
    }

    /// Surface triangles as views over particle ids. Resolve them against the
    /// particle arena each frame; they never cache positions.
    pub fn triangles(&self) -> &[TriangleRef] {
        &self.triangles
    }

    /// Mean particle position.
    pub fn centroid(&self) -> Vec3<F> {
        let mut sum = Vec3::new(F::zero(), F::zero(), F::zero());
        let mut n = 0usize;
        for p in self.system.particles().values() {
            sum += p.pos;
            n += 1;
        }
        if n == 0 { sum } else { sum / F::from_usize(n) }
    }

    pub fn step<O: StepObserver>(&mut self, dt: F, config: &SolverConfig<Vec3<F>>, observer: &mut O) {
        self.system.step(dt, config, observer);
    }

    pub fn system(&self) -> &ParticleSystem<Vec3<F>> {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ParticleSystem<Vec3<F>> {
        &mut self.system
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    pub fn particle_count(&self) -> usize { self.system.particle_count() }
    pub fn spring_count(&self) -> usize { self.system.spring_count() }
}

/// Two triangles per boundary cell on each of the six faces.
fn surface(ids: &[ParticleId], w: usize, h: usize, d: usize) -> AllocVec<TriangleRef> {
    let ix = |x: usize, y: usize, z: usize| ids[lattice_index(x, y, z, w, d)];
    let tri = |a, b, c| TriangleRef::new(a, b, c);
    let mut tris = AllocVec::new();

    // x = 0 and x = w - 1
    for y in 0..h - 1 {
        for z in 0..d - 1 {
            tris.push(tri(ix(0, y, z), ix(0, y + 1, z), ix(0, y, z + 1)));
            tris.push(tri(ix(0, y + 1, z), ix(0, y + 1, z + 1), ix(0, y, z + 1)));
            tris.push(tri(ix(w - 1, y, z), ix(w - 1, y + 1, z + 1), ix(w - 1, y + 1, z)));
            tris.push(tri(ix(w - 1, y, z), ix(w - 1, y, z + 1), ix(w - 1, y + 1, z + 1)));
        }
    }
    // y = 0 and y = h - 1
    for z in 0..d - 1 {
        for x in 0..w - 1 {
            tris.push(tri(ix(x, 0, z), ix(x, 0, z + 1), ix(x + 1, 0, z)));
            tris.push(tri(ix(x, 0, z + 1), ix(x + 1, 0, z + 1), ix(x + 1, 0, z)));
            tris.push(tri(ix(x, h - 1, z), ix(x + 1, h - 1, z + 1), ix(x, h - 1, z + 1)));
            tris.push(tri(ix(x, h - 1, z), ix(x + 1, h - 1, z), ix(x + 1, h - 1, z + 1)));
        }
    }
    // z = 0 and z = d - 1
    for x in 0..w - 1 {
        for y in 0..h - 1 {
            tris.push(tri(ix(x, y, 0), ix(x + 1, y, 0), ix(x, y + 1, 0)));
            tris.push(tri(ix(x + 1, y, 0), ix(x + 1, y + 1, 0), ix(x, y + 1, 0)));
            tris.push(tri(ix(x, y, d - 1), ix(x + 1, y + 1, d - 1), ix(x + 1, y, d - 1)));
            tris.push(tri(ix(x, y, d - 1), ix(x, y + 1, d - 1), ix(x + 1, y + 1, d - 1)));
        }
    }
    tris
}
