//! 2D spring sheet (cloth and grid soft bodies).

use alloc::vec::Vec as AllocVec;

use crate::arena::ParticleId;
use crate::config::SolverConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::solver::ParticleSystem;
use crate::vec::{Vec, Vec2};

/// Configuration for a spring grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridConfig<F: Float> {
    pub cols: usize,
    pub rows: usize,
    /// Position of the (0, 0) particle.
    pub origin: Vec2<F>,
    /// Distance from the first to the last column / row.
    pub extent: Vec2<F>,
    pub stiffness: F,
    pub damping: F,
    /// Add both diagonals of every cell (the 2D soft body) on top of the
    /// axis-aligned springs (the cloth).
    pub diagonals: bool,
    pub particle_mass: F,
}

impl<F: Float> GridConfig<F> {
    pub fn new(cols: usize, rows: usize) -> Self {
        GridConfig {
            cols,
            rows,
            origin: Vec2::zero(),
            extent: Vec2::new(F::from_usize(cols.saturating_sub(1)), F::from_usize(rows.saturating_sub(1))),
            stiffness: F::from_f32(437.243),
            damping: F::from_f32(4.97),
            diagonals: false,
            particle_mass: F::one(),
        }
    }

    pub fn with_extent(mut self, origin: Vec2<F>, extent: Vec2<F>) -> Self {
        self.origin = origin;
        self.extent = extent;
        self
    }

    pub fn with_springs(mut self, stiffness: F, damping: F) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
        self
    }

    pub fn with_diagonals(mut self, diagonals: bool) -> Self {
        self.diagonals = diagonals;
        self
    }

    pub fn with_particle_mass(mut self, mass: F) -> Self {
        self.particle_mass = mass;
        self
    }
}

/// A `cols` x `rows` sheet of particles joined by springs.
///
/// Particle `(col, row)` sits at index `col + row * cols`. Springs are pushed
/// right-then-down per particle, then the two diagonals of each cell.
#[derive(Clone, Debug)]
pub struct SpringGrid<F: Float> {
    system: ParticleSystem<Vec2<F>>,
    ids: AllocVec<ParticleId>,
    cols: usize,
    rows: usize,
}

impl<F: Float> SpringGrid<F> {
    pub fn new(config: &GridConfig<F>) -> Result<Self, PhysicsError> {
        let (cols, rows) = (config.cols, config.rows);
        if cols < 2 || rows < 2 {
            return Err(PhysicsError::InvalidGridDimensions { cols, rows });
        }
        let mass = config.particle_mass;
        if mass <= F::zero() || !mass.is_finite() {
            return Err(PhysicsError::InvalidMass);
        }

        let mut system = ParticleSystem::with_capacity(cols * rows);
        let mut ids = AllocVec::with_capacity(cols * rows);
        let last_col = F::from_usize(cols - 1);
        let last_row = F::from_usize(rows - 1);
        for row in 0..rows {
            for col in 0..cols {
                let x = config.origin.x + config.extent.x * F::from_usize(col) / last_col;
                let y = config.origin.y + config.extent.y * F::from_usize(row) / last_row;
                ids.push(system.add_particle(Particle::new(Vec2::new(x, y), mass)));
            }
        }

        let ix = |col: usize, row: usize| ids[col + row * cols];
        let (k, c) = (config.stiffness, config.damping);
        for col in 0..cols {
            for row in 0..rows {
                if col < cols - 1 {
                    system.connect_spring(ix(col, row), ix(col + 1, row), k, c)?;
                }
                if row < rows - 1 {
                    system.connect_spring(ix(col, row), ix(col, row + 1), k, c)?;
                }
            }
        }
        if config.diagonals {
            for col in 0..cols - 1 {
                for row in 0..rows - 1 {
                    system.connect_spring(ix(col, row), ix(col + 1, row + 1), k, c)?;
                    system.connect_spring(ix(col + 1, row), ix(col, row + 1), k, c)?;
                }
            }
        }

        log::debug!(
            "built {}x{} spring grid: {} particles, {} springs",
            cols,
            rows,
            system.particle_count(),
            system.spring_count()
        );
        Ok(SpringGrid { system, ids, cols, rows })
    }

    pub fn index(&self, col: usize, row: usize) -> usize {
        col + row * self.cols
    }

    pub fn id(&self, col: usize, row: usize) -> Option<ParticleId> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.ids.get(self.index(col, row)).copied()
    }

    pub fn position(&self, col: usize, row: usize) -> Option<Vec2<F>> {
        self.id(col, row).and_then(|id| self.system.particle(id)).map(|p| p.pos)
    }

    /// Lock the particle at `(col, row)`. Returns false when out of range.
    pub fn lock(&mut self, col: usize, row: usize) -> bool {
        let Some(id) = self.id(col, row) else {
            return false;
        };
        match self.system.particle_mut(id) {
            Some(p) => {
                p.lock();
                true
            }
            None => false,
        }
    }

    /// Lock the two ends of the first row, the way the cloth hangs.
    pub fn lock_top_corners(&mut self) {
        let last = self.cols - 1;
        self.lock(0, 0);
        self.lock(last, 0);
    }

    /// Particle ids of each cell as `[top-left, top-right, bottom-left,
    /// bottom-right]`.
    pub fn cells(&self) -> impl Iterator<Item = [ParticleId; 4]> + '_ {
        (0..self.cols - 1).flat_map(move |col| {
            (0..self.rows - 1).map(move |row| {
                [
                    self.ids[self.index(col, row)],
                    self.ids[self.index(col + 1, row)],
                    self.ids[self.index(col, row + 1)],
                    self.ids[self.index(col + 1, row + 1)],
                ]
            })
        })
    }

    pub fn step<O: StepObserver>(&mut self, dt: F, config: &SolverConfig<Vec2<F>>, observer: &mut O) {
        self.system.step(dt, config, observer);
    }

    pub fn system(&self) -> &ParticleSystem<Vec2<F>> {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ParticleSystem<Vec2<F>> {
        &mut self.system
    }

    pub fn ids(&self) -> &[ParticleId] {
        &self.ids
    }

    pub fn cols(&self) -> usize { self.cols }
    pub fn rows(&self) -> usize { self.rows }
    pub fn particle_count(&self) -> usize { self.system.particle_count() }
    pub fn spring_count(&self) -> usize { self.system.spring_count() }
}
