//! Stable-fluids grid solver (semi-Lagrangian advection, implicit diffusion,
//! pressure projection).
//!
//! Fields live on a `(width + 2) x (height + 2)` array: the interior cells are
//! `1..=width` by `1..=height` and the outer ring is a ghost border rewritten
//! by [`set_bound`] after every pass. Velocity is fully resolved before density
//! is carried through it; density never feeds back into velocity.

use alloc::vec::Vec as AllocVec;
use core::mem;

use crate::config::FluidConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::{FluidStage, StepObserver};

/// How a field behaves at the walls.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Field {
    /// Density and pressure: mirrored at every wall.
    Scalar,
    /// Horizontal velocity: negated at the left and right walls.
    Horizontal,
    /// Vertical velocity: negated at the top and bottom walls.
    Vertical,
}

/// Interior size of a padded grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridShape {
    pub width: usize,
    pub height: usize,
}

impl GridShape {
    pub fn new(width: usize, height: usize) -> Self {
        GridShape { width, height }
    }

    /// Number of cells including the ghost border.
    pub fn len(&self) -> usize {
        (self.width + 2) * (self.height + 2)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Flat index of padded cell `(i, j)`.
    #[inline]
    pub fn ix(&self, i: usize, j: usize) -> usize {
        i + j * (self.width + 2)
    }
}

/// `x += s * dt` over every cell, border included.
pub fn add_source<F: Float>(x: &mut [F], s: &[F], dt: F) {
    for (xi, si) in x.iter_mut().zip(s) {
        *xi = *xi + *si * dt;
    }
}

/// Rewrite the ghost border from the adjacent interior cells.
///
/// Corners take the mean of their two edge neighbours.
pub fn set_bound<F: Float>(shape: GridShape, field: Field, x: &mut [F]) {
    let (w, h) = (shape.width, shape.height);
    let ix = |i, j| shape.ix(i, j);
    for j in 1..=h {
        let (l, r) = (x[ix(1, j)], x[ix(w, j)]);
        let flip = field == Field::Horizontal;
        x[ix(0, j)] = if flip { -l } else { l };
        x[ix(w + 1, j)] = if flip { -r } else { r };
    }
    for i in 1..=w {
        let (t, b) = (x[ix(i, 1)], x[ix(i, h)]);
        let flip = field == Field::Vertical;
        x[ix(i, 0)] = if flip { -t } else { t };
        x[ix(i, h + 1)] = if flip { -b } else { b };
    }
    let half = F::half();
    x[ix(0, 0)] = half * (x[ix(1, 0)] + x[ix(0, 1)]);
    x[ix(0, h + 1)] = half * (x[ix(1, h + 1)] + x[ix(0, h)]);
    x[ix(w + 1, 0)] = half * (x[ix(w, 0)] + x[ix(w + 1, 1)]);
    x[ix(w + 1, h + 1)] = half * (x[ix(w, h + 1)] + x[ix(w + 1, h)]);
}

/// Gauss-Seidel solve of `x = (x0 + a * neighbours) / (1 + 4a)` with
/// `a = dt * rate * width * height`, re-applying the border after every sweep.
pub fn diffuse<F: Float>(
    shape: GridShape,
    field: Field,
    x: &mut [F],
    x0: &[F],
    rate: F,
    dt: F,
    iterations: usize,
) {
    let a = dt * rate * F::from_usize(shape.width) * F::from_usize(shape.height);
    let denom = F::one() + F::from_f32(4.0) * a;
    for _ in 0..iterations {
        for i in 1..=shape.width {
            for j in 1..=shape.height {
                let neighbours = x[shape.ix(i - 1, j)]
                    + x[shape.ix(i + 1, j)]
                    + x[shape.ix(i, j - 1)]
                    + x[shape.ix(i, j + 1)];
                x[shape.ix(i, j)] = (x0[shape.ix(i, j)] + a * neighbours) / denom;
            }
        }
        set_bound(shape, field, x);
    }
}

/// Semi-Lagrangian transport of `d0` through `(u, v)` into `d`.
///
/// Each cell traces back by `dt` and samples bilinearly. The trace is clamped
/// to `[0.5, dim + 0.5]` so samples never leave the padded array.
pub fn advect<F: Float>(
    shape: GridShape,
    field: Field,
    d: &mut [F],
    d0: &[F],
    u: &[F],
    v: &[F],
    dt: F,
) {
    let (w, h) = (shape.width, shape.height);
    let dt0w = dt * F::from_usize(w);
    let dt0h = dt * F::from_usize(h);
    let lo = F::half();
    let hi_x = F::from_usize(w) + F::half();
    let hi_y = F::from_usize(h) + F::half();
    for i in 1..=w {
        for j in 1..=h {
            let k = shape.ix(i, j);
            let x = (F::from_usize(i) - dt0w * u[k]).clamp(lo, hi_x);
            let y = (F::from_usize(j) - dt0h * v[k]).clamp(lo, hi_y);
            let i0 = x.floor().to_f32() as usize;
            let j0 = y.floor().to_f32() as usize;
            let (i1, j1) = (i0 + 1, j0 + 1);
            let s1 = x - F::from_usize(i0);
            let s0 = F::one() - s1;
            let t1 = y - F::from_usize(j0);
            let t0 = F::one() - t1;
            d[k] = s0 * (t0 * d0[shape.ix(i0, j0)] + t1 * d0[shape.ix(i0, j1)])
                + s1 * (t0 * d0[shape.ix(i1, j0)] + t1 * d0[shape.ix(i1, j1)]);
        }
    }
    set_bound(shape, field, d);
}

/// Make `(u, v)` divergence free, using `p` and `div` as scratch.
///
/// Builds the divergence, relaxes the pressure Poisson equation for
/// `iterations` sweeps, then subtracts the pressure gradient.
pub fn project<F: Float>(
    shape: GridShape,
    u: &mut [F],
    v: &mut [F],
    p: &mut [F],
    div: &mut [F],
    iterations: usize,
) {
    let (w, h) = (shape.width, shape.height);
    let scale = F::from_usize(w + h);
    for i in 1..=w {
        for j in 1..=h {
            let k = shape.ix(i, j);
            div[k] = -(u[shape.ix(i + 1, j)] - u[shape.ix(i - 1, j)] + v[shape.ix(i, j + 1)]
                - v[shape.ix(i, j - 1)])
                / scale;
            p[k] = F::zero();
        }
    }
    set_bound(shape, Field::Scalar, div);
    set_bound(shape, Field::Scalar, p);

    let quarter = F::from_f32(0.25);
    for _ in 0..iterations {
        for i in 1..=w {
            for j in 1..=h {
                let k = shape.ix(i, j);
                p[k] = (div[k]
                    + p[shape.ix(i - 1, j)]
                    + p[shape.ix(i + 1, j)]
                    + p[shape.ix(i, j - 1)]
                    + p[shape.ix(i, j + 1)])
                    * quarter;
            }
        }
        set_bound(shape, Field::Scalar, p);
    }

    let (fw, fh) = (F::from_usize(w), F::from_usize(h));
    for i in 1..=w {
        for j in 1..=h {
            let k = shape.ix(i, j);
            u[k] = u[k] - F::half() * (p[shape.ix(i + 1, j)] - p[shape.ix(i - 1, j)]) * fw;
            v[k] = v[k] - F::half() * (p[shape.ix(i, j + 1)] - p[shape.ix(i, j - 1)]) * fh;
        }
    }
    set_bound(shape, Field::Horizontal, u);
    set_bound(shape, Field::Vertical, v);
}

/// Double-buffered velocity and density fields on a fixed grid.
///
/// External sources are staged in the `*_prev` buffers through the
/// `add_*_source` methods, consumed by the next [`FluidGrid::step`], and
/// cleared afterwards. [`FluidGrid::add_density`] and
/// [`FluidGrid::add_velocity`] write straight into the current fields.
#[derive(Clone, Debug)]
pub struct FluidGrid<F: Float> {
    shape: GridShape,
    config: FluidConfig<F>,
    u: AllocVec<F>,
    v: AllocVec<F>,
    u_prev: AllocVec<F>,
    v_prev: AllocVec<F>,
    dens: AllocVec<F>,
    dens_prev: AllocVec<F>,
}

impl<F: Float> FluidGrid<F> {
    pub fn new(width: usize, height: usize, config: FluidConfig<F>) -> Result<Self, PhysicsError> {
        if width == 0 || height == 0 {
            return Err(PhysicsError::InvalidGridDimensions { cols: width, rows: height });
        }
        let shape = GridShape::new(width, height);
        let n = shape.len();
        log::debug!(
            "fluid grid {}x{} ({} padded cells, {} sweeps)",
            width,
            height,
            n,
            config.iterations
        );
        Ok(FluidGrid {
            shape,
            config,
            u: alloc::vec![F::zero(); n],
            v: alloc::vec![F::zero(); n],
            u_prev: alloc::vec![F::zero(); n],
            v_prev: alloc::vec![F::zero(); n],
            dens: alloc::vec![F::zero(); n],
            dens_prev: alloc::vec![F::zero(); n],
        })
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn config(&self) -> &FluidConfig<F> {
        &self.config
    }

    /// Padded index of screen cell `(x, y)`, if it is inside the grid.
    fn cell(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.shape.width && y < self.shape.height).then(|| self.shape.ix(x + 1, y + 1))
    }

    /// Add density directly to screen cell `(x, y)`. Returns false off-grid.
    pub fn add_density(&mut self, x: usize, y: usize, amount: F) -> bool {
        let Some(k) = self.cell(x, y) else {
            return false;
        };
        self.dens[k] = self.dens[k] + amount;
        true
    }

    /// Add velocity directly to screen cell `(x, y)`. Returns false off-grid.
    pub fn add_velocity(&mut self, x: usize, y: usize, du: F, dv: F) -> bool {
        let Some(k) = self.cell(x, y) else {
            return false;
        };
        self.u[k] = self.u[k] + du;
        self.v[k] = self.v[k] + dv;
        true
    }

    /// Stage a density source for the next step, scaled by its `dt`.
    pub fn add_density_source(&mut self, x: usize, y: usize, rate: F) -> bool {
        let Some(k) = self.cell(x, y) else {
            return false;
        };
        self.dens_prev[k] = self.dens_prev[k] + rate;
        true
    }

    /// Stage a velocity source for the next step, scaled by its `dt`.
    pub fn add_velocity_source(&mut self, x: usize, y: usize, du: F, dv: F) -> bool {
        let Some(k) = self.cell(x, y) else {
            return false;
        };
        self.u_prev[k] = self.u_prev[k] + du;
        self.v_prev[k] = self.v_prev[k] + dv;
        true
    }

    /// Exponential decay of interior density: `dens -= dens * fade * dt`.
    pub fn fade(&mut self, dt: F) {
        let k = self.config.fade * dt;
        if k == F::zero() {
            return;
        }
        for j in 1..=self.shape.height {
            for i in 1..=self.shape.width {
                let c = self.shape.ix(i, j);
                self.dens[c] = self.dens[c] - self.dens[c] * k;
            }
        }
    }

    /// Velocity step: add sources, diffuse each axis, project, advect both
    /// axes through the projected field, project again.
    pub fn vel_step<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        let shape = self.shape;
        let iters = self.config.iterations;
        let visc = self.config.viscosity;

        add_source(&mut self.u, &self.u_prev, dt);
        add_source(&mut self.v, &self.v_prev, dt);
        observer.on_fluid_stage(FluidStage::AddSource);

        mem::swap(&mut self.u_prev, &mut self.u);
        diffuse(shape, Field::Horizontal, &mut self.u, &self.u_prev, visc, dt, iters);
        mem::swap(&mut self.v_prev, &mut self.v);
        diffuse(shape, Field::Vertical, &mut self.v, &self.v_prev, visc, dt, iters);
        observer.on_fluid_stage(FluidStage::Diffuse);

        project(shape, &mut self.u, &mut self.v, &mut self.u_prev, &mut self.v_prev, iters);
        observer.on_fluid_stage(FluidStage::Project);

        mem::swap(&mut self.u_prev, &mut self.u);
        mem::swap(&mut self.v_prev, &mut self.v);
        advect(shape, Field::Horizontal, &mut self.u, &self.u_prev, &self.u_prev, &self.v_prev, dt);
        advect(shape, Field::Vertical, &mut self.v, &self.v_prev, &self.u_prev, &self.v_prev, dt);
        observer.on_fluid_stage(FluidStage::Advect);

        project(shape, &mut self.u, &mut self.v, &mut self.u_prev, &mut self.v_prev, iters);
        observer.on_fluid_stage(FluidStage::Project);
    }

    /// Density step: add sources, diffuse, advect through the current velocity.
    pub fn dens_step<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        let shape = self.shape;
        add_source(&mut self.dens, &self.dens_prev, dt);
        observer.on_fluid_stage(FluidStage::AddSource);

        mem::swap(&mut self.dens_prev, &mut self.dens);
        diffuse(
            shape,
            Field::Scalar,
            &mut self.dens,
            &self.dens_prev,
            self.config.diffusion,
            dt,
            self.config.iterations,
        );
        observer.on_fluid_stage(FluidStage::Diffuse);

        mem::swap(&mut self.dens_prev, &mut self.dens);
        advect(shape, Field::Scalar, &mut self.dens, &self.dens_prev, &self.u, &self.v, dt);
        observer.on_fluid_stage(FluidStage::Advect);
    }

    /// One full frame: fade, velocity step, density step, then drop the
    /// staged sources.
    pub fn step<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        self.fade(dt);
        observer.on_fluid_stage(FluidStage::Fade);
        self.vel_step(dt, observer);
        self.dens_step(dt, observer);
        self.clear_sources();
        observer.on_step_complete();
    }

    /// Project the current velocity field on its own.
    pub fn project_velocity(&mut self) {
        project(
            self.shape,
            &mut self.u,
            &mut self.v,
            &mut self.u_prev,
            &mut self.v_prev,
            self.config.iterations,
        );
        self.u_prev.fill(F::zero());
        self.v_prev.fill(F::zero());
    }

    /// Rewrite every ghost border from the current interior.
    pub fn enforce_boundaries(&mut self) {
        set_bound(self.shape, Field::Horizontal, &mut self.u);
        set_bound(self.shape, Field::Vertical, &mut self.v);
        set_bound(self.shape, Field::Scalar, &mut self.dens);
    }

    pub fn clear_sources(&mut self) {
        self.u_prev.fill(F::zero());
        self.v_prev.fill(F::zero());
        self.dens_prev.fill(F::zero());
    }

    /// Zero every field.
    pub fn reset(&mut self) {
        self.clear_sources();
        self.u.fill(F::zero());
        self.v.fill(F::zero());
        self.dens.fill(F::zero());
    }

    /// Sum of interior density.
    pub fn total_density(&self) -> F {
        let mut total = F::zero();
        for j in 1..=self.shape.height {
            for i in 1..=self.shape.width {
                total = total + self.dens[self.shape.ix(i, j)];
            }
        }
        total
    }

    /// Central-difference divergence at padded interior cell `(i, j)`.
    pub fn divergence(&self, i: usize, j: usize) -> F {
        let s = self.shape;
        F::half() * (self.u[s.ix(i + 1, j)] - self.u[s.ix(i - 1, j)])
            + F::half() * (self.v[s.ix(i, j + 1)] - self.v[s.ix(i, j - 1)])
    }

    /// Root of the summed squared divergence over the interior.
    pub fn divergence_norm(&self) -> F {
        let mut sum = F::zero();
        for j in 1..=self.shape.height {
            for i in 1..=self.shape.width {
                let d = self.divergence(i, j);
                sum = sum + d * d;
            }
        }
        sum.sqrt()
    }

    /// Density at screen cell `(x, y)`, zero off-grid.
    pub fn density_at(&self, x: usize, y: usize) -> F {
        self.cell(x, y).map_or(F::zero(), |k| self.dens[k])
    }

    /// Velocity at screen cell `(x, y)`, zero off-grid.
    pub fn velocity_at(&self, x: usize, y: usize) -> (F, F) {
        self.cell(x, y).map_or((F::zero(), F::zero()), |k| (self.u[k], self.v[k]))
    }

    /// Padded density buffer.
    pub fn density(&self) -> &[F] {
        &self.dens
    }

    /// Padded velocity buffers.
    pub fn velocity(&self) -> (&[F], &[F]) {
        (&self.u, &self.v)
    }

    pub fn velocity_mut(&mut self) -> (&mut [F], &mut [F]) {
        (&mut self.u, &mut self.v)
    }
}
