//! Fixed-timestep accumulator.
//!
//! Frames normally step the simulation with the measured frame `dt`. Explicit
//! Euler springs are only stable for small steps, so a caller that wants
//! frame-rate independence can feed frame times through a [`FixedTimestep`]
//! and run the returned number of constant-size steps instead.

use crate::error::PhysicsError;
use crate::float::Float;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedTimestep<F: Float> {
    step: F,
    max_steps: usize,
    accumulator: F,
    dropped: F,
}

impl<F: Float> FixedTimestep<F> {
    /// `step` must be positive and finite. At most `max_steps` (at least 1)
    /// steps are produced per frame; time beyond that is discarded.
    pub fn new(step: F, max_steps: usize) -> Result<Self, PhysicsError> {
        if step <= F::zero() || !step.is_finite() {
            return Err(PhysicsError::InvalidTimestep);
        }
        Ok(FixedTimestep {
            step,
            max_steps: max_steps.max(1),
            accumulator: F::zero(),
            dropped: F::zero(),
        })
    }

    pub fn step(&self) -> F {
        self.step
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Add a frame's elapsed time and return how many steps to run.
    ///
    /// Negative or non-finite frame times are ignored.
    pub fn advance(&mut self, frame_dt: F) -> usize {
        if frame_dt > F::zero() && frame_dt.is_finite() {
            self.accumulator = self.accumulator + frame_dt;
        }
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator = self.accumulator - self.step;
            steps += 1;
        }
        if self.accumulator >= self.step {
            let lost = (self.accumulator / self.step).floor() * self.step;
            log::warn!(
                "fixed timestep fell behind: dropping {:?}s after {} steps",
                lost,
                steps
            );
            self.dropped = self.dropped + lost;
            self.accumulator = self.accumulator - lost;
        }
        steps
    }

    /// Advance by `frame_dt` and call `f(step)` once per due step.
    pub fn run<E>(&mut self, frame_dt: F, mut f: impl FnMut(F) -> Result<(), E>) -> Result<usize, E> {
        let n = self.advance(frame_dt);
        for _ in 0..n {
            f(self.step)?;
        }
        Ok(n)
    }

    /// Leftover time as a fraction of one step, for interpolating rendering.
    pub fn alpha(&self) -> F {
        self.accumulator / self.step
    }

    /// Total simulation time discarded so far.
    pub fn dropped(&self) -> F {
        self.dropped
    }

    pub fn reset(&mut self) {
        self.accumulator = F::zero();
        self.dropped = F::zero();
    }
}
