//! Step observer trait for monitoring simulation progress.

/// Stage of a fluid step, reported through [`StepObserver::on_fluid_stage`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FluidStage {
    AddSource,
    Diffuse,
    Project,
    Advect,
    Fade,
}

/// Trait for observing simulation steps.
///
/// Implement this trait to monitor solver progress (debugging, visualization,
/// profiling). All methods have default no-op implementations.
pub trait StepObserver {
    /// Called after all particles have been integrated in a sub-step.
    fn on_integrate(&mut self) {}

    /// Called after each stick relaxation round.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called after each stage of a fluid step.
    fn on_fluid_stage(&mut self, _stage: FluidStage) {}

    /// Called when a step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer. Use as default when no observation is needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}

/// Forwards every hook to the `log` facade at trace level and counts steps.
#[derive(Debug, Default)]
pub struct LogStepObserver {
    steps: u64,
}

impl LogStepObserver {
    pub fn new() -> Self {
        LogStepObserver { steps: 0 }
    }

    /// Completed steps seen so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl StepObserver for LogStepObserver {
    fn on_integrate(&mut self) {
        log::trace!("step {}: integrated", self.steps);
    }

    fn on_constraint_iteration(&mut self, iteration: usize) {
        log::trace!("step {}: relaxation round {}", self.steps, iteration);
    }

    fn on_fluid_stage(&mut self, stage: FluidStage) {
        log::trace!("step {}: fluid {:?}", self.steps, stage);
    }

    fn on_step_complete(&mut self) {
        self.steps += 1;
        log::trace!("step {} complete", self.steps);
    }
}
