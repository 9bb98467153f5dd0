use charsim::{FluidConfig, FluidGrid, FluidStage, NoOpStepObserver, PhysicsError, StepObserver};

fn centre_of_mass_x(grid: &FluidGrid<f64>) -> f64 {
    let (mut total, mut moment) = (0.0, 0.0);
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let d = grid.density_at(x, y);
            total += d;
            moment += d * x as f64;
        }
    }
    moment / total
}

#[test]
fn projection_removes_most_divergence() {
    let n = 8;
    let mut grid = FluidGrid::<f64>::new(n, n, FluidConfig::new().with_iterations(60)).unwrap();
    {
        let shape = grid.shape();
        let (u, _) = grid.velocity_mut();
        for j in 1..=n {
            for i in 1..=n {
                u[shape.ix(i, j)] = (core::f64::consts::PI * (i as f64 - 0.5) / n as f64).sin();
            }
        }
    }
    grid.enforce_boundaries();

    let before = grid.divergence_norm();
    assert!(before > 1.0);
    grid.project_velocity();
    let after = grid.divergence_norm();
    assert!(after < 0.25 * before, "divergence {} -> {}", before, after);
}

#[test]
fn still_fluid_conserves_density() {
    let mut grid = FluidGrid::<f64>::new(16, 16, FluidConfig::new()).unwrap();
    for y in 4..9 {
        for x in 4..9 {
            grid.add_density(x, y, 1.0);
        }
    }
    let start = grid.total_density();
    for _ in 0..100 {
        grid.step(0.05, &mut NoOpStepObserver);
    }
    let drift = (grid.total_density() - start).abs() / start;
    assert!(drift < 1e-3, "density drifted by {}", drift);
}

#[test]
fn density_source_adds_rate_times_dt() {
    let mut grid = FluidGrid::<f64>::new(10, 10, FluidConfig::new()).unwrap();
    assert!(grid.add_density_source(5, 5, 10.0));
    grid.step(0.1, &mut NoOpStepObserver);
    assert!((grid.total_density() - 1.0).abs() < 1e-9);

    // consumed: the next step adds nothing
    grid.step(0.1, &mut NoOpStepObserver);
    assert!((grid.total_density() - 1.0).abs() < 1e-9);
}

#[test]
fn rightward_flow_carries_density_right() {
    let mut grid = FluidGrid::<f64>::new(16, 16, FluidConfig::new()).unwrap();
    for y in 5..10 {
        grid.add_density(6, y, 1.0);
    }
    let start = centre_of_mass_x(&grid);
    for _ in 0..10 {
        for y in 0..16 {
            for x in 0..16 {
                grid.add_velocity_source(x, y, 2.0, 0.0);
            }
        }
        grid.step(0.05, &mut NoOpStepObserver);
    }
    let end = centre_of_mass_x(&grid);
    assert!(end - start > 0.3, "centre of mass moved from {} to {}", start, end);
}

#[test]
fn fade_decays_geometrically() {
    let mut grid = FluidGrid::<f64>::new(8, 8, FluidConfig::new().with_fade(1.0)).unwrap();
    grid.add_density(3, 3, 1.0);
    for _ in 0..10 {
        grid.step(0.05, &mut NoOpStepObserver);
    }
    let expected = 0.95f64.powi(10);
    assert!((grid.total_density() - expected).abs() < 1e-9);
}

#[test]
fn off_grid_sources_are_ignored() {
    let mut grid = FluidGrid::<f32>::new(4, 3, FluidConfig::new()).unwrap();
    assert!(!grid.add_density(4, 0, 1.0));
    assert!(!grid.add_velocity(0, 3, 1.0, 1.0));
    assert!(!grid.add_density_source(9, 9, 1.0));
    assert_eq!(grid.total_density(), 0.0);
    assert_eq!(grid.density_at(4, 0), 0.0);
    assert_eq!(grid.velocity_at(0, 3), (0.0, 0.0));
}

#[test]
fn reset_clears_everything() {
    let mut grid = FluidGrid::<f32>::new(6, 6, FluidConfig::new()).unwrap();
    grid.add_density(2, 2, 5.0);
    grid.add_velocity(2, 2, 1.0, -1.0);
    grid.add_density_source(3, 3, 5.0);
    grid.reset();
    grid.step(0.1, &mut NoOpStepObserver);
    assert_eq!(grid.total_density(), 0.0);
    assert_eq!(grid.velocity_at(2, 2), (0.0, 0.0));
}

#[test]
fn empty_grids_are_rejected() {
    let err = FluidGrid::<f32>::new(0, 5, FluidConfig::new()).err();
    assert_eq!(err, Some(PhysicsError::InvalidGridDimensions { cols: 0, rows: 5 }));
}

#[derive(Default)]
struct Stages(Vec<FluidStage>, usize);

impl StepObserver for Stages {
    fn on_fluid_stage(&mut self, stage: FluidStage) {
        self.0.push(stage);
    }

    fn on_step_complete(&mut self) {
        self.1 += 1;
    }
}

#[test]
fn step_reports_stages_in_order() {
    use FluidStage::*;
    let mut grid = FluidGrid::<f32>::new(4, 4, FluidConfig::new()).unwrap();
    let mut stages = Stages::default();
    grid.step(0.1, &mut stages);
    assert_eq!(
        stages.0,
        vec![
            Fade, AddSource, Diffuse, Project, Advect, Project, // velocity
            AddSource, Diffuse, Advect, // density
        ]
    );
    assert_eq!(stages.1, 1);
}

#[test]
fn diffusion_spreads_density() {
    let neighbour_after_step = |diffusion: f64| {
        let config = FluidConfig::new().with_diffusion(diffusion).with_viscosity(0.0);
        let mut grid = FluidGrid::<f64>::new(9, 9, config).unwrap();
        grid.add_density(4, 4, 1.0);
        grid.step(0.1, &mut NoOpStepObserver);
        grid.density_at(5, 4)
    };
    assert_eq!(neighbour_after_step(0.0), 0.0);
    assert!(neighbour_after_step(0.5) > 0.01);
}
