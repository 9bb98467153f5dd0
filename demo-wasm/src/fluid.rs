use charsim::{
    Color, FluidConfig, FluidGrid, Input, Key, NoOpStepObserver, PhysicsError, Raster, Simulation,
};

const ITERATIONS: usize = 23;
const FADE: f32 = 0.0937;
/// Density injected per second while stirring.
const INJECT: f32 = 15.0;
/// Seconds between mouse samples used for the stir velocity.
const MOUSE_PERIOD: f32 = 0.075;

const STRESS: [Color; 8] = [
    Color::DarkBlue,
    Color::Blue,
    Color::DarkCyan,
    Color::Cyan,
    Color::Green,
    Color::DarkYellow,
    Color::Red,
    Color::DarkRed,
];
const HEAT: [Color; 6] =
    [Color::Black, Color::Red, Color::DarkRed, Color::DarkYellow, Color::Yellow, Color::White];
const COOL: [Color; 6] =
    [Color::DarkMagenta, Color::DarkBlue, Color::Blue, Color::DarkCyan, Color::Cyan, Color::White];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Palette {
    Stress,
    Heat,
    Cool,
}

impl Palette {
    fn ramp(self) -> &'static [Color] {
        match self {
            Palette::Stress => &STRESS,
            Palette::Heat => &HEAT,
            Palette::Cool => &COOL,
        }
    }

    /// Color for a density, scaled so 0.1 saturates the ramp.
    pub fn color(self, density: f32) -> Color {
        let ramp = self.ramp();
        let top = (ramp.len() - 1) as f32;
        let i = (density * 10.0 * ramp.len() as f32).clamp(0.0, top);
        ramp[i as usize]
    }
}

fn build(width: usize, height: usize) -> Result<FluidGrid<f32>, PhysicsError> {
    let config = FluidConfig::new().with_iterations(ITERATIONS).with_fade(FADE);
    FluidGrid::new(width, height, config)
}

/// Smoke stirred by the pointer, one fluid cell per raster cell.
pub struct Fluid {
    grid: FluidGrid<f32>,
    palette: Palette,
    mouse_timer: f32,
    mouse: (f32, f32),
    old_mouse: (f32, f32),
}

impl Fluid {
    pub fn new(width: usize, height: usize) -> Result<Self, PhysicsError> {
        Ok(Fluid {
            grid: build(width, height)?,
            palette: Palette::Stress,
            mouse_timer: 0.0,
            mouse: (0.0, 0.0),
            old_mouse: (0.0, 0.0),
        })
    }

    pub fn grid(&self) -> &FluidGrid<f32> {
        &self.grid
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    fn stir(&mut self, x: i32, y: i32, dt: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let du = (self.mouse.0 - self.old_mouse.0) / 2.0;
        let dv = (self.mouse.1 - self.old_mouse.1) / 2.0;
        if self.grid.add_density(x, y, INJECT * dt) {
            self.grid.add_velocity(x, y, du, dv);
        }
    }
}

impl Simulation for Fluid {
    fn setup(&mut self, width: usize, height: usize) {
        match build(width, height) {
            Ok(grid) => self.grid = grid,
            Err(e) => log::error!("fluid rebuild failed: {}", e),
        }
    }

    fn update(&mut self, dt: f32, input: &dyn Input) {
        let (mx, my) = input.mouse();
        if self.mouse_timer > MOUSE_PERIOD {
            self.mouse_timer = 0.0;
            self.old_mouse = self.mouse;
            self.mouse = (mx as f32, my as f32);
        }
        self.mouse_timer += dt;

        if input.is_key_down(Key::Space) {
            self.stir(mx, my, dt);
        }

        self.grid.step(dt, &mut NoOpStepObserver);

        for (key, palette) in [('1', Palette::Stress), ('2', Palette::Heat), ('3', Palette::Cool)] {
            if input.is_key_down(Key::Char(key)) {
                self.palette = palette;
            }
        }
    }

    fn draw(&self, raster: &mut Raster) {
        raster.clear();
        raster.set_char('\u{2588}');
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                raster.set_color(self.palette.color(self.grid.density_at(x, y)));
                raster.put_pixel(x as f32, y as f32);
            }
        }
    }

    fn title(&self) -> &str {
        "Jos Stam Fluid Sim"
    }
}
