use charsim::demo::Edge;
use charsim::{
    Color, GridConfig, Input, Key, KeyLatch, NoOpStepObserver, ParticleId, PhysicsError, Raster,
    Simulation, SolverConfig, SpringGrid, Vec, Vec2,
};

const COLS: usize = 10;
const ROWS: usize = 12;
const GRAVITY: f32 = 25.0;
const GRAB_RADIUS: f32 = 5.0;

/// Speed-to-color ramp, slowest first.
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

fn stress_color(speed: f32) -> Color {
    let i = (speed / 25.0 * 8.0).clamp(0.0, 7.0) as usize;
    STRESS[i]
}

fn build(width: usize, height: usize) -> Result<SpringGrid<f32>, PhysicsError> {
    let (w, h) = (width as f32, height as f32);
    let config = GridConfig::new(COLS, ROWS)
        .with_extent(Vec2::new(w / 8.0, 0.0), Vec2::new(w * 3.0 / 4.0, h * 3.0 / 5.0));
    let mut grid = SpringGrid::new(&config)?;
    grid.lock_top_corners();
    Ok(grid)
}

/// A sheet hanging from its top corners in a swaying wind.
pub struct Cloth {
    grid: SpringGrid<f32>,
    width: usize,
    height: usize,
    elapsed: f32,
    wind: f32,
    hold: KeyLatch,
    held: Option<ParticleId>,
}

impl Cloth {
    pub fn new(width: usize, height: usize) -> Result<Self, PhysicsError> {
        Ok(Cloth {
            grid: build(width, height)?,
            width,
            height,
            elapsed: 0.0,
            wind: 0.0,
            hold: KeyLatch::new(),
            held: None,
        })
    }

    pub fn grid(&self) -> &SpringGrid<f32> {
        &self.grid
    }

    fn speed(&self, id: ParticleId) -> f32 {
        self.grid.system().particle(id).map_or(0.0, |p| p.vel.length())
    }

    fn pos(&self, col: usize, row: usize) -> Vec2<f32> {
        self.grid.position(col, row).unwrap_or(Vec2::zero())
    }
}

impl Simulation for Cloth {
    fn setup(&mut self, width: usize, height: usize) {
        match build(width, height) {
            Ok(grid) => {
                self.grid = grid;
                self.width = width;
                self.height = height;
                self.held = None;
            }
            Err(e) => log::error!("cloth rebuild failed: {}", e),
        }
    }

    fn update(&mut self, dt: f32, input: &dyn Input) {
        if input.is_key_down(Key::Char('R')) {
            self.setup(self.width, self.height);
        }

        let (mx, my) = input.mouse();
        let mouse = Vec2::new(mx as f32, my as f32);
        let down = input.is_key_down(Key::Space);
        match self.hold.update(down) {
            Edge::Pressed => {
                self.held = self.grid.system().pick(mouse, GRAB_RADIUS);
            }
            Edge::Released => self.held = None,
            _ => {}
        }
        if let Some(id) = self.held {
            if self.grid.system_mut().move_particle(id, mouse).is_err() {
                self.held = None;
            }
        }

        let config = SolverConfig::new().with_gravity(Vec2::new(self.wind, GRAVITY));
        self.grid.step(dt, &config, &mut NoOpStepObserver);

        self.elapsed += dt;
        self.wind = self.elapsed.sin() * 3.0;
    }

    fn draw(&self, raster: &mut Raster) {
        raster.clear();

        raster.set_char('*');
        for cell in self.grid.cells() {
            let speed = cell.iter().map(|&id| self.speed(id)).sum::<f32>() / 4.0;
            raster.set_color(stress_color(speed));
            let pos: [Vec2<f32>; 4] = cell.map(|id| {
                self.grid.system().particle(id).map_or(Vec2::zero(), |p| p.pos)
            });
            raster.fill_triangle_vec(pos[0], pos[1], pos[2]);
            raster.fill_triangle_vec(pos[1], pos[3], pos[2]);
        }

        raster.set_char('#');
        for s in self.grid.system().springs() {
            let (Some(a), Some(b)) = (self.grid.system().particle(s.a), self.grid.system().particle(s.b))
            else {
                continue;
            };
            raster.set_color(stress_color((a.vel.length() + b.vel.length()) / 2.0));
            raster.draw_line_vec(a.pos, b.pos);
        }

        raster.set_char('\u{2588}');
        for row in 0..ROWS {
            for col in 0..COLS {
                if let Some(id) = self.grid.id(col, row) {
                    raster.set_color(stress_color(self.speed(id)));
                    raster.put_pixel_vec(self.pos(col, row));
                }
            }
        }
    }

    fn title(&self) -> &str {
        "Cloth Sim"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsim::FrameInput;

    #[test]
    fn cloth_hangs_and_renders() {
        let mut cloth = Cloth::new(80, 100).unwrap();
        let top_left = cloth.pos(0, 0);
        let input = FrameInput::new();
        for _ in 0..120 {
            cloth.update(1.0 / 120.0, &input);
        }
        assert_eq!(cloth.pos(0, 0), top_left);
        assert!(cloth.pos(5, 11).y.is_finite());

        let mut raster = Raster::new(80, 100);
        cloth.draw(&mut raster);
        assert!(raster.count_char('#') > 0);
        assert!(raster.count_char('\u{2588}') > 0);
    }

    #[test]
    fn space_drags_the_nearest_node() {
        let mut cloth = Cloth::new(80, 100).unwrap();
        let node = cloth.pos(4, 6);
        let grab = FrameInput::new()
            .with_key(Key::Space)
            .with_mouse(node.x.round() as i32, node.y.round() as i32);
        cloth.update(1.0 / 120.0, &grab);
        assert!(cloth.held.is_some());

        cloth.update(1.0 / 120.0, &FrameInput::new());
        assert!(cloth.held.is_none());
    }

    #[test]
    fn stress_ramp_saturates() {
        assert_eq!(stress_color(0.0), Color::DarkBlue);
        assert_eq!(stress_color(1.0e6), Color::DarkRed);
    }
}
