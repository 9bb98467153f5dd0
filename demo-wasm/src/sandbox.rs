//! Interactive node and constraint editor.
//!
//! | Key          | Action                                               |
//! |--------------|------------------------------------------------------|
//! | Space        | pause / resume                                       |
//! | A            | add a node at the pointer                            |
//! | D (held)     | delete nodes under the pointer                       |
//! | C (hold)     | press on one node, release on another: stick         |
//! | S (hold)     | press on one node, release on another: spring        |
//! | L            | lock / unlock the node under the pointer             |
//! | Left mouse   | hold a node; moves it while paused, tugs it running  |
//!
//! Any edit pauses the simulation.

use charsim::demo::Edge;
use charsim::{
    Aabb, BoundaryResponse, Color, Input, Integrator, Key, KeyLatch, NoOpStepObserver, Particle,
    ParticleId, ParticleSystem, PhysicsError, Raster, Schedule, Simulation, SolverConfig, Vec2,
};
use charsim::Vec as _;

const POINT_SIZE: f32 = 2.49;
const ZIGZAG: f32 = 3.0;
/// Tether strength while running.
const PULL: f32 = 16.7;
const SUB_STEPS: usize = 4;
const DRAG: f32 = 0.09;
const GRAVITY: f32 = 32.0;
const STIFFNESS: f32 = 240.45;
const DAMPING: f32 = 4.32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Link {
    Stick,
    Spring,
}

/// A press-and-release connection in progress.
struct Connector {
    latch: KeyLatch,
    start: Option<ParticleId>,
}

impl Connector {
    fn new() -> Self {
        Connector { latch: KeyLatch::new(), start: None }
    }
}

pub struct Sandbox {
    system: ParticleSystem<Vec2<f32>>,
    config: SolverConfig<Vec2<f32>>,
    running: bool,
    elapsed: f32,
    mouse: Vec2<f32>,
    pause_key: KeyLatch,
    add_key: KeyLatch,
    lock_key: KeyLatch,
    hold_key: KeyLatch,
    held: Option<ParticleId>,
    sticks: Connector,
    springs: Connector,
    title: String,
}

fn solver(width: usize, height: usize) -> SolverConfig<Vec2<f32>> {
    let bounds = Aabb::new(Vec2::zero(), Vec2::new(width as f32, height as f32));
    SolverConfig::new()
        .with_integrator(Integrator::Verlet)
        .with_schedule(Schedule::ConstraintsFirst)
        .with_sub_steps(SUB_STEPS)
        .with_drag(DRAG)
        .with_gravity(Vec2::new(0.0, GRAVITY))
        .with_bounds(bounds, BoundaryResponse::Reflect)
}

fn zigzag(a: Vec2<f32>, b: Vec2<f32>) -> Vec<Vec2<f32>> {
    let along = b - a;
    let len = along.length();
    let tangent = along.normalize();
    let normal = tangent.perp();
    let mut points = vec![a];
    let mut sign = 1.0;
    let mut t = 0.0;
    while t < len {
        points.push(a + tangent * t + normal * (ZIGZAG * sign));
        t += ZIGZAG;
        sign = -sign;
    }
    points.push(b);
    points
}

impl Sandbox {
    pub fn new(width: usize, height: usize) -> Result<Self, PhysicsError> {
        if width == 0 || height == 0 {
            return Err(PhysicsError::InvalidGridDimensions { cols: width, rows: height });
        }
        Ok(Sandbox {
            system: ParticleSystem::new(),
            config: solver(width, height),
            running: false,
            elapsed: 0.0,
            mouse: Vec2::zero(),
            pause_key: KeyLatch::new(),
            add_key: KeyLatch::new(),
            lock_key: KeyLatch::new(),
            hold_key: KeyLatch::new(),
            held: None,
            sticks: Connector::new(),
            springs: Connector::new(),
            title: String::from("Physics Drawer [not running]"),
        })
    }

    pub fn system(&self) -> &ParticleSystem<Vec2<f32>> {
        &self.system
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn hover(&self) -> Option<ParticleId> {
        self.system.pick(self.mouse, POINT_SIZE)
    }

    /// Returns whether the edge changed the key state.
    fn connect(&mut self, link: Link, down: bool) -> bool {
        let target = self.hover();
        let connector = match link {
            Link::Stick => &mut self.sticks,
            Link::Spring => &mut self.springs,
        };
        match connector.latch.update(down) {
            Edge::Pressed => {
                connector.start = target;
                true
            }
            Edge::Released => {
                let start = connector.start.take();
                if let (Some(a), Some(b)) = (start, target) {
                    let made = match link {
                        Link::Stick => self.system.connect_stick(a, b),
                        Link::Spring => self.system.connect_spring(a, b, STIFFNESS, DAMPING),
                    };
                    if let Err(e) = made {
                        log::debug!("no {:?} made: {}", link, e);
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn add_node(&mut self) {
        if self.system.pick(self.mouse, POINT_SIZE * 2.0).is_none() {
            self.system.add_particle(Particle::at(self.mouse).with_radius(POINT_SIZE));
        }
    }

    fn delete_nodes(&mut self) {
        while let Some(id) = self.hover() {
            self.system.remove_particle(id);
        }
    }

    fn stop_editing(&mut self) {
        self.sticks.start = None;
        self.springs.start = None;
        self.held = None;
        self.system.release();
    }

    fn drag_held(&mut self) {
        let Some(id) = self.held else {
            self.system.release();
            return;
        };
        if self.running {
            if self.system.grabbed() != Some(id) {
                if self.system.grab(id, self.mouse, PULL).is_err() {
                    self.held = None;
                }
            } else {
                self.system.set_grab_target(self.mouse);
            }
        } else {
            self.system.release();
            if self.system.move_particle(id, self.mouse).is_ok() {
                self.system.rebase_constraints(id);
            } else {
                self.held = None;
            }
        }
    }

    fn draw_marker(&self, raster: &mut Raster, id: Option<ParticleId>, color: Color) {
        if let Some(p) = id.and_then(|id| self.system.particle(id)) {
            raster.set_color(color);
            raster.draw_circle_vec(p.pos, POINT_SIZE);
        }
    }

    fn draw_connector(&self, raster: &mut Raster, connector: &Connector, colors: (Color, Color)) {
        let Some(p) = connector.start.and_then(|id| self.system.particle(id)) else {
            return;
        };
        let blink = self.elapsed - self.elapsed.floor() > 0.5;
        raster.set_color(if blink { colors.0 } else { colors.1 });
        raster.draw_circle_vec(p.pos, POINT_SIZE);
        raster.draw_line_vec(p.pos, self.mouse);
    }
}

impl Simulation for Sandbox {
    fn setup(&mut self, width: usize, height: usize) {
        self.system.clear();
        self.config = solver(width, height);
        self.running = false;
        self.stop_editing();
    }

    fn update(&mut self, dt: f32, input: &dyn Input) {
        self.elapsed += dt;
        let (mx, my) = input.mouse();
        self.mouse = Vec2::new(mx as f32, my as f32);

        if self.pause_key.poll(input, Key::Space) {
            self.stop_editing();
            self.running = !self.running;
        }

        let mut edited = self.connect(Link::Stick, input.is_key_down(Key::Char('C')));
        edited |= self.connect(Link::Spring, input.is_key_down(Key::Char('S')));
        if self.add_key.poll(input, Key::Char('A')) {
            self.add_node();
            edited = true;
        }
        if input.is_key_down(Key::Char('D')) {
            self.delete_nodes();
            edited = true;
        }
        if edited {
            self.running = false;
        }

        match self.hold_key.update(input.is_key_down(Key::MouseLeft)) {
            Edge::Pressed => self.held = self.hover(),
            Edge::Released => self.held = None,
            _ => {}
        }
        if self.lock_key.poll(input, Key::Char('L')) {
            if let Some(id) = self.hover() {
                let _ = self.system.toggle_lock(id);
            }
        }
        self.drag_held();

        if self.running {
            self.system.step(dt, &self.config, &mut NoOpStepObserver);
        }

        let state = if self.running { "running" } else { "not running" };
        self.title = format!("Physics Drawer [{}]", state);
    }

    fn draw(&self, raster: &mut Raster) {
        raster.clear();
        raster.set_char('\u{2588}');
        if !self.running {
            raster.set_color(Color::DarkRed);
            raster.draw_rect(0.0, 0.0, raster.width() as f32, raster.height() as f32);
        }

        let ends = |a: ParticleId, b: ParticleId| {
            Some((self.system.particle(a)?.pos, self.system.particle(b)?.pos))
        };

        raster.set_color(Color::DarkGrey);
        for s in self.system.sticks() {
            if let Some((a, b)) = ends(s.a, s.b) {
                raster.draw_line_vec(a, b);
            }
        }

        raster.set_color(Color::White);
        for s in self.system.springs() {
            if let Some((a, b)) = ends(s.a, s.b) {
                for pair in zigzag(a, b).windows(2) {
                    raster.draw_line_vec(pair[0], pair[1]);
                }
            }
        }

        for p in self.system.particles().values() {
            raster.set_color(Color::White);
            raster.fill_circle_vec(p.pos, POINT_SIZE);
            if p.locked {
                raster.set_color(Color::DarkRed);
                raster.draw_circle_vec(p.pos, POINT_SIZE);
            }
        }

        self.draw_marker(raster, self.hover(), Color::Green);
        self.draw_marker(raster, self.held, Color::Cyan);
        self.draw_connector(raster, &self.sticks, (Color::DarkMagenta, Color::DarkBlue));
        self.draw_connector(raster, &self.springs, (Color::DarkGreen, Color::DarkYellow));
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsim::FrameInput;

    const DT: f32 = 1.0 / 60.0;

    fn at(x: i32, y: i32) -> FrameInput {
        FrameInput::new().with_mouse(x, y)
    }

    fn tap(sim: &mut Sandbox, key: Key, x: i32, y: i32) {
        sim.update(DT, &at(x, y).with_key(key));
        sim.update(DT, &at(x, y));
    }

    /// Press `key` over one point and release it over another.
    fn drag_key(sim: &mut Sandbox, key: Key, from: (i32, i32), to: (i32, i32)) {
        sim.update(DT, &at(from.0, from.1).with_key(key));
        sim.update(DT, &at(to.0, to.1).with_key(key));
        sim.update(DT, &at(to.0, to.1));
    }

    #[test]
    fn build_a_pendulum_and_run_it() {
        let mut sim = Sandbox::new(240, 135).unwrap();
        tap(&mut sim, Key::Char('A'), 100, 20);
        tap(&mut sim, Key::Char('A'), 130, 20);
        tap(&mut sim, Key::Char('A'), 100, 20);
        assert_eq!(sim.system().particle_count(), 2, "nodes too close are refused");

        tap(&mut sim, Key::Char('L'), 100, 20);
        drag_key(&mut sim, Key::Char('C'), (100, 20), (130, 20));
        assert_eq!(sim.system().stick_count(), 1);
        assert!(!sim.is_running());

        tap(&mut sim, Key::Space, 0, 0);
        assert!(sim.is_running());
        for _ in 0..120 {
            sim.update(DT, &at(0, 0));
        }
        let pos = sim.system().positions();
        assert_eq!(pos[0], Vec2::new(100.0, 20.0));
        assert!(pos[1].y > 20.0, "free end should swing down");
        assert!((pos[0].distance(pos[1]) - 30.0).abs() < 1.0);
    }

    #[test]
    fn springs_need_two_distinct_nodes() {
        let mut sim = Sandbox::new(240, 135).unwrap();
        tap(&mut sim, Key::Char('A'), 50, 50);
        drag_key(&mut sim, Key::Char('S'), (50, 50), (50, 50));
        drag_key(&mut sim, Key::Char('S'), (50, 50), (200, 100));
        assert_eq!(sim.system().spring_count(), 0);

        tap(&mut sim, Key::Char('A'), 80, 50);
        drag_key(&mut sim, Key::Char('S'), (50, 50), (80, 50));
        assert_eq!(sim.system().spring_count(), 1);

        let mut raster = Raster::new(240, 135);
        sim.draw(&mut raster);
        assert!(raster.count_char('\u{2588}') > 0);
    }

    #[test]
    fn deleting_a_node_drops_its_links() {
        let mut sim = Sandbox::new(240, 135).unwrap();
        for x in [40, 70, 100] {
            tap(&mut sim, Key::Char('A'), x, 60);
        }
        drag_key(&mut sim, Key::Char('C'), (40, 60), (70, 60));
        drag_key(&mut sim, Key::Char('S'), (70, 60), (100, 60));
        tap(&mut sim, Key::Char('D'), 70, 60);
        assert_eq!(sim.system().particle_count(), 2);
        assert_eq!(sim.system().stick_count(), 0);
        assert_eq!(sim.system().spring_count(), 0);
    }

    #[test]
    fn paused_drag_reshapes_links() {
        let mut sim = Sandbox::new(240, 135).unwrap();
        tap(&mut sim, Key::Char('A'), 40, 60);
        tap(&mut sim, Key::Char('A'), 70, 60);
        drag_key(&mut sim, Key::Char('C'), (40, 60), (70, 60));

        sim.update(DT, &at(70, 60).with_key(Key::MouseLeft));
        sim.update(DT, &at(90, 60).with_key(Key::MouseLeft));
        sim.update(DT, &at(90, 60));
        assert_eq!(sim.system().sticks()[0].rest_length, 50.0);
    }

    #[test]
    fn zigzag_ends_on_the_endpoints() {
        let pts = zigzag(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert_eq!(pts.first(), Some(&Vec2::new(0.0, 0.0)));
        assert_eq!(pts.last(), Some(&Vec2::new(10.0, 0.0)));
        assert_eq!(zigzag(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)).len(), 2);
    }
}
