use charsim::projection::{draw_box_wireframe, render_mesh, resolve_all};
use charsim::{
    Aabb, BoundaryResponse, Camera, Float, Input, Key, KeyLatch, LatticeConfig, MeshStyle,
    NoOpStepObserver, PhysicsError, Raster, Simulation, SoftBody3d, SolverConfig, Vec, Vec2, Vec3,
};

const YAW: f32 = 2.074755;
const PITCH: f32 = -1.060102;
const ZOOM: f32 = 82.45;
/// Camera distance used for culling and depth sorting.
const EYE_DISTANCE: f32 = 5.0;
/// Explicit Euler needs a few sub-steps at display frame rates for these
/// spring constants.
const SUB_STEPS: usize = 4;
const OUTLINE: char = '\u{2588}';

fn build() -> Result<SoftBody3d<f32>, PhysicsError> {
    SoftBody3d::new(&LatticeConfig::new(4, 6, 4))
}

fn map(v: f32, lo: f32, hi: f32) -> f32 {
    v.map_range(-1.0, 1.0, lo, hi)
}

/// A spring lattice tumbling inside a unit box under drifting gravity.
pub struct SoftBody {
    body: SoftBody3d<f32>,
    bounds: Aabb<Vec3<f32>>,
    camera: Camera<f32>,
    gravity: Vec3<f32>,
    width: usize,
    height: usize,
    elapsed: f32,
    show_outline: bool,
    outline_key: KeyLatch,
}

impl SoftBody {
    pub fn new(width: usize, height: usize) -> Result<Self, PhysicsError> {
        let center = Vec2::new((width / 2) as f32, (height / 2) as f32);
        Ok(SoftBody {
            body: build()?,
            bounds: Aabb::from_center_radius(Vec3::zero(), 0.5),
            camera: Camera::new(YAW, PITCH, ZOOM, center),
            gravity: Vec3::zero(),
            width,
            height,
            elapsed: 0.0,
            show_outline: true,
            outline_key: KeyLatch::new(),
        })
    }

    pub fn body(&self) -> &SoftBody3d<f32> {
        &self.body
    }

    pub fn camera(&self) -> &Camera<f32> {
        &self.camera
    }

    fn solver(&self) -> SolverConfig<Vec3<f32>> {
        SolverConfig::new()
            .with_gravity(self.gravity)
            .with_bounds(self.bounds, BoundaryResponse::Reflect)
            .with_iterations(1)
            .with_sub_steps(SUB_STEPS)
    }
}

impl Simulation for SoftBody {
    fn setup(&mut self, width: usize, height: usize) {
        match build() {
            Ok(body) => self.body = body,
            Err(e) => log::error!("lattice rebuild failed: {}", e),
        }
        self.camera.center = Vec2::new((width / 2) as f32, (height / 2) as f32);
        self.width = width;
        self.height = height;
    }

    fn update(&mut self, dt: f32, input: &dyn Input) {
        if self.outline_key.poll(input, Key::Char('O')) {
            self.show_outline = !self.show_outline;
        }

        let mut turn = f32::pi() / 2.0;
        if input.is_key_down(Key::Shift) {
            turn /= 5.0;
        }
        let axis = |neg: char, pos: char| {
            let mut v = 0.0;
            if input.is_key_down(Key::Char(neg)) {
                v -= 1.0;
            }
            if input.is_key_down(Key::Char(pos)) {
                v += 1.0;
            }
            v
        };
        let (d_yaw, d_pitch) = (axis('A', 'D'), axis('W', 'S'));
        self.camera.orbit(d_yaw * turn * dt, d_pitch * turn * dt);

        if input.is_key_down(Key::Char('R')) {
            self.setup(self.width, self.height);
        }
        if input.is_key_down(Key::Up) {
            self.camera.zoom_by(15.0 * dt);
        }
        if input.is_key_down(Key::Down) {
            self.camera.zoom_by(-15.0 * dt);
        }

        let config = self.solver();
        self.body.step(dt, &config, &mut NoOpStepObserver);

        self.elapsed += dt;
        let t = self.elapsed;
        self.gravity = Vec3::new(
            map(t.sin(), 1.0, -1.0),
            map((t + 0.3).sin(), 4.0, -4.0),
            map((t - 0.3).sin(), 1.0, -1.0),
        );
    }

    fn draw(&self, raster: &mut Raster) {
        raster.clear();
        raster.set_char(OUTLINE);
        draw_box_wireframe(raster, &self.camera, &self.bounds);

        let style = MeshStyle::new(Vec3::new(1.0, -1.0, 1.0))
            .with_outline(self.show_outline.then_some(OUTLINE));
        let eye = self.camera.orbit_position(EYE_DISTANCE);
        let tris = resolve_all(self.body.triangles(), self.body.system().particles());
        render_mesh(raster, &self.camera, eye, &style, tris);
    }

    fn title(&self) -> &str {
        "3D SoftBody Sim"
    }
}
