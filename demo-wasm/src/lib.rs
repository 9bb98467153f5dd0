//! Browser front-ends for the charsim demos.
//!
//! Each demo is a plain [`Simulation`]; the `export_demo!` wrappers own a
//! [`Host`] that feeds it key and mouse events from JavaScript and hands the
//! rendered raster back as text plus one color index per cell.

use charsim::demo::{FrameControl, FrameStats};
use charsim::{run_frame, FrameInput, Key, Raster, Simulation};
use wasm_bindgen::prelude::*;

pub mod cloth;
pub mod fluid;
pub mod sandbox;
pub mod softbody;

pub use cloth::Cloth;
pub use fluid::Fluid;
pub use sandbox::Sandbox;
pub use softbody::SoftBody;

/// Map a `KeyboardEvent.key` name onto a [`Key`].
pub fn parse_key(name: &str) -> Option<Key> {
    let key = match name {
        "Shift" => Key::Shift,
        " " | "Space" | "Spacebar" => Key::Space,
        "Enter" => Key::Enter,
        "Escape" | "Esc" => Key::Escape,
        "ArrowUp" | "Up" => Key::Up,
        "ArrowDown" | "Down" => Key::Down,
        "ArrowLeft" | "Left" => Key::Left,
        "ArrowRight" | "Right" => Key::Right,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
    };
    Some(key)
}

/// Map a `MouseEvent.button` onto a [`Key`].
pub fn mouse_key(button: u8) -> Option<Key> {
    match button {
        0 => Some(Key::MouseLeft),
        2 => Some(Key::MouseRight),
        _ => None,
    }
}

/// Input state, raster and frame counters around one simulation.
pub struct Host<S: Simulation> {
    sim: S,
    input: FrameInput,
    raster: Raster,
    stats: FrameStats,
    running: bool,
}

impl<S: Simulation> Host<S> {
    pub fn new(mut sim: S, width: usize, height: usize) -> Self {
        sim.setup(width, height);
        log::info!("{} ready at {}x{}", sim.title(), width, height);
        Host {
            sim,
            input: FrameInput::new(),
            raster: Raster::new(width, height),
            stats: FrameStats::default(),
            running: true,
        }
    }

    pub fn key_down(&mut self, name: &str) {
        match parse_key(name) {
            Some(key) => self.input.press(key),
            None => log::trace!("ignoring key {:?}", name),
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = parse_key(name) {
            self.input.release(key);
        }
    }

    pub fn mouse_down(&mut self, button: u8) {
        if let Some(key) = mouse_key(button) {
            self.input.press(key);
        }
    }

    pub fn mouse_up(&mut self, button: u8) {
        if let Some(key) = mouse_key(button) {
            self.input.release(key);
        }
    }

    pub fn mouse_move(&mut self, x: i32, y: i32) {
        self.input.set_mouse(x, y);
    }

    /// Run one frame. Returns false once the demo has been exited.
    pub fn frame(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        let control = run_frame(&mut self.sim, &self.input, &mut self.raster, dt, &mut self.stats);
        self.running = control == FrameControl::Continue;
        self.running
    }

    pub fn text(&self) -> String {
        self.raster.to_string()
    }

    /// Console color index of every cell, row-major.
    pub fn colors(&self) -> Vec<u8> {
        self.raster.cells().iter().map(|c| c.color.index()).collect()
    }

    pub fn title(&self) -> String {
        format!("{} @ {}fps", self.sim.title(), self.stats.fps as i32)
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }
}

macro_rules! export_demo {
    ($(#[$meta:meta])* $name:ident, $sim:ty) => {
        $(#[$meta])*
        #[wasm_bindgen]
        pub struct $name {
            host: Host<$sim>,
        }

        #[wasm_bindgen]
        impl $name {
            #[wasm_bindgen(constructor)]
            pub fn new(width: usize, height: usize) -> Result<$name, JsValue> {
                let sim = <$sim>::new(width, height).map_err(|e| JsValue::from_str(&e.to_string()))?;
                Ok($name { host: Host::new(sim, width, height) })
            }

            pub fn key_down(&mut self, key: &str) {
                self.host.key_down(key);
            }

            pub fn key_up(&mut self, key: &str) {
                self.host.key_up(key);
            }

            pub fn mouse_down(&mut self, button: u8) {
                self.host.mouse_down(button);
            }

            pub fn mouse_up(&mut self, button: u8) {
                self.host.mouse_up(button);
            }

            pub fn mouse_move(&mut self, x: i32, y: i32) {
                self.host.mouse_move(x, y);
            }

            /// Advance by `dt` seconds and redraw. False after Escape.
            pub fn frame(&mut self, dt: f32) -> bool {
                self.host.frame(dt)
            }

            pub fn text(&self) -> String {
                self.host.text()
            }

            pub fn colors(&self) -> Vec<u8> {
                self.host.colors()
            }

            pub fn title(&self) -> String {
                self.host.title()
            }
        }
    };
}

export_demo!(
    /// Hanging spring cloth; hold Space to drag a node, R resets.
    ClothDemo,
    Cloth
);
export_demo!(
    /// Stable-fluids smoke; hold Space to stir, 1-3 pick a palette.
    FluidDemo,
    Fluid
);
export_demo!(
    /// Spring lattice tumbling in a box; WASD orbit, arrows zoom, O outlines.
    SoftBodyDemo,
    SoftBody
);
export_demo!(
    /// Node and constraint editor; see [`Sandbox`] for the key map.
    SandboxDemo,
    Sandbox
);
