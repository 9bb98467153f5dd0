//! Frame loop contract between a host (terminal, browser, test harness) and a
//! simulation.
//!
//! Each frame the host samples input, then calls [`run_frame`], which updates
//! the simulation with the elapsed time and draws it into a [`Raster`]. The
//! host owns the clock and the output device.

use alloc::vec::Vec as AllocVec;

use crate::raster::Raster;

/// Keys a simulation can poll.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable key, compared case-insensitively by [`FrameInput`].
    Char(char),
    Shift,
    Space,
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
    MouseLeft,
    MouseRight,
}

/// Poll-style input sampled once per frame.
pub trait Input {
    fn is_key_down(&self, key: Key) -> bool;

    /// Pointer position in raster cells.
    fn mouse(&self) -> (i32, i32);
}

/// A plain input snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    keys: AllocVec<Key>,
    mouse: (i32, i32),
}

fn normalize(key: Key) -> Key {
    match key {
        Key::Char(c) => Key::Char(c.to_ascii_uppercase()),
        other => other,
    }
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        let key = normalize(key);
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        let key = normalize(key);
        self.keys.retain(|k| *k != key);
    }

    pub fn set_mouse(&mut self, x: i32, y: i32) {
        self.mouse = (x, y);
    }

    pub fn with_key(mut self, key: Key) -> Self {
        self.press(key);
        self
    }

    pub fn with_mouse(mut self, x: i32, y: i32) -> Self {
        self.mouse = (x, y);
        self
    }
}

impl Input for FrameInput {
    fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&normalize(key))
    }

    fn mouse(&self) -> (i32, i32) {
        self.mouse
    }
}

/// Rising/falling edge detector for a held key, the toggle-on-press pattern.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyLatch {
    down: bool,
}

/// Change reported by [`KeyLatch::update`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
    Held,
    Idle,
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, is_down: bool) -> Edge {
        let edge = match (self.down, is_down) {
            (false, true) => Edge::Pressed,
            (true, false) => Edge::Released,
            (true, true) => Edge::Held,
            (false, false) => Edge::Idle,
        };
        self.down = is_down;
        edge
    }

    /// True only on the frame the key goes down.
    pub fn pressed(&mut self, is_down: bool) -> bool {
        self.update(is_down) == Edge::Pressed
    }

    /// Poll `key` from `input` and report a press.
    pub fn poll(&mut self, input: &dyn Input, key: Key) -> bool {
        self.pressed(input.is_key_down(key))
    }

    pub fn is_down(&self) -> bool {
        self.down
    }
}

/// An interactive simulation driven one frame at a time.
pub trait Simulation {
    /// (Re)initialize state for a raster of the given size.
    fn setup(&mut self, width: usize, height: usize);

    /// Advance by `dt` seconds of wall-clock time.
    fn update(&mut self, dt: f32, input: &dyn Input);

    /// Render the current state.
    fn draw(&self, raster: &mut Raster);

    /// Window title text.
    fn title(&self) -> &str {
        "charsim"
    }
}

/// Running frame statistics.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub elapsed: f32,
    pub fps: f32,
}

/// Whether the host should keep looping.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Exit,
}

/// One iteration of the host loop: escape check, update, draw.
///
/// Escape ends the loop before the simulation sees the frame.
pub fn run_frame<S: Simulation + ?Sized>(
    sim: &mut S,
    input: &dyn Input,
    raster: &mut Raster,
    dt: f32,
    stats: &mut FrameStats,
) -> FrameControl {
    if input.is_key_down(Key::Escape) {
        log::debug!("escape pressed after {} frames", stats.frames);
        return FrameControl::Exit;
    }
    sim.update(dt, input);
    stats.frames += 1;
    stats.elapsed += dt;
    stats.fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
    sim.draw(raster);
    FrameControl::Continue
}
