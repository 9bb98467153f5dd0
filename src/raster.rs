//! Character-cell software rasterizer.
//!
//! A [`Raster`] is a fixed `width x height` grid of [`Cell`]s. Drawing uses a
//! pen: [`Raster::set_char`] and [`Raster::set_color`] pick what every
//! following primitive writes. Coordinates are rounded half away from zero to
//! the nearest cell, and writes outside the grid are dropped.

use alloc::vec::Vec as AllocVec;
use core::fmt;

use crate::float::Float;
use crate::vec::Vec2;

/// The sixteen console colors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Color {
    Black = 0x0,
    DarkBlue = 0x1,
    DarkGreen = 0x2,
    DarkCyan = 0x3,
    DarkRed = 0x4,
    DarkMagenta = 0x5,
    DarkYellow = 0x6,
    Grey = 0x7,
    DarkGrey = 0x8,
    Blue = 0x9,
    Green = 0xA,
    Cyan = 0xB,
    Red = 0xC,
    Magenta = 0xD,
    Yellow = 0xE,
    #[default]
    White = 0xF,
}

impl Color {
    pub const ALL: [Color; 16] = [
        Color::Black,
        Color::DarkBlue,
        Color::DarkGreen,
        Color::DarkCyan,
        Color::DarkRed,
        Color::DarkMagenta,
        Color::DarkYellow,
        Color::Grey,
        Color::DarkGrey,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Yellow,
        Color::White,
    ];

    /// Console attribute value.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Color for the low four bits of `index`.
    pub fn from_index(index: u8) -> Color {
        Color::ALL[(index & 0xF) as usize]
    }
}

/// One character cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub const fn new(ch: char, color: Color) -> Self {
        Cell { ch, color }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new(' ', Color::White)
    }
}

#[inline]
fn to_cell(v: f32) -> i32 {
    libm::roundf(v) as i32
}

/// NaN would round to cell 0 and infinities to the `i32` limits.
fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Fixed-size character and color buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    cells: AllocVec<Cell>,
    pen: Cell,
}

impl Raster {
    /// A blank raster with the pen set to a white space.
    pub fn new(width: usize, height: usize) -> Self {
        Raster {
            width,
            height,
            cells: alloc::vec![Cell::default(); width * height],
            pen: Cell::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_char(&mut self, ch: char) {
        self.pen.ch = ch;
    }

    pub fn set_color(&mut self, color: Color) {
        self.pen.color = color;
    }

    pub fn pen(&self) -> Cell {
        self.pen
    }

    /// Reset every cell to a white space. The pen is unchanged.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Overwrite every cell with the pen.
    pub fn fill(&mut self) {
        let pen = self.pen;
        self.cells.fill(pen);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[x + y * self.width])
        } else {
            None
        }
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        (y < self.height).then(|| &self.cells[y * self.width..(y + 1) * self.width])
    }

    /// Characters of row `y` as a string.
    pub fn row_text(&self, y: usize) -> alloc::string::String {
        self.row(y).map(|r| r.iter().map(|c| c.ch).collect()).unwrap_or_default()
    }

    /// Number of cells holding `ch`.
    pub fn count_char(&self, ch: char) -> usize {
        self.cells.iter().filter(|c| c.ch == ch).count()
    }

    fn plot(&mut self, x: i64, y: i64) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let k = x as usize + y as usize * self.width;
            self.cells[k] = self.pen;
        }
    }

    fn hspan(&mut self, x0: i64, x1: i64, y: i64) {
        if y < 0 || y >= self.height as i64 {
            return;
        }
        let lo = x0.max(0);
        let hi = x1.min(self.width as i64 - 1);
        for x in lo..=hi {
            self.plot(x, y);
        }
    }

    fn vspan(&mut self, x: i64, y0: i64, y1: i64) {
        if x < 0 || x >= self.width as i64 {
            return;
        }
        let lo = y0.max(0);
        let hi = y1.min(self.height as i64 - 1);
        for y in lo..=hi {
            self.plot(x, y);
        }
    }

    /// Plot the cell nearest `(x, y)`. Non-finite coordinates are skipped.
    pub fn put_pixel(&mut self, x: f32, y: f32) {
        if !all_finite(&[x, y]) {
            return;
        }
        self.plot(to_cell(x) as i64, to_cell(y) as i64);
    }

    pub fn put_pixel_vec<F: Float>(&mut self, p: Vec2<F>) {
        self.put_pixel(p.x.to_f32(), p.y.to_f32());
    }

    /// Bresenham line, endpoints inclusive.
    ///
    /// Endpoints far outside the raster are first clipped to a window around
    /// it so the walk stays bounded. Lines with a non-finite coordinate are
    /// skipped.
    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let Some((x1, y1, x2, y2)) = self.clip_far(x1 as f64, y1 as f64, x2 as f64, y2 as f64)
        else {
            return;
        };
        let r = |v: f64| libm::round(v) as i64;
        self.bresenham(r(x1), r(y1), r(x2), r(y2));
    }

    pub fn draw_line_vec<F: Float>(&mut self, a: Vec2<F>, b: Vec2<F>) {
        self.draw_line(a.x.to_f32(), a.y.to_f32(), b.x.to_f32(), b.y.to_f32());
    }

    fn clip_far(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Option<(f64, f64, f64, f64)> {
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return None;
        }
        let margin = (self.width + self.height) as f64 + 1.0;
        let (xmin, ymin) = (-margin, -margin);
        let (xmax, ymax) = (self.width as f64 + margin, self.height as f64 + margin);
        let inside = |x: f64, y: f64| x >= xmin && x <= xmax && y >= ymin && y <= ymax;
        if inside(x1, y1) && inside(x2, y2) {
            return Some((x1, y1, x2, y2));
        }

        // Liang-Barsky
        let (dx, dy) = (x2 - x1, y2 - y1);
        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [(-dx, x1 - xmin), (dx, xmax - x1), (-dy, y1 - ymin), (dy, ymax - y1)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        Some((x1 + dx * t0, y1 + dy * t0, x1 + dx * t1, y1 + dy * t1))
    }

    fn bresenham(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        let (dx, dy) = (x2 - x1, y2 - y1);
        if dx == 0 {
            self.vspan(x1, y1.min(y2), y1.max(y2));
            return;
        }
        if dy == 0 {
            self.hspan(x1.min(x2), x1.max(x2), y1);
            return;
        }
        let (dx1, dy1) = (dx.abs(), dy.abs());
        let step = if (dx < 0 && dy < 0) || (dx > 0 && dy > 0) { 1 } else { -1 };
        if dy1 <= dx1 {
            let (mut x, mut y, xe) = if dx >= 0 { (x1, y1, x2) } else { (x2, y2, x1) };
            let mut px = 2 * dy1 - dx1;
            self.plot(x, y);
            while x < xe {
                x += 1;
                if px < 0 {
                    px += 2 * dy1;
                } else {
                    y += step;
                    px += 2 * (dy1 - dx1);
                }
                self.plot(x, y);
            }
        } else {
            let (mut x, mut y, ye) = if dy >= 0 { (x1, y1, y2) } else { (x2, y2, y1) };
            let mut py = 2 * dx1 - dy1;
            self.plot(x, y);
            while y < ye {
                y += 1;
                if py <= 0 {
                    py += 2 * dx1;
                } else {
                    x += step;
                    py += 2 * (dx1 - dy1);
                }
                self.plot(x, y);
            }
        }
    }

    /// Triangle outline as three lines.
    pub fn draw_triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.draw_line(x1, y1, x2, y2);
        self.draw_line(x2, y2, x3, y3);
        self.draw_line(x3, y3, x1, y1);
    }

    pub fn draw_triangle_vec<F: Float>(&mut self, a: Vec2<F>, b: Vec2<F>, c: Vec2<F>) {
        self.draw_line_vec(a, b);
        self.draw_line_vec(b, c);
        self.draw_line_vec(c, a);
    }

    /// Scanline triangle fill.
    ///
    /// Each row spans the leftmost to rightmost crossing of the edges that
    /// cover it; horizontal edges contribute both endpoints, so flat and
    /// collinear triangles still draw a line of cells.
    pub fn fill_triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        if !all_finite(&[x1, y1, x2, y2, x3, y3]) {
            return;
        }
        let mut v = [
            (to_cell(x1) as i64, to_cell(y1) as i64),
            (to_cell(x2) as i64, to_cell(y2) as i64),
            (to_cell(x3) as i64, to_cell(y3) as i64),
        ];
        v.sort_by_key(|p| p.1);
        let top = v[0].1.max(0);
        let bottom = v[2].1.min(self.height as i64 - 1);
        let edges = [(v[0], v[1]), (v[1], v[2]), (v[0], v[2])];
        for y in top..=bottom {
            let mut lo = i64::MAX;
            let mut hi = i64::MIN;
            for &(a, b) in &edges {
                if y < a.1 || y > b.1 {
                    continue;
                }
                if a.1 == b.1 {
                    lo = lo.min(a.0.min(b.0));
                    hi = hi.max(a.0.max(b.0));
                } else {
                    let t = (y - a.1) as f64 / (b.1 - a.1) as f64;
                    let x = libm::round(a.0 as f64 + (b.0 - a.0) as f64 * t) as i64;
                    lo = lo.min(x);
                    hi = hi.max(x);
                }
            }
            if lo <= hi {
                self.hspan(lo, hi, y);
            }
        }
    }

    pub fn fill_triangle_vec<F: Float>(&mut self, a: Vec2<F>, b: Vec2<F>, c: Vec2<F>) {
        self.fill_triangle(
            a.x.to_f32(),
            a.y.to_f32(),
            b.x.to_f32(),
            b.y.to_f32(),
            c.x.to_f32(),
            c.y.to_f32(),
        );
    }

    /// Circles whose box misses the raster, or whose ring lies wholly
    /// outside it, draw nothing. Returns the rounded centre and radius.
    fn circle_params(&self, x: f32, y: f32, r: f32) -> Option<(i64, i64, i64)> {
        if !all_finite(&[x, y, r]) {
            return None;
        }
        let (xc, yc, r) = (to_cell(x) as i64, to_cell(y) as i64, to_cell(r) as i64);
        if r <= 0 {
            return None;
        }
        let (w, h) = (self.width as i64, self.height as i64);
        if xc + r < 0 || yc + r < 0 || xc - r >= w || yc - r >= h {
            return None;
        }
        Some((xc, yc, r))
    }

    /// True when every raster corner is strictly inside the circle.
    fn covers_raster(&self, xc: i64, yc: i64, r: i64) -> bool {
        let (w, h) = (self.width as i64, self.height as i64);
        [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)].iter().all(|&(cx, cy)| {
            let (dx, dy) = ((cx - xc) as i128, (cy - yc) as i128);
            dx * dx + dy * dy < ((r - 1) as i128) * ((r - 1) as i128)
        })
    }

    /// Midpoint circle outline.
    pub fn draw_circle(&mut self, x: f32, y: f32, r: f32) {
        let Some((xc, yc, r)) = self.circle_params(x, y, r) else {
            return;
        };
        if self.covers_raster(xc, yc, r) {
            return;
        }
        let (mut px, mut py) = (0i64, r);
        let mut p = 3 - 2 * r;
        while py >= px {
            self.plot(xc - px, yc - py);
            self.plot(xc - py, yc - px);
            self.plot(xc + py, yc - px);
            self.plot(xc + px, yc - py);
            self.plot(xc - px, yc + py);
            self.plot(xc - py, yc + px);
            self.plot(xc + py, yc + px);
            self.plot(xc + px, yc + py);
            if p < 0 {
                p += 4 * px + 6;
            } else {
                p += 4 * (px - py) + 10;
                py -= 1;
            }
            px += 1;
        }
    }

    pub fn draw_circle_vec<F: Float>(&mut self, c: Vec2<F>, r: F) {
        self.draw_circle(c.x.to_f32(), c.y.to_f32(), r.to_f32());
    }

    /// Midpoint circle filled with horizontal spans.
    pub fn fill_circle(&mut self, x: f32, y: f32, r: f32) {
        let Some((xc, yc, r)) = self.circle_params(x, y, r) else {
            return;
        };
        if self.covers_raster(xc, yc, r) {
            self.fill();
            return;
        }
        let (mut px, mut py) = (0i64, r);
        let mut p = 3 - 2 * r;
        while py >= px {
            self.hspan(xc - px, xc + px, yc - py);
            self.hspan(xc - py, xc + py, yc - px);
            self.hspan(xc - px, xc + px, yc + py);
            self.hspan(xc - py, xc + py, yc + px);
            if p < 0 {
                p += 4 * px + 6;
            } else {
                p += 4 * (px - py) + 10;
                py -= 1;
            }
            px += 1;
        }
    }

    pub fn fill_circle_vec<F: Float>(&mut self, c: Vec2<F>, r: F) {
        self.fill_circle(c.x.to_f32(), c.y.to_f32(), r.to_f32());
    }

    /// Rectangle outline covering `w` columns and `h` rows from `(x, y)`.
    pub fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if !all_finite(&[x, y, w, h]) {
            return;
        }
        let (x, y) = (to_cell(x) as i64, to_cell(y) as i64);
        let (w, h) = (to_cell(w) as i64, to_cell(h) as i64);
        if w <= 0 || h <= 0 {
            return;
        }
        self.hspan(x + 1, x + w - 1, y);
        self.vspan(x + w - 1, y + 1, y + h - 1);
        self.hspan(x, x + w - 1, y + h - 1);
        self.vspan(x, y, y + h - 1);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if !all_finite(&[x, y, w, h]) {
            return;
        }
        let (x, y) = (to_cell(x) as i64, to_cell(y) as i64);
        let (w, h) = (to_cell(w) as i64, to_cell(h) as i64);
        let top = y.max(0);
        let bottom = (y + h - 1).min(self.height as i64 - 1);
        for row in top..=bottom {
            self.hspan(x, x + w - 1, row);
        }
    }

    /// Write `text` left to right from `(x, y)` in the pen color. The pen
    /// character is restored afterwards.
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        if !all_finite(&[x, y]) {
            return;
        }
        let saved = self.pen.ch;
        let (x, y) = (to_cell(x) as i64, to_cell(y) as i64);
        for (i, ch) in text.chars().enumerate() {
            self.pen.ch = ch;
            self.plot(x + i as i64, y);
        }
        self.pen.ch = saved;
    }
}

impl fmt::Display for Raster {
    /// Rows of characters separated by `\n`, without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for y in 0..self.height {
            if y > 0 {
                f.write_char('\n')?;
            }
            for cell in &self.cells[y * self.width..(y + 1) * self.width] {
                f.write_char(cell.ch)?;
            }
        }
        Ok(())
    }
}
