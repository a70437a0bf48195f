//! Column-maximum composite figure.

use tracing::debug;

use gridding::CartesianGrid;
use radar_common::RadarResult;

use crate::colormap::Colormap;
use crate::font;
use crate::png;

/// Square figure edge, pixels.
pub const FIGURE_SIZE_PX: usize = 800;

const MARGIN_LEFT: usize = 70;
const MARGIN_TOP: usize = 60;
const PLOT_SIDE: usize = 620;
const COLORBAR_X: usize = 716;
const COLORBAR_WIDTH: usize = 30;

// Dark background theme
const FIGURE_BG: [u8; 3] = [16, 16, 20];
const PLOT_BG: [u8; 3] = [0, 0, 0];
const FRAME: [u8; 3] = [208, 208, 208];
const TEXT: [u8; 3] = [230, 230, 230];

/// A fixed-size RGBA pixel buffer.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: [u8; 3]) -> Self {
        let mut pixels = vec![255u8; width * height * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[..3].copy_from_slice(&background);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Write one opaque pixel; out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        self.pixels[idx..idx + 3].copy_from_slice(&color);
        self.pixels[idx + 3] = 255;
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, color: [u8; 3]) {
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// One-pixel rectangle outline.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: usize, h: usize, color: [u8; 3]) {
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h as i32 - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w as i32 - 1, y, 1, h, color);
    }
}

/// Kilometer spacing of the distance ticks for a half-extent.
fn tick_step_km(half_extent_km: f32) -> f32 {
    if half_extent_km >= 200.0 {
        100.0
    } else if half_extent_km >= 100.0 {
        50.0
    } else {
        25.0
    }
}

/// Render the column maximum of a gridded volume as a themed PNG.
pub fn render_composite(grid: &CartesianGrid, caption: &str) -> RadarResult<Vec<u8>> {
    let (_, ny, nx) = grid.shape();
    let composite = grid.column_max();
    let colormap = Colormap::reflectivity();

    let mut canvas = Canvas::new(FIGURE_SIZE_PX, FIGURE_SIZE_PX, FIGURE_BG);

    // Field, nearest-sampled up to the plot area with north at the top
    for py in 0..PLOT_SIDE {
        let src_y = ny - 1 - py * ny / PLOT_SIDE;
        for px in 0..PLOT_SIDE {
            let src_x = px * nx / PLOT_SIDE;
            let value = composite[src_y * nx + src_x];
            let color = if value.is_nan() {
                PLOT_BG
            } else {
                colormap.sample(value)
            };
            canvas.set_pixel(
                (MARGIN_LEFT + px) as i32,
                (MARGIN_TOP + py) as i32,
                color,
            );
        }
    }
    canvas.stroke_rect(
        MARGIN_LEFT as i32 - 1,
        MARGIN_TOP as i32 - 1,
        PLOT_SIDE + 2,
        PLOT_SIDE + 2,
        FRAME,
    );

    draw_distance_ticks(&mut canvas, grid.half_extent_m());
    draw_colorbar(&mut canvas, &colormap);

    font::draw_text(
        &mut canvas,
        MARGIN_LEFT as i32,
        16,
        "COMPOSITE REFLECTIVITY",
        2,
        TEXT,
    );
    font::draw_text(&mut canvas, MARGIN_LEFT as i32, 40, caption, 1, TEXT);

    debug!(caption = %caption, "Rendered composite figure");
    png::encode(canvas.pixels(), canvas.width(), canvas.height())
}

fn draw_distance_ticks(canvas: &mut Canvas, half_extent_m: f32) {
    let half_km = half_extent_m / 1000.0;
    let step = tick_step_km(half_km);

    let mut tick = -(half_km / step).floor() * step;
    while tick <= half_km + 1e-3 {
        let frac = (tick + half_km) / (2.0 * half_km);
        let offset = (frac * (PLOT_SIDE - 1) as f32).round() as i32;
        let label = format!("{}", tick as i32);
        let width = font::text_width(&label, 1) as i32;

        // Bottom axis
        let x = MARGIN_LEFT as i32 + offset;
        let bottom = (MARGIN_TOP + PLOT_SIDE) as i32;
        canvas.fill_rect(x, bottom + 1, 1, 4, FRAME);
        font::draw_text(canvas, x - width / 2, bottom + 8, &label, 1, TEXT);

        // Left axis, north positive at the top
        let y = MARGIN_TOP as i32 + PLOT_SIDE as i32 - 1 - offset;
        canvas.fill_rect(MARGIN_LEFT as i32 - 5, y, 4, 1, FRAME);
        font::draw_text(canvas, MARGIN_LEFT as i32 - 8 - width, y - 3, &label, 1, TEXT);

        tick += step;
    }

    let axis_label = "DISTANCE FROM RADAR (KM)";
    let width = font::text_width(axis_label, 1) as i32;
    let center = MARGIN_LEFT as i32 + PLOT_SIDE as i32 / 2;
    font::draw_text(
        canvas,
        center - width / 2,
        (MARGIN_TOP + PLOT_SIDE) as i32 + 22,
        axis_label,
        1,
        TEXT,
    );
}

fn draw_colorbar(canvas: &mut Canvas, colormap: &Colormap) {
    let (lo, hi) = colormap.domain();
    let top = MARGIN_TOP as i32;

    for dy in 0..PLOT_SIDE {
        let value = hi - (hi - lo) * dy as f32 / (PLOT_SIDE - 1) as f32;
        let color = colormap.sample(value);
        canvas.fill_rect(COLORBAR_X as i32, top + dy as i32, COLORBAR_WIDTH, 1, color);
    }
    canvas.stroke_rect(
        COLORBAR_X as i32 - 1,
        top - 1,
        COLORBAR_WIDTH + 2,
        PLOT_SIDE + 2,
        FRAME,
    );

    for tick in colormap.ticks(10.0) {
        let frac = (hi - tick) / (hi - lo);
        let y = top + (frac * (PLOT_SIDE - 1) as f32).round() as i32;
        let label = format!("{}", tick as i32);
        canvas.fill_rect((COLORBAR_X + COLORBAR_WIDTH) as i32 + 1, y, 4, 1, FRAME);
        font::draw_text(
            canvas,
            (COLORBAR_X + COLORBAR_WIDTH) as i32 + 8,
            y - 3,
            &label,
            1,
            TEXT,
        );
    }

    font::draw_text(canvas, COLORBAR_X as i32, top - 16, "DBZ", 1, TEXT);
}
