//! Rasterizes the scene into a ratatui buffer.

use mote_core::Rgb;
use ratatui::{buffer::Buffer, layout::Rect};

use crate::camera::Camera;
use crate::scene::Scene;

/// Fragments fainter than this are skipped.
const ALPHA_CUTOFF: f32 = 0.02;

/// Terminal cells are roughly twice as tall as they are wide.
pub const CELL_ASPECT: f32 = 0.5;

/// Glyphs for `RasterMode::Cells`, smallest particle first.
const CELL_GLYPHS: [char; 3] = ['·', '•', '●'];

/// How particles map onto terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RasterMode {
    /// Each cell is a 2x4 grid of braille dots.
    #[default]
    Braille,
    /// Each cell holds at most one particle glyph.
    Cells,
}

/// Dots per terminal cell along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRatio {
    pub x: u16,
    pub y: u16,
}

impl RasterMode {
    pub fn pixel_ratio(self) -> PixelRatio {
        match self {
            RasterMode::Braille => PixelRatio { x: 2, y: 4 },
            RasterMode::Cells => PixelRatio { x: 1, y: 1 },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Dot {
    color: Rgb,
    depth: f32,
    /// Projected radius in dots, used to pick cell glyphs.
    radius: f32,
}

/// Dot surface the scene is rasterized into before it is copied to cells.
#[derive(Debug)]
pub struct Renderer {
    mode: RasterMode,
    /// Size in cells.
    width: u16,
    height: u16,
    dots: Vec<Option<Dot>>,
}

impl Renderer {
    pub fn new(mode: RasterMode) -> Self {
        Self {
            mode,
            width: 0,
            height: 0,
            dots: Vec::new(),
        }
    }

    pub fn mode(&self) -> RasterMode {
        self.mode
    }

    /// Resize the surface to `width` x `height` cells.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let (w, h) = self.dot_size();
        self.dots = vec![None; w * h];
    }

    /// Surface size in dots.
    pub fn dot_size(&self) -> (usize, usize) {
        let ratio = self.mode.pixel_ratio();
        (
            self.width as usize * ratio.x as usize,
            self.height as usize * ratio.y as usize,
        )
    }

    /// Draw every visible mesh of `scene` and copy the result into `area`.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        yaw: f32,
        area: Rect,
        buf: &mut Buffer,
    ) {
        self.dots.iter_mut().for_each(|d| *d = None);
        self.rasterize(scene, camera, yaw);
        self.compose(scene.background, area, buf);
    }

    fn rasterize(&mut self, scene: &Scene, camera: &Camera, yaw: f32) {
        let (w, h) = self.dot_size();
        if w == 0 || h == 0 {
            return;
        }
        let light = scene.light_factor();
        let group = &scene.timer;

        for mesh in group.meshes().iter().filter(|m| m.visible) {
            let material = &mesh.material;
            let geometry = mesh.geometry();
            for point in geometry.points() {
                let Some(frag) = material.shader().shade(geometry, point, &material.uniforms)
                else {
                    continue;
                };
                if frag.alpha < ALPHA_CUTOFF {
                    continue;
                }
                let world = group.to_world(mesh, frag.position);
                let Some(ndc) = camera.project(world, yaw) else {
                    continue;
                };
                let px = (ndc.x + 1.0) / 2.0 * w as f32;
                let py = (1.0 - ndc.y) / 2.0 * h as f32;
                let radius = frag.size * camera.pixels_per_unit(ndc.z, h as f32) / 2.0;
                let color = scene
                    .background
                    .lerp(frag.color.scale(light), frag.alpha);
                self.plot(px, py, radius, Dot {
                    color,
                    depth: ndc.z,
                    radius,
                });
            }
        }
    }

    /// Fill a disc of dots, keeping the nearest fragment per dot.
    fn plot(&mut self, px: f32, py: f32, radius: f32, dot: Dot) {
        let (w, h) = self.dot_size();
        let reach = radius.floor().max(0.0) as i64;
        let (cx, cy) = (px.floor() as i64, py.floor() as i64);
        for y in (cy - reach)..=(cy + reach) {
            for x in (cx - reach)..=(cx + reach) {
                if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                    continue;
                }
                let (dx, dy) = ((x - cx) as f32, (y - cy) as f32);
                if reach > 0 && dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let slot = &mut self.dots[y as usize * w + x as usize];
                if slot.is_none_or(|existing| dot.depth < existing.depth) {
                    *slot = Some(dot);
                }
            }
        }
    }

    fn compose(&self, background: Rgb, area: Rect, buf: &mut Buffer) {
        let ratio = self.mode.pixel_ratio();
        let (w, _) = self.dot_size();
        let cols = area.width.min(self.width);
        let rows = area.height.min(self.height);

        for row in 0..area.height {
            for col in 0..area.width {
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                cell.reset();
                cell.set_char(' ').set_bg(background.into());
                if col >= cols || row >= rows {
                    continue;
                }

                let mut bits = 0u8;
                let mut nearest: Option<Dot> = None;
                for dy in 0..ratio.y {
                    for dx in 0..ratio.x {
                        let x = col as usize * ratio.x as usize + dx as usize;
                        let y = row as usize * ratio.y as usize + dy as usize;
                        if let Some(dot) = self.dots[y * w + x] {
                            bits |= braille_bit(dx, dy);
                            if nearest.is_none_or(|n| dot.depth < n.depth) {
                                nearest = Some(dot);
                            }
                        }
                    }
                }
                let Some(dot) = nearest else {
                    continue;
                };
                let ch = match self.mode {
                    RasterMode::Braille => char::from_u32(0x2800 + bits as u32).unwrap_or(' '),
                    RasterMode::Cells => cell_glyph(dot.radius),
                };
                cell.set_char(ch).set_fg(dot.color.into());
            }
        }
    }
}

/// Bit for the braille dot at column `dx` (0-1), row `dy` (0-3).
fn braille_bit(dx: u16, dy: u16) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (0, 3) => 0x40,
        (1, 3) => 0x80,
        _ => 0,
    }
}

fn cell_glyph(radius: f32) -> char {
    if radius < 0.35 {
        CELL_GLYPHS[0]
    } else if radius < 0.75 {
        CELL_GLYPHS[1]
    } else {
        CELL_GLYPHS[2]
    }
}
