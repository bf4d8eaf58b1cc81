/// ASCII rasterizer for the backdrop scene
use std::convert::Infallible;
use std::io::Write;

use backdrop_core::{Camera, Color as SceneColor, Scene, SceneRenderer, SurfaceSize};
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};

/// Glyphs for wireframe lines, far to near
const LINE_RAMP: &[char] = &['.', ':', '+', '*', '#'];
const STAR: char = '.';

/// Terminal cells are roughly twice as tall as they are wide, so one cell
/// covers two surface rows.
const CELL_ASPECT: u32 = 2;

#[derive(Clone, Copy)]
struct Cell {
    glyph: char,
    /// Blend toward the background, 0 = full accent
    fog: f32,
}

const EMPTY: Cell = Cell { glyph: ' ', fog: 1.0 };

/// ASCII renderer that draws stars as dots and skill shapes as line art
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
    background: SceneColor,
    accent: SceneColor,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![EMPTY; size],
            background: SceneColor::new(0.0, 0.0, 0.0),
            accent: SceneColor::WHITE,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Match the cell grid to a surface size; a no-op when unchanged
    fn fit(&mut self, size: SurfaceSize) {
        let width = size.width as usize;
        let height = (size.height / CELL_ASPECT) as usize;
        if width != self.width || height != self.height {
            *self = Self {
                background: self.background,
                accent: self.accent,
                ..Self::new(width, height)
            };
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(EMPTY);
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, cell: Cell) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    fn project(&self, camera: &Camera, point: &Point3<f32>, model: &Matrix4<f32>) -> Option<(f32, f32, f32)> {
        camera.project_to_screen(point, model, self.width as u32, self.height as u32)
    }

    fn render_particles(&mut self, scene: &Scene, camera: &Camera) {
        let model = backdrop_core::Transform::rotation_matrix(&scene.particles.rotation);
        let view = camera.view_matrix();

        for star in &scene.particles.positions {
            if let Some((x, y, depth)) = self.project(camera, star, &model) {
                let distance = -(view * model).transform_point(star).z;
                // Stars are faint; keep them at least half fogged
                let fog = 0.5 + 0.5 * scene.fog.factor(distance);
                self.plot(x as i32, y as i32, depth, Cell { glyph: STAR, fog });
            }
        }
    }

    fn render_skills(&mut self, scene: &Scene, camera: &Camera) {
        let group = &scene.skills;
        if !group.visible {
            return;
        }

        let group_matrix = group.pose.matrix();
        let view = camera.view_matrix();

        for shape in &group.shapes {
            let model = group_matrix * shape.pose.matrix();
            for (a, b) in scene.wireframe(shape.kind).segments() {
                let (Some(start), Some(end)) = (
                    self.project(camera, &a, &model),
                    self.project(camera, &b, &model),
                ) else {
                    continue; // Segment is clipped
                };

                let mid = nalgebra::center(&a, &b);
                let distance = -(view * model).transform_point(&mid).z;
                let fog = scene.fog.factor(distance);
                let ramp = ((1.0 - fog) * (LINE_RAMP.len() - 1) as f32).round() as usize;
                let glyph = LINE_RAMP[ramp.min(LINE_RAMP.len() - 1)];

                self.rasterize_line(start, end, Cell { glyph, fog });
            }
        }
    }

    /// DDA line walk with per-step depth interpolation
    fn rasterize_line(&mut self, start: (f32, f32, f32), end: (f32, f32, f32), cell: Cell) {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = start.0 + dx * t;
            let y = start.1 + dy * t;
            let depth = start.2 + (end.2 - start.2) * t;
            self.plot(x as i32, y as i32, depth, cell);
        }
    }

    fn shade(&self, fog: f32) -> Color {
        let blend = |a: f32, b: f32| a + (b - a) * fog;
        let (r, g, b) = SceneColor::new(
            blend(self.accent.r, self.background.r),
            blend(self.accent.g, self.background.g),
            blend(self.accent.b, self.background.b),
        )
        .to_rgb8();
        Color::Rgb { r, g, b }
    }

    /// Glyph at a cell, for tests and overlays
    pub fn glyph_at(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x].glyph
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let (r, g, b) = self.background.to_rgb8();
        writer.queue(SetBackgroundColor(Color::Rgb { r, g, b }))?;

        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                writer.queue(SetForegroundColor(self.shade(cell.fog)))?;
                writer.queue(Print(cell.glyph))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl SceneRenderer for AsciiRenderer {
    type Error = Infallible;

    fn render(&mut self, scene: &Scene, camera: &Camera, size: SurfaceSize) -> Result<(), Infallible> {
        self.fit(size);
        self.background = scene.background;
        self.accent = scene.accent;

        self.clear();
        self.render_particles(scene, camera);
        self.render_skills(scene, camera);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::{SceneConfig, Viewport};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene() -> Scene {
        let config = SceneConfig::default();
        let theme = config.theme().unwrap();
        Scene::build(&config, &theme, &mut StdRng::seed_from_u64(5))
    }

    fn count_lines(renderer: &AsciiRenderer) -> usize {
        let mut count = 0;
        for y in 0..renderer.height() {
            for x in 0..renderer.width() {
                if matches!(renderer.glyph_at(x, y), ':' | '+' | '*' | '#') {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_fits_cell_grid_to_surface() {
        let mut renderer = AsciiRenderer::new(1, 1);
        let camera = Camera::new(&Default::default(), Viewport::new(80.0, 48.0));
        renderer
            .render(&scene(), &camera, SurfaceSize { width: 80, height: 48 })
            .unwrap();
        assert_eq!((renderer.width(), renderer.height()), (80, 24));
    }

    #[test]
    fn test_hidden_group_draws_no_lines() {
        let mut scene = scene();
        let camera = Camera::new(&Default::default(), Viewport::new(120.0, 80.0));
        let size = SurfaceSize { width: 120, height: 80 };
        let mut renderer = AsciiRenderer::new(120, 40);

        renderer.render(&scene, &camera, size).unwrap();
        assert_eq!(count_lines(&renderer), 0);

        scene.skills.visible = true;
        scene.skills.pose.position.z = 5.0;
        renderer.render(&scene, &camera, size).unwrap();
        assert!(count_lines(&renderer) > 0);
    }
}
