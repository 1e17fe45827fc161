/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;

use airship_core::{Airship, Camera, Material, Mesh, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Minimum brightness for any visible face
const AMBIENT: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    depth: f32,
    character: char,
    color: Option<Color>,
}

impl Cell {
    const EMPTY: Cell = Cell {
        depth: f32::INFINITY,
        character: ' ',
        color: None,
    };
}

/// ASCII renderer that converts the airship meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::EMPTY; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Number of cells covered by geometry after the last render
    pub fn covered(&self) -> usize {
        self.cells.iter().filter(|c| c.color.is_some()).count()
    }

    pub fn character_at(&self, x: usize, y: usize) -> Option<char> {
        self.cells.get(y * self.width + x).map(|c| c.character)
    }

    pub fn render_airship(&mut self, airship: &Airship, camera: &Camera) {
        for child in &airship.children {
            let model = airship.world_matrix(child);
            self.render_mesh(&child.mesh, &model, &child.material, camera);
        }
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        material: &Material,
        camera: &Camera,
    ) {
        let color = terminal_color(material);
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, color, camera);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        color: Color,
        camera: &Camera,
    ) {
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Double-sided: shade by how squarely the face points at the viewer
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let light_dir = Vector3::new(0.0, 0.0, 1.0);
        let facing = normal.try_normalize(1e-12).map_or(0.0, |n| n.dot(&light_dir).abs());
        let brightness = AMBIENT + (1.0 - AMBIENT) * facing;

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        self.rasterize_triangle(&screen_coords, character, color);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let cell = &mut self.cells[y as usize * self.width + x as usize];
                if depth < cell.depth {
                    *cell = Cell {
                        depth,
                        character,
                        color: Some(color),
                    };
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            // No trailing newline, so the last row never scrolls the screen
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            let mut current = None;
            for cell in row {
                let color = cell.color.unwrap_or(Color::Reset);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn terminal_color(material: &Material) -> Color {
    let (r, g, b) = material.rgb();
    Color::Rgb { r, g, b }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use airship_core::ExtrudeSettings;

    #[test]
    fn test_barycentric_inside_and_degenerate() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!(w0 > 0.0 && w1 > 0.0 && w2 > 0.0);
        assert!((w0 + w1 + w2 - 1.0).abs() < 1e-6);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 0.0)).is_none());
    }

    #[test]
    fn test_airship_covers_screen_centre() {
        let airship = Airship::assemble(&ExtrudeSettings::default()).unwrap();
        let camera = Camera::with_aspect(80.0 / (40.0 * 2.0));
        let mut renderer = AsciiRenderer::new(80, 40);

        renderer.render_airship(&airship, &camera);
        assert!(renderer.covered() > 100);
        assert_ne!(renderer.character_at(40, 20), Some(' '));

        renderer.clear();
        assert_eq!(renderer.covered(), 0);
    }

    #[test]
    fn test_draw_separates_rows() {
        let renderer = AsciiRenderer::new(4, 3);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 2);
        assert_eq!(text.matches(' ').count(), 12);
    }
}
