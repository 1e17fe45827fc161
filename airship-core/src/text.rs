/// Extruded text built from TrueType glyph outlines
use log::debug;
use rusttype::{Font, OutlineBuilder, Scale};
use std::fs;
use std::path::Path;

use crate::error::{AssetError, GeometryError};
use crate::geometry::Mesh;
use crate::shape::{contains, extrude_with_holes, signed_area, ExtrudeSettings, Shape};

/// DejaVu Sans Mono, compiled in so the default label needs no files
pub const DEFAULT_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

pub const DEFAULT_TEXT: &str = "kelluu";

/// Text extrusion parameters; glyphs are never bevelled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSettings {
    /// Em height in scene units
    pub size: f32,
    pub depth: f32,
    pub curve_segments: usize,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            size: 0.6,
            depth: 0.1,
            curve_segments: 2,
        }
    }
}

impl TextSettings {
    fn extrusion(&self) -> ExtrudeSettings {
        ExtrudeSettings {
            curve_segments: self.curve_segments,
            ..ExtrudeSettings::flat(self.depth)
        }
    }
}

pub fn default_font() -> Result<Font<'static>, AssetError> {
    Font::try_from_bytes(DEFAULT_FONT).ok_or(AssetError::Font)
}

pub fn load_font<P: AsRef<Path>>(path: P) -> Result<Font<'static>, AssetError> {
    let bytes = fs::read(path.as_ref())?;
    Font::try_from_vec(bytes).ok_or(AssetError::Font)
}

/// The default word in the bundled font
pub fn default_label() -> Result<Mesh, AssetError> {
    let font = default_font()?;
    Ok(text_mesh(&font, DEFAULT_TEXT, &TextSettings::default())?)
}

/// Lay out `text` on the baseline from the origin and extrude every glyph
///
/// Characters without an outline, such as spaces, only advance the caret.
/// A newline starts a new line one line height further down.
pub fn text_mesh(
    font: &Font<'_>,
    text: &str,
    settings: &TextSettings,
) -> Result<Mesh, GeometryError> {
    let v_metrics = font.v_metrics_unscaled();
    let em = settings.size / f32::from(font.units_per_em());
    // rusttype scales by ascent-to-descent height, the label is sized per em
    let scale = Scale::uniform(em * (v_metrics.ascent - v_metrics.descent));
    let line_height = em * (v_metrics.ascent - v_metrics.descent + v_metrics.line_gap);
    let extrusion = settings.extrusion();

    let mut mesh = Mesh::new();
    let mut caret = (0.0, 0.0);
    for ch in text.chars() {
        if ch == '\n' {
            caret = (0.0, caret.1 - line_height);
            continue;
        }

        let glyph = font.glyph(ch).scaled(scale);
        let mut outline = GlyphOutline::new(caret);
        if glyph.build_outline(&mut outline) {
            for (solid, holes) in outline.solids(settings.curve_segments) {
                mesh.extend(extrude_with_holes(&solid, &holes, &extrusion)?);
            }
        }
        caret.0 += glyph.h_metrics().advance_width;
    }

    debug!("built {:?} with {} triangles", text, mesh.triangles.len());
    Ok(mesh)
}

/// Collects glyph contours as shapes, flipped back to y-up
struct GlyphOutline {
    origin: (f32, f32),
    pen: (f32, f32),
    current: Option<Shape>,
    contours: Vec<Shape>,
}

impl GlyphOutline {
    fn new(origin: (f32, f32)) -> Self {
        Self {
            origin,
            pen: origin,
            current: None,
            contours: Vec::new(),
        }
    }

    fn place(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin.0 + x, self.origin.1 - y)
    }

    fn finish(&mut self) {
        if let Some(shape) = self.current.take() {
            self.contours.push(shape);
        }
    }

    /// Pair every outer contour with the holes directly inside it
    ///
    /// A contour nested inside an odd number of others is a hole; it belongs
    /// to the smallest outer contour around it.
    fn solids(self, divisions: usize) -> Vec<(Shape, Vec<Shape>)> {
        let mut contours = Vec::with_capacity(self.contours.len());
        for shape in self.contours {
            match shape.outline(divisions) {
                Ok(points) => contours.push((shape, points)),
                Err(e) => debug!("dropping glyph contour: {}", e),
            }
        }

        let depth = |i: usize| {
            let start = contours[i].1[0];
            contours
                .iter()
                .enumerate()
                .filter(|&(j, (_, points))| j != i && contains(points, start))
                .count()
        };
        let is_hole: Vec<bool> = (0..contours.len()).map(|i| depth(i) % 2 == 1).collect();

        let mut solids: Vec<(usize, Vec<Shape>)> = (0..contours.len())
            .filter(|&i| !is_hole[i])
            .map(|i| (i, Vec::new()))
            .collect();
        for hole in (0..contours.len()).filter(|&i| is_hole[i]) {
            let point = contours[hole].1[0];
            let owner = solids
                .iter_mut()
                .filter(|(outer, _)| contains(&contours[*outer].1, point))
                .min_by(|(a, _), (b, _)| {
                    let area = |i: usize| signed_area(&contours[i].1).abs();
                    area(*a).total_cmp(&area(*b))
                });
            match owner {
                Some((_, holes)) => holes.push(contours[hole].0.clone()),
                None => debug!("glyph hole without an outer contour"),
            }
        }

        solids
            .into_iter()
            .map(|(outer, holes)| (contours[outer].0.clone(), holes))
            .collect()
    }
}

impl OutlineBuilder for GlyphOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish();
        let (x, y) = self.place(x, y);
        let mut shape = Shape::new();
        shape.move_to(x, y);
        self.current = Some(shape);
        self.pen = (x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.place(x, y);
        if let Some(shape) = self.current.as_mut() {
            shape.line_to(x, y);
        }
        self.pen = (x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (cx, cy) = self.place(x1, y1);
        let (x, y) = self.place(x, y);
        if let Some(shape) = self.current.as_mut() {
            shape.quadratic_curve_to(cx, cy, x, y);
        }
        self.pen = (x, y);
    }

    /// Cubic segments (CFF fonts) are reduced to a single quadratic
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (ax, ay) = self.place(x1, y1);
        let (bx, by) = self.place(x2, y2);
        let (ex, ey) = self.place(x, y);
        let (px, py) = self.pen;
        let cx = (3.0 * (ax + bx) - px - ex) / 4.0;
        let cy = (3.0 * (ay + by) - py - ey) / 4.0;
        if let Some(shape) = self.current.as_mut() {
            shape.quadratic_curve_to(cx, cy, ex, ey);
        }
        self.pen = (ex, ey);
    }

    fn close(&mut self) {
        self.finish();
    }
}
