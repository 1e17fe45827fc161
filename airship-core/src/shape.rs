/// 2D outlines and their extrusion into solid meshes
use nalgebra::{Point2, Point3, Vector2};
use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

use crate::error::GeometryError;
use crate::geometry::{Mesh, Triangle};

const EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathSegment {
    Move(Point2<f32>),
    Line(Point2<f32>),
    Quadratic {
        control: Point2<f32>,
        end: Point2<f32>,
    },
}

/// A single closed outline drawn with a pen that starts at the origin
#[derive(Debug, Clone, Default)]
pub struct Shape {
    segments: Vec<PathSegment>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.segments.push(PathSegment::Move(Point2::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.segments.push(PathSegment::Line(Point2::new(x, y)));
        self
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.segments.push(PathSegment::Quadratic {
            control: Point2::new(cx, cy),
            end: Point2::new(x, y),
        });
        self
    }

    /// Sample the path into points, splitting each curve into `divisions` lines
    pub fn points(&self, divisions: usize) -> Vec<Point2<f32>> {
        let divisions = divisions.max(1);
        let mut pen = Point2::origin();
        let mut points: Vec<Point2<f32>> = Vec::new();

        for segment in &self.segments {
            match *segment {
                PathSegment::Move(p) => pen = p,
                PathSegment::Line(p) => {
                    push_pen(&mut points, pen);
                    points.push(p);
                    pen = p;
                }
                PathSegment::Quadratic { control, end } => {
                    push_pen(&mut points, pen);
                    for i in 1..=divisions {
                        let t = i as f32 / divisions as f32;
                        points.push(quadratic_bezier(pen, control, end, t));
                    }
                    pen = end;
                }
            }
        }

        points
    }

    /// Closed, counter-clockwise outline with duplicate points removed
    pub fn outline(&self, divisions: usize) -> Result<Vec<Point2<f32>>, GeometryError> {
        let mut outline: Vec<Point2<f32>> = Vec::new();
        for p in self.points(divisions) {
            if outline.last().map_or(true, |last| (p - *last).norm() > EPSILON) {
                outline.push(p);
            }
        }
        while outline.len() > 1 && (outline[0] - outline[outline.len() - 1]).norm() <= EPSILON {
            outline.pop();
        }

        if outline.len() < 3 {
            return Err(GeometryError::DegenerateShape {
                points: outline.len(),
            });
        }
        if signed_area(&outline) < 0.0 {
            outline.reverse();
        }
        Ok(outline)
    }
}

fn push_pen(points: &mut Vec<Point2<f32>>, pen: Point2<f32>) {
    if points.last() != Some(&pen) {
        points.push(pen);
    }
}

fn quadratic_bezier(p0: Point2<f32>, c: Point2<f32>, p1: Point2<f32>, t: f32) -> Point2<f32> {
    let k = 1.0 - t;
    Point2::from(p0.coords * (k * k) + c.coords * (2.0 * k * t) + p1.coords * (t * t))
}

/// Shoelace area, positive for counter-clockwise outlines
pub fn signed_area(points: &[Point2<f32>]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}

fn cross(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    let (ab, ac) = (b - a, c - a);
    ab.x * ac.y - ab.y * ac.x
}

fn point_in_triangle(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Ear-clip a counter-clockwise outline into index triples
pub fn triangulate(points: &[Point2<f32>]) -> Result<Vec<[usize; 3]>, GeometryError> {
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut triangles = Vec::with_capacity(points.len().saturating_sub(2));

    while remaining.len() > 3 {
        let m = remaining.len();
        let mut clipped = false;

        for i in 0..m {
            let (ia, ib, ic) = (remaining[(i + m - 1) % m], remaining[i], remaining[(i + 1) % m]);
            let (a, b, c) = (points[ia], points[ib], points[ic]);
            let turn = cross(a, b, c);

            // Collinear vertices add no area
            if turn.abs() <= EPSILON {
                remaining.remove(i);
                clipped = true;
                break;
            }
            if turn < 0.0 {
                continue;
            }
            let blocked = remaining
                .iter()
                .map(|&j| points[j])
                .filter(|&p| p != a && p != b && p != c)
                .any(|p| point_in_triangle(p, a, b, c));
            if blocked {
                continue;
            }

            triangles.push([ia, ib, ic]);
            remaining.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            return Err(GeometryError::Triangulation);
        }
    }

    if remaining.len() == 3 {
        let (a, b, c) = (points[remaining[0]], points[remaining[1]], points[remaining[2]]);
        if cross(a, b, c).abs() > EPSILON {
            triangles.push([remaining[0], remaining[1], remaining[2]]);
        }
    }

    Ok(triangles)
}

/// Extrusion parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeSettings {
    pub depth: f32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: usize,
    pub curve_segments: usize,
}

impl Default for ExtrudeSettings {
    fn default() -> Self {
        Self {
            depth: 0.2,
            bevel_enabled: true,
            bevel_thickness: 0.2,
            bevel_size: 0.2,
            bevel_segments: 2,
            curve_segments: 12,
        }
    }
}

impl ExtrudeSettings {
    pub fn flat(depth: f32) -> Self {
        Self {
            depth,
            bevel_enabled: false,
            ..Self::default()
        }
    }

    /// (z, outward offset) for every ring from back cap to front cap
    fn rings(&self) -> Vec<(f32, f32)> {
        if !self.bevel_enabled || self.bevel_segments == 0 {
            return vec![(0.0, 0.0), (self.depth, 0.0)];
        }

        let segments = self.bevel_segments;
        let layer = |s: usize| {
            let t = s as f32 / segments as f32;
            (
                self.bevel_thickness * (t * FRAC_PI_2).cos(),
                self.bevel_size * (t * FRAC_PI_2).sin(),
            )
        };

        let back = (0..=segments).map(|s| {
            let (z, offset) = layer(s);
            (-z, offset)
        });
        let front = (0..=segments).rev().map(|s| {
            let (z, offset) = layer(s);
            (self.depth + z, offset)
        });
        back.chain(front).collect()
    }
}

/// Bevel direction at each vertex, pointing away from the solid
///
/// Scaled by the miter length so offset edges stay `offset` away from the
/// originals, capped at sqrt(2) for very sharp corners.
fn bevel_vectors(outline: &[Point2<f32>]) -> Vec<Vector2<f32>> {
    let n = outline.len();
    let edge_normal = |from: Point2<f32>, to: Point2<f32>| {
        let d = to - from;
        Vector2::new(d.y, -d.x).try_normalize(1e-12).unwrap_or_else(Vector2::zeros)
    };

    (0..n)
        .map(|i| {
            let prev = outline[(i + n - 1) % n];
            let here = outline[i];
            let next = outline[(i + 1) % n];
            let (n1, n2) = (edge_normal(prev, here), edge_normal(here, next));
            let Some(direction) = (n1 + n2).try_normalize(1e-12) else {
                return Vector2::zeros();
            };
            let half_cos = direction.dot(&n1).max(FRAC_1_SQRT_2);
            direction / half_cos
        })
        .collect()
}

/// Even-odd test of a point against a closed outline
pub fn contains(outline: &[Point2<f32>], p: Point2<f32>) -> bool {
    let n = outline.len();
    let mut inside = false;
    for i in 0..n {
        let (a, b) = (outline[i], outline[(i + 1) % n]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn segments_cross(p1: Point2<f32>, p2: Point2<f32>, q1: Point2<f32>, q2: Point2<f32>) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

fn edges(outline: &[Point2<f32>]) -> impl Iterator<Item = (Point2<f32>, Point2<f32>)> + '_ {
    let n = outline.len();
    (0..n).map(move |i| (outline[i], outline[(i + 1) % n]))
}

/// Join clockwise holes into a counter-clockwise outline with bridge edges
///
/// Each hole is cut open at its rightmost point and connected to the nearest
/// outline vertex that can be reached without crossing an edge. The result
/// is a single polygon that [`triangulate`] can ear-clip.
pub fn bridge_holes(
    outline: &[Point2<f32>],
    holes: &[Vec<Point2<f32>>],
) -> Result<Vec<Point2<f32>>, GeometryError> {
    let max_x = |hole: &[Point2<f32>]| hole.iter().map(|p| p.x).fold(f32::MIN, f32::max);
    let mut pending: Vec<&[Point2<f32>]> = holes.iter().map(Vec::as_slice).collect();
    pending.sort_by(|a, b| max_x(*b).total_cmp(&max_x(*a)));

    let mut merged = outline.to_vec();
    for k in 0..pending.len() {
        let hole = pending[k];
        let (start, m) = hole
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.x.total_cmp(&b.x))
            .ok_or(GeometryError::Triangulation)?;

        let visible = |p: Point2<f32>| {
            !edges(&merged).any(|(a, b)| segments_cross(m, p, a, b))
                && !pending[k..]
                    .iter()
                    .any(|h| edges(h).any(|(a, b)| segments_cross(m, p, a, b)))
        };
        let target = (0..merged.len())
            .filter(|&i| visible(merged[i]))
            .min_by(|&a, &b| (merged[a] - m).norm().total_cmp(&(merged[b] - m).norm()))
            .ok_or(GeometryError::Triangulation)?;

        let mut spliced = Vec::with_capacity(merged.len() + hole.len() + 2);
        spliced.extend_from_slice(&merged[..=target]);
        spliced.extend(hole[start..].iter().chain(&hole[..=start]).copied());
        spliced.extend_from_slice(&merged[target..]);
        merged = spliced;
    }

    Ok(merged)
}

fn add_walls(mesh: &mut Mesh, contour: &[Point2<f32>], rings: &[(f32, f32)]) {
    let bevel = bevel_vectors(contour);
    let layers: Vec<Vec<Point3<f32>>> = rings
        .iter()
        .map(|&(z, offset)| {
            contour
                .iter()
                .zip(&bevel)
                .map(|(p, v)| {
                    let q = *p + *v * offset;
                    Point3::new(q.x, q.y, z)
                })
                .collect()
        })
        .collect();

    let n = contour.len();
    for pair in layers.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        for i in 0..n {
            let j = (i + 1) % n;
            mesh.add_triangle(Triangle::from_points(lower[i], lower[j], upper[j]));
            mesh.add_triangle(Triangle::from_points(lower[i], upper[j], upper[i]));
        }
    }
}

/// Extrude a shape along +Z into a closed mesh
pub fn extrude(shape: &Shape, settings: &ExtrudeSettings) -> Result<Mesh, GeometryError> {
    extrude_with_holes(shape, &[], settings)
}

/// Extrude a shape with holes cut through it, such as a glyph counter
pub fn extrude_with_holes(
    shape: &Shape,
    holes: &[Shape],
    settings: &ExtrudeSettings,
) -> Result<Mesh, GeometryError> {
    let outline = shape.outline(settings.curve_segments)?;
    let holes = holes
        .iter()
        .map(|hole| {
            let mut points = hole.outline(settings.curve_segments)?;
            points.reverse();
            Ok(points)
        })
        .collect::<Result<Vec<_>, GeometryError>>()?;

    let merged = bridge_holes(&outline, &holes)?;
    let caps = triangulate(&merged)?;
    let rings = settings.rings();
    let (back_z, front_z) = (rings[0].0, rings[rings.len() - 1].0);

    let wall_points: usize = outline.len() + holes.iter().map(Vec::len).sum::<usize>();
    let mut mesh = Mesh::with_capacity(caps.len() * 2 + wall_points * 2 * (rings.len() - 1));

    // Cap rings carry no bevel offset
    let at = |i: usize, z: f32| Point3::new(merged[i].x, merged[i].y, z);
    for &[a, b, c] in &caps {
        mesh.add_triangle(Triangle::from_points(at(a, front_z), at(b, front_z), at(c, front_z)));
        mesh.add_triangle(Triangle::from_points(at(a, back_z), at(c, back_z), at(b, back_z)));
    }

    add_walls(&mut mesh, &outline, &rings);
    for hole in &holes {
        add_walls(&mut mesh, hole, &rings);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fin() -> Shape {
        let mut shape = Shape::new();
        shape.line_to(-1.0, 0.0).line_to(0.0, 1.0).line_to(1.0, 0.0).line_to(0.0, 0.0);
        shape
    }

    fn hull() -> Shape {
        let mut shape = Shape::new();
        shape
            .move_to(-3.0, 0.0)
            .quadratic_curve_to(3.0, 3.0, 3.0, 0.0)
            .quadratic_curve_to(3.0, -3.0, -3.0, 0.0);
        shape
    }

    #[test]
    fn test_fin_outline_starts_at_pen_origin() {
        let outline = fin().outline(12).unwrap();
        assert_eq!(outline.len(), 4);
        assert!(outline.contains(&Point2::new(0.0, 0.0)));
        assert!(signed_area(&outline) > 0.0);
    }

    #[test]
    fn test_hull_outline_samples_curves() {
        let outline = hull().outline(12).unwrap();
        // Two curves of 12 divisions, closing point dropped
        assert_eq!(outline.len(), 24);
        assert!(outline.iter().any(|p| (p.y - 1.5).abs() < 1e-5));
        assert!(outline.iter().any(|p| (p.y + 1.5).abs() < 1e-5));
    }

    #[test]
    fn test_degenerate_shape_rejected() {
        let mut line = Shape::new();
        line.line_to(1.0, 0.0);
        assert_eq!(
            line.outline(12),
            Err(GeometryError::DegenerateShape { points: 2 })
        );
        assert!(extrude(&Shape::new(), &ExtrudeSettings::default()).is_err());
    }

    #[test]
    fn test_triangulate_covers_fin_area() {
        let outline = fin().outline(12).unwrap();
        let triangles = triangulate(&outline).unwrap();
        let area: f32 = triangles
            .iter()
            .map(|&[a, b, c]| cross(outline[a], outline[b], outline[c]) * 0.5)
            .sum();
        assert!((area - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangulate_drops_collinear_vertex() {
        let outline = vec![
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let triangles = triangulate(&outline).unwrap();
        assert_eq!(triangles, vec![[1, 2, 3]]);
    }

    #[test]
    fn test_triangulate_concave_outline() {
        // Arrow head with one reflex vertex
        let outline = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.5, 1.0),
        ];
        let triangles = triangulate(&outline).unwrap();
        assert_eq!(triangles.len(), 2);
        let area: f32 = triangles
            .iter()
            .map(|&[a, b, c]| cross(outline[a], outline[b], outline[c]) * 0.5)
            .sum();
        assert!((area - signed_area(&outline)).abs() < 1e-5);
    }

    #[test]
    fn test_flat_extrusion_of_fin() {
        let mesh = extrude(&fin(), &ExtrudeSettings::flat(0.2)).unwrap();
        // Two cap triangles per side plus two per side wall edge
        assert_eq!(mesh.triangles.len(), 2 * 2 + 4 * 2);

        let bounds = mesh.bounds().unwrap();
        assert!((bounds.min - Point3::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
        assert!((bounds.max - Point3::new(1.0, 1.0, 0.2)).norm() < 1e-5);
    }

    #[test]
    fn test_bevelled_extrusion_grows_outline() {
        let settings = ExtrudeSettings::default();
        let mesh = extrude(&hull(), &settings).unwrap();
        let bounds = mesh.bounds().unwrap();

        assert!((bounds.min.z + 0.2).abs() < 1e-5);
        assert!((bounds.max.z - 0.4).abs() < 1e-5);
        assert!(bounds.max.x > 3.0);
        assert!(bounds.min.y < -1.5);

        // 22 cap triangles each side, 5 gaps between 6 rings of 24 points
        assert_eq!(mesh.triangles.len(), 22 * 2 + 5 * 24 * 2);
    }

    fn square(half: f32) -> Shape {
        let mut shape = Shape::new();
        shape
            .move_to(-half, -half)
            .line_to(half, -half)
            .line_to(half, half)
            .line_to(-half, half)
            .line_to(-half, -half);
        shape
    }

    #[test]
    fn test_bevel_keeps_square_corners_sharp() {
        let settings = ExtrudeSettings {
            bevel_segments: 1,
            ..ExtrudeSettings::default()
        };
        let bounds = extrude(&square(1.0), &settings).unwrap().bounds().unwrap();
        // Edges move out by the full bevel size, corners included
        assert!((bounds.max.x - 1.2).abs() < 1e-5);
        assert!((bounds.max.y - 1.2).abs() < 1e-5);
        assert!((bounds.min.x + 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_bevel_vectors_are_mitered() {
        let outline = square(1.0).outline(1).unwrap();
        for v in bevel_vectors(&outline) {
            assert!((v.norm() - std::f32::consts::SQRT_2).abs() < 1e-5);
        }

        // Sharp hull tips are capped rather than spiking out
        let tips = bevel_vectors(&hull().outline(12).unwrap());
        assert!(tips.iter().all(|v| v.norm() <= std::f32::consts::SQRT_2 + 1e-5));
        assert!(tips.iter().any(|v| v.norm() > 1.2));
    }

    #[test]
    fn test_contains_even_odd() {
        let outline = square(1.0).outline(1).unwrap();
        assert!(contains(&outline, Point2::new(0.0, 0.0)));
        assert!(contains(&outline, Point2::new(0.9, -0.9)));
        assert!(!contains(&outline, Point2::new(1.5, 0.0)));
    }

    #[test]
    fn test_bridged_hole_triangulates_ring_area() {
        let outer = square(2.0).outline(1).unwrap();
        let mut hole = square(1.0).outline(1).unwrap();
        hole.reverse();

        let merged = bridge_holes(&outer, &[hole]).unwrap();
        assert_eq!(merged.len(), 4 + 4 + 2);

        let triangles = triangulate(&merged).unwrap();
        let area: f32 = triangles
            .iter()
            .map(|&[a, b, c]| cross(merged[a], merged[b], merged[c]) * 0.5)
            .sum();
        assert!((area - 12.0).abs() < 1e-4);

        // No triangle covers the hole
        for &[a, b, c] in &triangles {
            let sum = merged[a].coords + merged[b].coords + merged[c].coords;
            let centroid = Point2::from(sum / 3.0);
            assert!(centroid.x.abs() >= 1.0 - 1e-5 || centroid.y.abs() >= 1.0 - 1e-5);
        }
    }

    #[test]
    fn test_extrusion_with_hole_has_inner_walls() {
        let settings = ExtrudeSettings::flat(0.5);
        let mesh = extrude_with_holes(&square(2.0), &[square(1.0)], &settings).unwrap();
        // 8 cap triangles per side, 4 outer and 4 inner wall quads
        assert_eq!(mesh.triangles.len(), 8 * 2 + (4 + 4) * 2);

        // Inner walls face into the hole
        let inner = mesh
            .triangles
            .iter()
            .filter(|t| t.vertices.iter().all(|v| (v.position.x - 1.0).abs() < 1e-6))
            .collect::<Vec<_>>();
        assert_eq!(inner.len(), 2);
        assert!(inner.iter().all(|t| t.calculate_normal().x < -0.99));
    }

    #[test]
    fn test_cap_normals_face_outward() {
        let mesh = extrude(&hull(), &ExtrudeSettings::flat(0.2)).unwrap();
        let front = &mesh.triangles[0];
        let back = &mesh.triangles[1];
        assert!(front.calculate_normal().z > 0.99);
        assert!(back.calculate_normal().z < -0.99);
    }
}
