/// Geometry primitives for the airship meshes
use nalgebra::{Matrix4, Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a triangle from bare positions, using the face normal for every vertex
    pub fn from_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = (b - a).cross(&(c - a));
        let normal = normal.try_normalize(1e-12).unwrap_or_else(Vector3::z);
        let vertex = |p: Point3<f32>| Vertex {
            position: p,
            normal,
        };
        Self::new(vertex(a), vertex(b), vertex(c))
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append another mesh's triangles
    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    /// Bake a transform into the vertex data
    pub fn apply_matrix(&mut self, matrix: &Matrix4<f32>) {
        let normal_matrix = matrix
            .fixed_view::<3, 3>(0, 0)
            .clone_owned()
            .try_inverse()
            .map(|m| m.transpose());

        for triangle in &mut self.triangles {
            for vertex in &mut triangle.vertices {
                vertex.position = matrix.transform_point(&vertex.position);
                if let Some(nm) = normal_matrix {
                    vertex.normal = (nm * vertex.normal)
                        .try_normalize(1e-12)
                        .unwrap_or(vertex.normal);
                }
            }
        }
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.apply_matrix(&Matrix4::new_translation(&Vector3::new(x, y, z)));
        self
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.apply_matrix(&Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)));
        self
    }

    /// Rotate around the Z axis (radians)
    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.apply_matrix(&Matrix4::new_rotation(Vector3::new(0.0, 0.0, angle)));
        self
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| v.position));
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| {
            (min.inf(&p), max.sup(&p))
        });
        Some(Bounds { min, max })
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::from_points(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ));
        mesh
    }

    #[test]
    fn test_from_points_normal() {
        let mesh = unit_triangle();
        let normal = mesh.triangles[0].calculate_normal();
        assert!((normal - Vector3::z()).norm() < 1e-6);
        assert!((mesh.triangles[0].vertices[1].normal - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_scale_then_translate() {
        let mut mesh = unit_triangle();
        mesh.scale(0.5, 0.5, 0.5).translate(-2.0, 1.5, 0.0);

        let bounds = mesh.bounds().unwrap();
        assert!((bounds.min - Point3::new(-2.0, 1.5, 0.0)).norm() < 1e-6);
        assert!((bounds.max - Point3::new(-1.5, 2.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_rotate_z_quarter_turn() {
        let mut mesh = unit_triangle();
        mesh.rotate_z(std::f32::consts::FRAC_PI_2);

        let p = mesh.triangles[0].vertices[1].position;
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        // Normal stays on +Z for an in-plane rotation
        assert!((mesh.triangles[0].vertices[1].normal - Vector3::z()).norm() < 1e-6);
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
        assert!(Mesh::default().is_empty());
    }
}
