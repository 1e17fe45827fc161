/// Airship assembly: the parent object the sweep rotates and its child meshes
///
/// Nothing here knows about the oscillation; frame drivers write the sweep
/// angle into [`Airship::rotation`] before each render.
use log::info;
use nalgebra::{Matrix4, Point3};

use crate::angle::deg_to_rad;
use crate::error::GeometryError;
use crate::geometry::Mesh;
use crate::shape::{extrude, ExtrudeSettings, Shape};
use crate::transform::{RotationState, Transform};

pub const HULL_COLOR: u32 = 0x0077ff;
pub const FIN_COLOR: u32 = 0x00ff6e;
pub const LABEL_COLOR: u32 = 0xffffff;

/// Flat, unlit surface colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Material {
    pub color: u32,
}

impl Material {
    pub fn new(color: u32) -> Self {
        Self { color }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.color >> 16) & 0xff) as u8,
            ((self.color >> 8) & 0xff) as u8,
            (self.color & 0xff) as u8,
        )
    }
}

/// What a child mesh represents on the airship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Hull,
    TopFin,
    BottomFin,
    Label,
}

/// A mesh attached to the airship, offset from its origin
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub part: Part,
    pub mesh: Mesh,
    pub material: Material,
    pub position: Point3<f32>,
}

/// Parent object grouping the hull, fins and label
#[derive(Debug, Clone)]
pub struct Airship {
    pub rotation: RotationState,
    pub position: Point3<f32>,
    pub children: Vec<SceneObject>,
}

impl Airship {
    pub fn new() -> Self {
        Self {
            rotation: RotationState::zero(),
            position: Point3::origin(),
            children: Vec::new(),
        }
    }

    /// Build the hull and both fins with the given extrusion
    pub fn assemble(settings: &ExtrudeSettings) -> Result<Self, GeometryError> {
        let mut airship = Self::new();

        airship.add(Part::Hull, hull_mesh(settings)?, Material::new(HULL_COLOR));

        let mut top_fin = extrude(&fin_shape(), settings)?;
        top_fin
            .scale(0.5, 0.5, 0.5)
            .translate(-2.0, 1.5, 0.0)
            .rotate_z(deg_to_rad(30.0));
        airship.add(Part::TopFin, top_fin, Material::new(FIN_COLOR));

        let mut bottom_fin = extrude(&fin_shape(), settings)?;
        bottom_fin
            .scale(0.5, 0.5, 0.5)
            .translate(2.0, 1.5, 0.0)
            .rotate_z(deg_to_rad(150.0));
        airship.add(Part::BottomFin, bottom_fin, Material::new(FIN_COLOR));

        info!(
            "assembled airship with {} triangles",
            airship.triangle_count()
        );
        Ok(airship)
    }

    fn add(&mut self, part: Part, mesh: Mesh, material: Material) {
        self.children.push(SceneObject {
            part,
            mesh,
            material,
            position: Point3::origin(),
        });
    }

    /// Place a label mesh on the side of the hull, replacing any previous one
    pub fn attach_label(&mut self, mesh: Mesh) {
        self.children.retain(|child| child.part != Part::Label);
        self.children.push(SceneObject {
            part: Part::Label,
            mesh,
            material: Material::new(LABEL_COLOR),
            position: Point3::new(-1.0, 0.0, 0.4),
        });
    }

    pub fn child(&self, part: Part) -> Option<&SceneObject> {
        self.children.iter().find(|child| child.part == part)
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::model_matrix(&self.position, &self.rotation)
    }

    /// Parent transform followed by the child's own offset
    pub fn world_matrix(&self, child: &SceneObject) -> Matrix4<f32> {
        self.model_matrix() * Transform::translation_matrix(&child.position)
    }

    pub fn triangle_count(&self) -> usize {
        self.children.iter().map(|c| c.mesh.triangles.len()).sum()
    }
}

impl Default for Airship {
    fn default() -> Self {
        Self::new()
    }
}

/// Lens-shaped hull outline
pub fn hull_shape() -> Shape {
    let mut shape = Shape::new();
    shape
        .move_to(-3.0, 0.0)
        .quadratic_curve_to(3.0, 3.0, 3.0, 0.0)
        .quadratic_curve_to(3.0, -3.0, -3.0, 0.0);
    shape
}

/// Triangular fin outline
pub fn fin_shape() -> Shape {
    let mut shape = Shape::new();
    shape
        .line_to(-1.0, 0.0)
        .line_to(0.0, 1.0)
        .line_to(1.0, 0.0)
        .line_to(0.0, 0.0);
    shape
}

fn hull_mesh(settings: &ExtrudeSettings) -> Result<Mesh, GeometryError> {
    extrude(&hull_shape(), settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_builds_three_parts() {
        let airship = Airship::assemble(&ExtrudeSettings::default()).unwrap();
        assert_eq!(airship.children.len(), 3);
        assert_eq!(airship.child(Part::Hull).unwrap().material.color, HULL_COLOR);
        assert_eq!(airship.child(Part::TopFin).unwrap().material.color, FIN_COLOR);
        assert_eq!(airship.child(Part::BottomFin).unwrap().material.color, FIN_COLOR);
        assert!(airship.child(Part::Label).is_none());
        assert_eq!(airship.rotation, RotationState::zero());
    }

    #[test]
    fn test_fins_sit_on_opposite_sides() {
        let airship = Airship::assemble(&ExtrudeSettings::flat(0.2)).unwrap();
        let top = airship.child(Part::TopFin).unwrap().mesh.bounds().unwrap();
        let bottom = airship.child(Part::BottomFin).unwrap().mesh.bounds().unwrap();

        // Rotating (-2, 1.5) by 30 degrees and (2, 1.5) by 150 degrees
        // lands both fins behind the hull's left tip
        assert!(top.center().x < -1.5);
        assert!(bottom.center().x < -1.5);
        assert!(top.center().y > 0.0);
        assert!(bottom.center().y < 0.0);
    }

    #[test]
    fn test_label_replaces_previous_label() {
        let mut airship = Airship::assemble(&ExtrudeSettings::flat(0.2)).unwrap();
        let label = extrude(&fin_shape(), &ExtrudeSettings::flat(0.1)).unwrap();

        airship.attach_label(label.clone());
        airship.attach_label(label);

        let labels = airship
            .children
            .iter()
            .filter(|c| c.part == Part::Label)
            .count();
        assert_eq!(labels, 1);
        assert_eq!(
            airship.child(Part::Label).unwrap().position,
            Point3::new(-1.0, 0.0, 0.4)
        );
    }

    #[test]
    fn test_world_matrix_follows_parent_rotation() {
        let mut airship = Airship::new();
        airship.attach_label(Mesh::new());
        airship.rotation.y = std::f32::consts::PI;

        let label = airship.child(Part::Label).unwrap();
        let origin = airship
            .world_matrix(label)
            .transform_point(&Point3::origin());
        assert!((origin - Point3::new(1.0, 0.0, -0.4)).norm() < 1e-5);
    }

    #[test]
    fn test_material_rgb() {
        assert_eq!(Material::new(HULL_COLOR).rgb(), (0x00, 0x77, 0xff));
    }
}
