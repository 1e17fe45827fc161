/// Airship Core Library - sweep controller and scene assembly
///
/// This library provides the stateless core of the airship demo: the eased
/// oscillation controller, the hull/fin geometry, the text and STL labels, and the
/// transformation and projection math shared by the frame drivers.

pub mod angle;
pub mod error;
pub mod geometry;
pub mod oscillation;
pub mod projection;
pub mod scene;
pub mod shape;
pub mod stl;
pub mod text;
pub mod transform;

// Re-export commonly used types
pub use angle::{deg_to_rad, rad_to_deg};
pub use error::{AssetError, ConfigError, GeometryError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use oscillation::{Direction, OscillationConfig, OscillationController, Sweep};
pub use projection::Camera;
pub use scene::{Airship, Material, Part, SceneObject};
pub use shape::{ExtrudeSettings, Shape};
pub use text::TextSettings;
pub use transform::{RotationState, Transform};
