/// Error types shared across the airship crates
use std::io;
use thiserror::Error;

/// Rejected oscillation configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max angle must be greater than zero, got {0}")]
    NonPositiveMaxAngle(f32),

    #[error("min speed must be greater than zero, got {0}")]
    NonPositiveMinSpeed(f32),

    #[error("min speed ({min}) must be lower than max speed ({max})")]
    SpeedRange { min: f32, max: f32 },

    #[error("configuration values must be finite")]
    NotFinite,
}

/// Failures while building meshes from 2D shapes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("shape needs at least 3 distinct points, got {points}")]
    DegenerateShape { points: usize },

    #[error("could not triangulate shape outline")]
    Triangulation,
}

/// Failures while loading or building the label
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset: {0}")]
    Io(#[from] io::Error),

    #[error("file too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),

    #[error("unexpected end of file after {parsed} of {expected} triangles")]
    Truncated { parsed: usize, expected: usize },

    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),

    #[error("not a usable TrueType font")]
    Font,

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
