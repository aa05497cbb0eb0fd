//! Error types for polygrow.
//!
//! Rejecting a candidate node is NOT an error: a non-viable node is a normal
//! outcome of a growth step (see [`crate::tree::StepOutcome`]). The types here
//! cover bad input to transform construction, field allocation, and loading
//! persisted configuration.

use thiserror::Error;

/// Malformed polygon or edge input to the geometry kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polygon needs at least {needed} vertices, got {got}")]
    TooFewVertices { needed: usize, got: usize },

    #[error("edge index {index} out of range for a polygon with {edges} edges")]
    EdgeOutOfRange { index: usize, edges: usize },

    #[error("edge {index} has zero length")]
    DegenerateEdge { index: usize },

    #[error("non-finite coordinate in geometry input")]
    NonFinite,
}

/// The tree cannot be built with the requested tunables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("max radius must be finite and positive, got {0}")]
    InvalidRadius(f64),

    #[error("field resolution must be positive, got {0}")]
    InvalidResolution(u32),

    #[error("occupancy field of {side}x{side} cells exceeds the limit of {limit} per side")]
    FieldTooLarge { side: u64, limit: u64 },

    #[error("could not allocate occupancy field of {cells} cells")]
    AllocationFailed { cells: u64 },

    #[error("minimum scale must be finite and positive, got {0}")]
    InvalidMinimumScale(f64),
}

/// Failure to load a persisted tree configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    MalformedConfig(String),

    #[error("unknown variant '{0}'")]
    UnknownVariant(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::MalformedConfig(err.to_string())
    }
}

/// Umbrella error for building and running a tree.
#[derive(Debug, Error)]
pub enum PolygrowError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
