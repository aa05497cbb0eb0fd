//! # polygrow
//!
//! Self-limiting polygon growth.
//!
//! A seed polygon spawns transformed copies of itself, one per growth rule,
//! and every copy that does not overlap what is already there spawns again.
//! A raster occupancy field decides overlap. Growth stops by itself once
//! children get too small or the bounded field has no room left.
//!
//! ```
//! use polygrow::{Tree, TreeConfig, Variant};
//!
//! let config = TreeConfig::seeded(Variant::Regular, 0).unwrap();
//! let mut tree = Tree::new(config).unwrap();
//! while tree.step() {}
//! assert!(!tree.nodes().is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`geometry`]: polygons and edge-aligned similarity transforms
//! - [`node`]: growth rules and placed shapes
//! - [`field`]: the occupancy raster
//! - [`tree`]: the scheduler
//! - [`variant`]: the shape families
//! - [`config`]: seeded configuration and its JSON form

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod geometry;
pub mod node;
pub mod rng;
pub mod tree;
pub mod variant;

// Re-export common types at crate root for convenience.
pub use color::Color;
pub use config::{DrawSettings, TreeConfig};
pub use error::{ConfigError, ConfigurationError, GeometryError, PolygrowError};
pub use field::{Field, Footprint};
pub use geometry::{Polygon, edge_transform};
pub use node::{Node, NodeId, Transform};
pub use tree::{DiscardReason, RunSummary, StepOutcome, Tree};
pub use variant::Variant;
