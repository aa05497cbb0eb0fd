//! CLI command implementations.
//!
//! - `grow` - Seed or load a tree, run it, export SVG/PNG/mask
//! - `config` - Print the config a variant builds from a seed
//! - `variants` - List available shape families

pub mod common;
pub mod config;
pub mod export;
pub mod grow;

pub use config::cmd_config;
pub use grow::cmd_grow;

use polygrow::Variant;

/// Execute the variants command.
pub fn cmd_variants() {
    println!("Available variants:");
    for variant in Variant::all() {
        println!("  {:<10} {:<20} {}", variant.name(), variant.class_name(), variant.description());
    }
}
