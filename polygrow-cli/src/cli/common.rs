//! Common utilities shared across CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;

use polygrow::{TreeConfig, Variant};

/// Resolve a variant name from the command line.
pub fn parse_variant(name: &str) -> Result<Variant, String> {
    Variant::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Variant::all().iter().map(|v| v.name()).collect();
        format!("Unknown variant: {}. Available: {}", name, known.join(", "))
    })
}

/// Load a persisted tree config. `.yaml` / `.yml` files are read as YAML
/// with the same schema; anything else as JSON.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TreeConfig, String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref(),
        Some("yaml" | "yml")
    );

    let value: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| format!("Failed to parse config YAML: {}", e))?
    } else {
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config JSON: {}", e))?
    };

    TreeConfig::from_json_value(value).map_err(|e| format!("{}: {}", path.display(), e))
}

/// A fresh non-zero seed for `--random`.
pub fn random_seed() -> u64 {
    rand::rng().random_range(1..100_000)
}

/// Default output name: variant, seed and a local timestamp.
pub fn default_output(config: &TreeConfig) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("polygrow-{}-{}-{}.svg", config.variant.name(), config.random_seed, stamp))
}

/// `out.svg` -> `out.<suffix>`, e.g. `out.png` or `out.mask.png`.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    path.with_extension(suffix)
}
