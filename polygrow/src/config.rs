//! Tree configuration: the generative rule set of one growth run, and its
//! persisted JSON form.
//!
//! The record keeps the field names and shapes the tree files have always
//! used:
//!
//! ```json
//! { "_class": "RegularPolygonTree",
//!   "randomSeed": 0, "maxRadius": 10.0,
//!   "polygon": [x0, y0, x1, y1, ...],
//!   "transforms": [ { "gestation": 1.0,
//!                     "color": [[4x4 row-major]],
//!                     "transform": [[3x3 row-major]] } ],
//!   "gestationRandomness": 0.0,
//!   "drawSettings": { "lineColor": "#000000", "lineThickness": 1 },
//!   "fieldResolution": 40, "polygonSides": 5, "starAngle": 0,
//!   "rootNode": { "color": "#ff0000" } }
//! ```
//!
//! Scaled trees add `"ratio"` and `"ambidextrous"`. Grown nodes are never
//! part of the record.

use glam::{DMat3, DMat4};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Color;
use crate::error::{ConfigError, GeometryError};
use crate::geometry::Polygon;
use crate::node::Transform;
use crate::variant::Variant;

/// Outline styling handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSettings {
    pub line_color: Color,
    pub line_thickness: u32,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self { line_color: Color::BLACK, line_thickness: 1 }
    }
}

/// Everything needed to (re)start a growth run.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    pub variant: Variant,
    pub random_seed: u64,
    /// No world-space vertex of an accepted node lies further than this from
    /// the origin.
    pub max_radius: f64,
    /// Template shared by every node.
    pub polygon: Polygon,
    pub transforms: Vec<Transform>,
    /// Magnitude of the symmetric jitter added to every gestation. 0 disables.
    pub gestation_randomness: f64,
    pub draw: DrawSettings,
    /// Occupancy cells per model unit.
    pub field_resolution: u32,
    pub polygon_sides: u32,
    /// Star tip angle in degrees; 0 for a plain polygon.
    pub star_angle: u32,
    pub root_color: Color,
    /// Nodes scaled below this (linear) factor are degenerate.
    pub minimum_scale: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            random_seed: 0,
            max_radius: 100.0,
            polygon: Polygon::default(),
            transforms: Vec::new(),
            gestation_randomness: 0.0,
            draw: DrawSettings::default(),
            field_resolution: 40,
            polygon_sides: 5,
            star_angle: 0,
            root_color: Color::rgb(1.0, 0.0, 0.0),
            minimum_scale: 0.01,
        }
    }
}

impl TreeConfig {
    /// Build a fresh configuration for `variant` from `seed`.
    ///
    /// Everything (template, transforms, tunables) is derived from the seed;
    /// the same inputs always produce the same configuration.
    pub fn seeded(variant: Variant, seed: u64) -> Result<TreeConfig, GeometryError> {
        let mut config = TreeConfig { variant, random_seed: seed, ..TreeConfig::default() };
        variant.seed(&mut config)?;
        Ok(config)
    }

    /// Persisted record as a JSON value.
    ///
    /// Fails on non-finite numbers, which JSON would otherwise store as
    /// `null` and refuse to load back.
    pub fn to_json_value(&self) -> Result<Value, ConfigError> {
        if let Some(key) = self.non_finite_key() {
            return Err(ConfigError::MalformedConfig(format!("`{}` is not finite", key)));
        }
        Ok(serde_json::to_value(TreeRecord::from(self))?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self.to_json_value()?)?)
    }

    /// Load a persisted record.
    ///
    /// `_class` is resolved through the variant registry first; the rest of
    /// the record is then applied over that variant's defaults.
    pub fn from_json_value(value: Value) -> Result<TreeConfig, ConfigError> {
        let class = value
            .get("_class")
            .ok_or_else(|| ConfigError::MalformedConfig("missing key `_class`".to_string()))?
            .as_str()
            .ok_or_else(|| ConfigError::MalformedConfig("`_class` must be a string".to_string()))?;
        let variant = Variant::from_class(class).ok_or_else(|| ConfigError::UnknownVariant(class.to_string()))?;

        let record: TreeRecord = serde_json::from_value(value)?;
        record.apply(TreeConfig { variant, ..TreeConfig::default() })
    }

    pub fn from_json_str(s: &str) -> Result<TreeConfig, ConfigError> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_json_value(value)
    }

    /// Copy through the persisted form: only the rule set survives.
    pub fn clone_via_json(&self) -> Result<TreeConfig, ConfigError> {
        Self::from_json_value(self.to_json_value()?)
    }

    /// First persisted key holding a NaN or infinity, if any.
    fn non_finite_key(&self) -> Option<&'static str> {
        if !self.max_radius.is_finite() {
            return Some("maxRadius");
        }
        if !self.gestation_randomness.is_finite() {
            return Some("gestationRandomness");
        }
        if !self.minimum_scale.is_finite() {
            return Some("minimumScale");
        }
        if let Variant::Scaled { ratio, .. } = self.variant {
            if !ratio.is_finite() {
                return Some("ratio");
            }
        }
        if self.polygon.points.iter().any(|p| !p.is_finite()) {
            return Some("polygon");
        }
        let bad_transform = self.transforms.iter().any(|t| {
            !t.gestation.is_finite() || !t.matrix.is_finite() || !t.color_adjust.is_finite()
        });
        if bad_transform {
            return Some("transforms");
        }
        None
    }
}

// ============================================================================
// PERSISTED RECORD
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeRecord {
    #[serde(rename = "_class")]
    class: String,
    random_seed: u64,
    max_radius: f64,
    polygon: Vec<f64>,
    transforms: Vec<TransformRecord>,
    #[serde(default)]
    gestation_randomness: f64,
    draw_settings: DrawRecord,
    field_resolution: u32,
    #[serde(default = "default_polygon_sides")]
    polygon_sides: u32,
    #[serde(default)]
    star_angle: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root_node: Option<RootRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minimum_scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ambidextrous: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TransformRecord {
    gestation: f64,
    color: [[f64; 4]; 4],
    transform: [[f64; 3]; 3],
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DrawRecord {
    line_color: String,
    line_thickness: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct RootRecord {
    color: String,
}

fn default_polygon_sides() -> u32 {
    5
}

impl From<&TreeConfig> for TreeRecord {
    fn from(c: &TreeConfig) -> Self {
        let (ratio, ambidextrous) = match c.variant {
            Variant::Scaled { ratio, ambidextrous } => (Some(ratio), Some(ambidextrous)),
            _ => (None, None),
        };

        TreeRecord {
            class: c.variant.class_name().to_string(),
            random_seed: c.random_seed,
            max_radius: c.max_radius,
            polygon: c.polygon.to_flat(),
            transforms: c.transforms.iter().map(TransformRecord::from).collect(),
            gestation_randomness: c.gestation_randomness,
            draw_settings: DrawRecord {
                line_color: c.draw.line_color.to_hex(),
                line_thickness: c.draw.line_thickness,
            },
            field_resolution: c.field_resolution,
            polygon_sides: c.polygon_sides,
            star_angle: c.star_angle,
            root_node: Some(RootRecord { color: c.root_color.to_hex() }),
            minimum_scale: Some(c.minimum_scale),
            ratio,
            ambidextrous,
        }
    }
}

impl From<&Transform> for TransformRecord {
    fn from(t: &Transform) -> Self {
        // glam is column-major; the record is row-major
        TransformRecord {
            gestation: t.gestation,
            color: t.color_adjust.transpose().to_cols_array_2d(),
            transform: t.matrix.transpose().to_cols_array_2d(),
        }
    }
}

impl TransformRecord {
    fn into_transform(self) -> Transform {
        Transform::new(
            DMat3::from_cols_array_2d(&self.transform).transpose(),
            DMat4::from_cols_array_2d(&self.color).transpose(),
            self.gestation,
        )
    }
}

fn parse_color(hex: &str, key: &str) -> Result<Color, ConfigError> {
    Color::from_hex(hex).ok_or_else(|| ConfigError::MalformedConfig(format!("`{}` is not a color: {:?}", key, hex)))
}

impl TreeRecord {
    fn apply(self, mut config: TreeConfig) -> Result<TreeConfig, ConfigError> {
        config.random_seed = self.random_seed;
        config.max_radius = self.max_radius;
        config.polygon = Polygon::from_flat(&self.polygon).ok_or_else(|| {
            ConfigError::MalformedConfig(format!("`polygon` has an odd number of coordinates ({})", self.polygon.len()))
        })?;
        config.transforms = self.transforms.into_iter().map(TransformRecord::into_transform).collect();
        config.gestation_randomness = self.gestation_randomness;
        config.draw = DrawSettings {
            line_color: parse_color(&self.draw_settings.line_color, "drawSettings.lineColor")?,
            line_thickness: self.draw_settings.line_thickness,
        };
        config.field_resolution = self.field_resolution;
        config.polygon_sides = self.polygon_sides;
        config.star_angle = self.star_angle;

        if let Some(root) = self.root_node {
            config.root_color = parse_color(&root.color, "rootNode.color")?;
        }
        if let Some(minimum_scale) = self.minimum_scale {
            config.minimum_scale = minimum_scale;
        }

        if let Variant::Scaled { .. } = config.variant {
            let ratio = self.ratio.ok_or_else(|| ConfigError::MalformedConfig("missing key `ratio`".to_string()))?;
            let ambidextrous = self
                .ambidextrous
                .ok_or_else(|| ConfigError::MalformedConfig("missing key `ambidextrous`".to_string()))?;
            config.variant = Variant::Scaled { ratio, ambidextrous };
        }

        Ok(config)
    }
}

// ============================================================================
// TESTS
// ============================================================================
