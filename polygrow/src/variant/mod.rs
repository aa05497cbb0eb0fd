//! Shape strategies: what gets grown.
//!
//! Each variant builds, from an integer seed, a template polygon, the
//! transform set applied to every accepted node, and its tunables (radius
//! bound, field resolution, root color, gestation randomness). Seeding always
//! rebuilds from scratch; nothing carries over from a previous configuration.
//!
//! The growth loop itself ([`crate::tree::Tree`]) is written once against
//! [`TreeConfig`](crate::config::TreeConfig) and knows nothing about variants.

mod edge_walk;
mod regular;
mod scaled;
mod thorn;

use glam::DMat4;

use crate::color::{self, Color};
use crate::config::TreeConfig;
use crate::error::GeometryError;
use crate::rng::Rng;

/// Child-to-parent size presets for [`Variant::Scaled`].
pub const RATIO_PRESETS: [f64; 5] = [
    0.618_033_988_749_894_9, // (sqrt 5 - 1) / 2
    0.5,
    1.0 / 3.0,
    std::f64::consts::FRAC_1_SQRT_2,
    0.366_025_403_784_438_6, // (sqrt 3 - 1) / 2
];

/// Available growth strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    /// Regular polygon or star; one full-size child per edge.
    Regular,
    /// Children scaled by `ratio` onto each edge, optionally mirrored too.
    Scaled { ratio: f64, ambidextrous: bool },
    /// Fixed asymmetric quadrilateral walking a logarithmic spiral.
    EdgeWalk,
    /// Nine-sided "thorn" tile with sparsely sampled edge maps.
    Thorn,
}

type Constructor = fn() -> Variant;

fn regular() -> Variant {
    Variant::Regular
}

fn scaled() -> Variant {
    Variant::Scaled { ratio: RATIO_PRESETS[0], ambidextrous: false }
}

fn edge_walk() -> Variant {
    Variant::EdgeWalk
}

fn thorn() -> Variant {
    Variant::Thorn
}

/// Persisted `_class` name to default constructor. Later entries are
/// accepted aliases for configs written under older names.
const REGISTRY: &[(&str, Constructor)] = &[
    ("RegularPolygonTree", regular),
    ("ScaledPolygonTree", scaled),
    ("EdgeWalkTree", edge_walk),
    ("ThornTree", thorn),
    ("SelfLimitingPolygonTree", regular),
    ("TrapezoidTree", edge_walk),
];

impl Variant {
    /// All variants, with default parameters.
    pub fn all() -> [Variant; 4] {
        [regular(), scaled(), edge_walk(), thorn()]
    }

    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Regular => "regular",
            Variant::Scaled { .. } => "scaled",
            Variant::EdgeWalk => "edge-walk",
            Variant::Thorn => "thorn",
        }
    }

    /// `_class` name written to persisted configs.
    pub fn class_name(&self) -> &'static str {
        match self {
            Variant::Regular => "RegularPolygonTree",
            Variant::Scaled { .. } => "ScaledPolygonTree",
            Variant::EdgeWalk => "EdgeWalkTree",
            Variant::Thorn => "ThornTree",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Variant::Regular => "Regular polygon or star, one child per edge",
            Variant::Scaled { .. } => "Self-similar children scaled onto each edge",
            Variant::EdgeWalk => "Quadrilateral walking a logarithmic spiral",
            Variant::Thorn => "Aperiodic nine-sided thorn tiles",
        }
    }

    /// Parse a command-line name.
    pub fn from_name(name: &str) -> Option<Variant> {
        match name.to_lowercase().as_str() {
            "regular" | "star" | "polygon" => Some(regular()),
            "scaled" | "self-similar" => Some(scaled()),
            "edge-walk" | "edgewalk" | "spiral" | "trapezoid" => Some(edge_walk()),
            "thorn" | "aperiodic" => Some(thorn()),
            _ => None,
        }
    }

    /// Look up a persisted `_class` name in the registry.
    pub fn from_class(class: &str) -> Option<Variant> {
        REGISTRY
            .iter()
            .find(|(name, _)| *name == class)
            .map(|(_, construct)| construct())
    }

    /// Names the registry accepts, aliases included.
    pub fn class_names() -> impl Iterator<Item = &'static str> {
        REGISTRY.iter().map(|(name, _)| *name)
    }

    /// Whether the occupancy field is exported alongside the render.
    pub fn persists_field_mask(&self) -> bool {
        matches!(self, Variant::Thorn)
    }

    /// Rebuild `config` for this variant from `config.random_seed`.
    ///
    /// Every variant starts from the regular polygon base, then overrides
    /// what it needs, drawing from a single seeded generator in a fixed
    /// order.
    pub(crate) fn seed(&self, config: &mut TreeConfig) -> Result<(), GeometryError> {
        let mut rng = Rng::new(config.random_seed);
        regular::seed(config, &mut rng)?;

        match self {
            Variant::Regular => {}
            Variant::Scaled { .. } => scaled::seed(config, &mut rng)?,
            Variant::EdgeWalk => edge_walk::seed(config, &mut rng)?,
            Variant::Thorn => thorn::seed(config, &mut rng)?,
        }
        Ok(())
    }
}

impl Default for Variant {
    fn default() -> Self {
        regular()
    }
}

/// Three random HLS color sinks.
fn palette(rng: &mut Rng) -> Vec<DMat4> {
    (0..3)
        .map(|_| {
            let hue = rng.below(720.0) - 360.0;
            let lightness = 0.5 + rng.below(0.5);
            let weight = rng.below(0.5);
            color::color_sink(hue, lightness, 1.0, weight)
        })
        .collect()
}

/// Usual width of the random gestation range above its floor of 1.
pub(crate) const GESTATION_SPREAD: f64 = 10.0;

/// Give every transform a palette color and a gestation in
/// `[1, 1 + spread)`.
pub(crate) fn randomize_transforms(config: &mut TreeConfig, rng: &mut Rng, spread: f64) {
    let palette = palette(rng);
    for t in &mut config.transforms {
        t.color_adjust = palette[rng.index(palette.len())];
        t.gestation = 1.0 + rng.below(spread);
    }
}

/// Saturated mid-lightness color with a random hue.
pub(crate) fn random_color(rng: &mut Rng) -> Color {
    Color::from_hsv(rng.below(360.0), 1.0, 0.5)
}
