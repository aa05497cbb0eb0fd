//! Self-similar growth: each child is a scaled copy attached to part of a
//! parent edge, so every generation shrinks until the degeneracy check stops
//! it.
//!
//! Star templates (seeds with `seed % 12 < 6`) keep the star shape but grow
//! no further than the root: a scaled copy of the whole star never fits in a
//! notch between two arms.

use glam::DMat4;

use super::{RATIO_PRESETS, Variant};
use crate::config::TreeConfig;
use crate::error::GeometryError;
use crate::geometry;
use crate::node::Transform;
use crate::rng::Rng;

pub(super) fn seed(config: &mut TreeConfig, rng: &mut Rng) -> Result<(), GeometryError> {
    config.field_resolution = 100;
    config.max_radius = 4.0;

    let ratio = RATIO_PRESETS[(config.random_seed % RATIO_PRESETS.len() as u64) as usize];
    let ambidextrous = rng.coin();
    config.variant = Variant::Scaled { ratio, ambidextrous };

    config.transforms = transforms(config, ratio, ambidextrous)?;
    super::randomize_transforms(config, rng, super::GESTATION_SPREAD);
    Ok(())
}

/// The template's last edge onto the start of every edge, and when
/// `ambidextrous` also mirrored onto the end of it.
fn transforms(config: &TreeConfig, ratio: f64, ambidextrous: bool) -> Result<Vec<Transform>, GeometryError> {
    let poly = &config.polygon;
    let last = poly.len().saturating_sub(1);

    let mut out = Vec::with_capacity(poly.len() * 2);
    for i in 0..poly.len() {
        out.push(Transform::new(
            geometry::edge_transform(poly, last, i, false, 0.0, ratio)?,
            DMat4::IDENTITY,
            1.0,
        ));
        if ambidextrous {
            out.push(Transform::new(
                geometry::edge_transform(poly, last, i, true, 1.0 - ratio, 1.0)?,
                DMat4::IDENTITY,
                1.0,
            ));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::config::TreeConfig;
    use crate::geometry::determinant;
    use crate::variant::{RATIO_PRESETS, Variant};

    #[test]
    fn ratio_follows_seed() {
        for seed in 0..10u64 {
            let config = TreeConfig::seeded(Variant::Scaled { ratio: 0.0, ambidextrous: false }, seed).unwrap();
            let Variant::Scaled { ratio, ambidextrous } = config.variant else {
                panic!("expected scaled variant, got {:?}", config.variant);
            };
            assert_eq!(ratio, RATIO_PRESETS[(seed % 5) as usize]);

            let per_edge = if ambidextrous { 2 } else { 1 };
            assert_eq!(config.transforms.len(), config.polygon.len() * per_edge);
            assert_eq!(config.max_radius, 4.0);
            assert_eq!(config.field_resolution, 100);
        }
    }

    #[test]
    fn every_child_shrinks_by_ratio() {
        let config = TreeConfig::seeded(Variant::Scaled { ratio: 0.0, ambidextrous: false }, 2).unwrap();
        let Variant::Scaled { ratio, .. } = config.variant else {
            panic!("expected scaled variant");
        };
        for t in &config.transforms {
            // regular templates have equal edges, so area scales by ratio^2
            assert!((determinant(&t.matrix).abs() - ratio * ratio).abs() < 1e-9);
        }
    }
}
