//! Regular polygon / star growth, and the base every other variant starts
//! from.

use glam::DMat4;

use crate::config::TreeConfig;
use crate::error::GeometryError;
use crate::geometry::{self, Polygon};
use crate::node::Transform;
use crate::rng::Rng;

/// Tip angle, in degrees, for star templates.
pub(super) const STAR_TIP_ANGLE: u32 = 36;

/// Seed 0 is a regular pentagon in a radius-10 field whose gestations fall in
/// `[1, 2)`, so it grows strictly generation by generation at first. Other
/// seeds pick the radius, side count and star/polygon shape from the seed.
pub(super) fn seed(config: &mut TreeConfig, rng: &mut Rng) -> Result<(), GeometryError> {
    let seed = config.random_seed;

    config.max_radius = 10.0;
    config.polygon_sides = 5;
    config.star_angle = 0;

    if seed != 0 {
        config.max_radius = 5.0 + rng.below(40.0);
        config.polygon_sides = (seed % 6) as u32 + 3;
        config.star_angle = if seed % 12 < 6 { STAR_TIP_ANGLE } else { 0 };
    }

    config.polygon = template(config.polygon_sides, config.star_angle)?;

    // child edge 0 against every parent edge, itself included
    config.transforms = (0..config.polygon.len())
        .map(|i| {
            geometry::edge_transform(&config.polygon, 0, i, false, 0.0, 1.0)
                .map(|m| Transform::new(m, DMat4::IDENTITY, 1.0))
        })
        .collect::<Result<_, _>>()?;

    // at spread 1 every child starts before any grandchild can
    let spread = if seed == 0 { 1.0 } else { super::GESTATION_SPREAD };
    super::randomize_transforms(config, rng, spread);
    Ok(())
}

/// Regular `sides`-gon, or a `sides`-pointed star when `star_angle` is set.
pub(super) fn template(sides: u32, star_angle: u32) -> Result<Polygon, GeometryError> {
    if star_angle > 0 {
        geometry::star_polygon(sides as usize, star_angle as f64)
    } else {
        geometry::regular_polygon(sides as usize)
    }
}
