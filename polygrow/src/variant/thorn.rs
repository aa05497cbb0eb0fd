//! The nine-sided "versatile" thorn tile, joined edge to edge along a sparse
//! random subset of all possible edge pairings.

use glam::{DMat4, DVec2};

use crate::color::Color;
use crate::config::TreeConfig;
use crate::error::GeometryError;
use crate::geometry::{self, Polygon};
use crate::node::Transform;
use crate::rng::Rng;

/// Headings, in degrees, of the unit steps tracing the tile from the origin.
const HEADINGS: [f64; 8] = [0.0, 120.0, 105.0, 90.0, 75.0, 240.0, 255.0, 270.0];

/// Each ordered (child edge, parent edge) pair is kept with odds 1 in this,
/// once plain and once mirrored.
const PAIRING_ODDS: usize = 20;

pub(super) fn seed(config: &mut TreeConfig, rng: &mut Rng) -> Result<(), GeometryError> {
    config.field_resolution = 20;
    config.max_radius = 50.0;
    config.gestation_randomness = 0.0;
    config.root_color = Color::rgb(0.0, 1.0, 1.0);

    config.polygon = template();

    let n = config.polygon.len();
    let mut transforms = Vec::new();
    for parent_edge in 0..n {
        for child_edge in 0..n {
            if rng.one_in(PAIRING_ODDS) {
                let m = geometry::edge_transform(&config.polygon, child_edge, parent_edge, false, 0.0, 1.0)?;
                transforms.push(Transform::new(m, DMat4::IDENTITY, 1.0));
            }
            if rng.one_in(PAIRING_ODDS) {
                let m = geometry::edge_transform(&config.polygon, child_edge, parent_edge, true, 0.0, 1.0)?;
                transforms.push(Transform::new(m, DMat4::IDENTITY, 1.0));
            }
        }
    }
    config.transforms = transforms;

    super::randomize_transforms(config, rng, super::GESTATION_SPREAD);
    Ok(())
}

pub(super) fn template() -> Polygon {
    let mut points = Vec::with_capacity(HEADINGS.len() + 1);
    let mut pt = DVec2::ZERO;
    points.push(pt);
    for heading in HEADINGS {
        pt += geometry::heading_step(heading);
        points.push(pt);
    }
    Polygon::new(points)
}
