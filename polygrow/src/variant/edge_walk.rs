//! Quadrilateral edge-walk: an annular-sector quad whose three edge maps
//! step around and outward, tiling a logarithmic spiral.

use glam::DVec2;

use super::random_color;
use crate::color::{self, Color};
use crate::config::TreeConfig;
use crate::error::GeometryError;
use crate::geometry::{self, Polygon};
use crate::node::Transform;
use crate::rng::Rng;

/// Quads per full turn.
const STEPS: u32 = 24;
const INNER_RADIUS: f64 = 0.5;
const OUTER_RADIUS: f64 = 1.0;

pub(super) fn seed(config: &mut TreeConfig, rng: &mut Rng) -> Result<(), GeometryError> {
    config.field_resolution = 200;
    config.max_radius = 10.0;
    config.gestation_randomness = 10.0;
    config.root_color = Color::rgb(0.0, 0.5, 0.2);

    config.polygon = template();

    // (destination edge, mirrored)
    let placements = [(1, true), (2, false), (3, true)];
    let mut transforms = Vec::with_capacity(placements.len());
    for (dst, mirror) in placements {
        let matrix = geometry::edge_transform(&config.polygon, 0, dst, mirror, 0.0, 1.0)?;
        transforms.push(Transform::new(matrix, color::color_sink_toward(random_color(rng), 0.5), 1.0));
    }
    for t in &mut transforms {
        t.gestation = rng.range(0.1, 10.0);
    }
    config.transforms = transforms;
    Ok(())
}

/// Sector of the annulus `INNER_RADIUS..OUTER_RADIUS` spanning one step,
/// with the far side grown by the per-step factor so that the ring width
/// doubles every half turn.
pub(super) fn template() -> Polygon {
    let angle = std::f64::consts::TAU / STEPS as f64;
    let growth = (OUTER_RADIUS / INNER_RADIUS).powf(2.0 / STEPS as f64);
    let dir = DVec2::from_angle(angle) * growth;

    Polygon::new(vec![
        DVec2::new(INNER_RADIUS, 0.0),
        DVec2::new(OUTER_RADIUS, 0.0),
        dir * OUTER_RADIUS,
        dir * INNER_RADIUS,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;

    #[test]
    fn template_is_convex_quad() {
        let quad = template();
        assert_eq!(quad.len(), 4);
        assert!(quad.signed_area() > 0.0);
    }

    #[test]
    fn three_transforms_with_fixed_tunables() {
        let config = TreeConfig::seeded(Variant::EdgeWalk, 5).unwrap();
        assert_eq!(config.transforms.len(), 3);
        assert_eq!(config.field_resolution, 200);
        assert_eq!(config.max_radius, 10.0);
        assert_eq!(config.gestation_randomness, 10.0);
        assert_eq!(config.root_color, Color::rgb(0.0, 0.5, 0.2));
        for t in &config.transforms {
            assert!(t.gestation >= 0.1 && t.gestation < 10.0);
        }
    }

    #[test]
    fn outward_step_grows() {
        let config = TreeConfig::seeded(Variant::EdgeWalk, 0).unwrap();
        let growth = (OUTER_RADIUS / INNER_RADIUS).powf(2.0 / STEPS as f64);
        // edge 0 onto the far edge scales by the growth factor
        let det = geometry::determinant(&config.transforms[1].matrix);
        assert!((det - growth * growth).abs() < 1e-9, "det {} growth {}", det, growth);
    }
}
