//! Geometry kernel: template polygons and the similarity transforms that
//! place one copy of a template against an edge of another.
//!
//! Points are `glam::DVec2`. Transforms are `glam::DMat3` affine matrices
//! (column-major; the translation lives in `z_axis`). Everything here is a
//! pure function.
//!
//! ## Edge alignment
//!
//! An edge-aligned transform maps edge `src` of the template onto edge `dst`
//! of another instance of the same template, so that the child sits on the
//! far side of the shared edge:
//!
//! - plain maps rotate (and scale) the child; the destination edge is
//!   traversed in reverse, `v[src] -> v[dst + 1]`, `v[src + 1] -> v[dst]`
//! - mirrored maps reflect the child; the destination keeps its direction,
//!   `v[src] -> v[dst]`, `v[src + 1] -> v[dst + 1]`
//!
//! Either way the two edges coincide as segments.

use glam::{DMat3, DVec2, DVec3};

use crate::error::GeometryError;

/// Edges shorter than this are treated as zero length.
const EDGE_EPSILON: f64 = 1e-12;

/// An ordered ring of vertices. Edge `i` runs from vertex `i` to `i + 1`
/// (wrapping).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub points: Vec<DVec2>,
}

impl Polygon {
    pub fn new(points: Vec<DVec2>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Endpoints of edge `index`.
    pub fn edge(&self, index: usize) -> Result<(DVec2, DVec2), GeometryError> {
        let n = self.points.len();
        if n < 2 {
            return Err(GeometryError::TooFewVertices { needed: 2, got: n });
        }
        if index >= n {
            return Err(GeometryError::EdgeOutOfRange { index, edges: n });
        }
        Ok((self.points[index], self.points[(index + 1) % n]))
    }

    /// Bounding box as (min, max).
    pub fn bounding_box(&self) -> Option<(DVec2, DVec2)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))))
    }

    /// Shoelace area; positive for counter-clockwise winding.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area_of_points(&self.points)
    }

    /// This polygon mapped through `m`.
    pub fn transformed(&self, m: &DMat3) -> Polygon {
        Polygon::new(apply(m, &self.points))
    }

    /// Flat `[x0, y0, x1, y1, ...]` form used by the persisted config.
    pub fn to_flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Inverse of [`Polygon::to_flat`]. A trailing odd coordinate is an error.
    pub fn from_flat(coords: &[f64]) -> Option<Polygon> {
        if coords.len() % 2 != 0 {
            return None;
        }
        Some(Polygon::new(
            coords.chunks_exact(2).map(|c| DVec2::new(c[0], c[1])).collect(),
        ))
    }
}

/// Signed area of a point ring using the shoelace formula.
pub fn signed_area_of_points(points: &[DVec2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

/// Area centroid of a polygon.
///
/// Zero-area input (collinear points, a single edge) falls back to the vertex
/// mean so that two-point "polygons" still center correctly.
pub fn centroid(polygon: &Polygon) -> Result<DVec2, GeometryError> {
    let pts = &polygon.points;
    if pts.len() < 2 {
        return Err(GeometryError::TooFewVertices { needed: 2, got: pts.len() });
    }
    if pts.iter().any(|p| !p.is_finite()) {
        return Err(GeometryError::NonFinite);
    }

    let area = signed_area_of_points(pts);
    if area.abs() < EDGE_EPSILON {
        return Ok(pts.iter().copied().sum::<DVec2>() / pts.len() as f64);
    }

    let n = pts.len();
    let mut c = DVec2::ZERO;
    for i in 0..n {
        let p = pts[i];
        let q = pts[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        c += (p + q) * cross;
    }
    Ok(c / (6.0 * area))
}

// ============================================================================
// MATRIX BUILDERS
// ============================================================================

/// Affine matrix from its two linear columns and a translation.
#[inline]
fn affine(x_axis: DVec2, y_axis: DVec2, translation: DVec2) -> DMat3 {
    DMat3::from_cols(x_axis.extend(0.0), y_axis.extend(0.0), DVec3::new(translation.x, translation.y, 1.0))
}

/// Uniform scale followed by a translation.
pub fn scale_translate(scale: f64, tx: f64, ty: f64) -> DMat3 {
    affine(DVec2::new(scale, 0.0), DVec2::new(0.0, scale), DVec2::new(tx, ty))
}

/// Rotation by `angle` radians and uniform `scale` about the origin, then a
/// translation.
pub fn rotate_scale_translate(angle: f64, scale: f64, translation: DVec2) -> DMat3 {
    let (sin, cos) = angle.sin_cos();
    affine(
        DVec2::new(cos * scale, sin * scale),
        DVec2::new(-sin * scale, cos * scale),
        translation,
    )
}

/// Determinant of the linear (2x2) part of an affine matrix.
#[inline]
pub fn determinant(m: &DMat3) -> f64 {
    m.x_axis.x * m.y_axis.y - m.y_axis.x * m.x_axis.y
}

/// Map every point through `m`.
pub fn apply(m: &DMat3, points: &[DVec2]) -> Vec<DVec2> {
    points.iter().map(|p| m.transform_point2(*p)).collect()
}

/// Rotation+scale+translation taking `a0 -> b0` and `a1 -> b1`.
///
/// Treating points as complex numbers this is `z -> k z + t` with
/// `k = (b1 - b0) / (a1 - a0)`.
pub fn edge_map(a0: DVec2, a1: DVec2, b0: DVec2, b1: DVec2) -> Option<DMat3> {
    let da = a1 - a0;
    let db = b1 - b0;
    let len2 = da.length_squared();
    if len2 < EDGE_EPSILON * EDGE_EPSILON {
        return None;
    }

    // k = db * conj(da) / |da|^2
    let k = DVec2::new(db.x * da.x + db.y * da.y, db.y * da.x - db.x * da.y) / len2;
    let t = b0 - DVec2::new(k.x * a0.x - k.y * a0.y, k.x * a0.y + k.y * a0.x);
    Some(affine(DVec2::new(k.x, k.y), DVec2::new(-k.y, k.x), t))
}

/// Like [`edge_map`] but with a reflection: `z -> k conj(z) + t`.
pub fn mirrored_edge_map(a0: DVec2, a1: DVec2, b0: DVec2, b1: DVec2) -> Option<DMat3> {
    let da = a1 - a0;
    let db = b1 - b0;
    let len2 = da.length_squared();
    if len2 < EDGE_EPSILON * EDGE_EPSILON {
        return None;
    }

    // k = db / conj(da) = db * da / |da|^2
    let k = DVec2::new(db.x * da.x - db.y * da.y, db.x * da.y + db.y * da.x) / len2;
    let t = b0 - DVec2::new(k.x * a0.x + k.y * a0.y, k.y * a0.x - k.x * a0.y);
    Some(affine(DVec2::new(k.x, k.y), DVec2::new(k.y, -k.x), t))
}

/// Similarity placing edge `src` of the template onto the sub-segment
/// `[scale_start, scale_end]` of edge `dst` of the same template.
///
/// See the module docs for the orientation rules. `scale_start = 0,
/// scale_end = 1` uses the whole destination edge.
pub fn edge_transform(
    polygon: &Polygon,
    src: usize,
    dst: usize,
    mirror: bool,
    scale_start: f64,
    scale_end: f64,
) -> Result<DMat3, GeometryError> {
    if !scale_start.is_finite() || !scale_end.is_finite() {
        return Err(GeometryError::NonFinite);
    }

    let (a0, a1) = polygon.edge(src)?;
    let (d0, d1) = polygon.edge(dst)?;
    let b0 = d0.lerp(d1, scale_start);
    let b1 = d0.lerp(d1, scale_end);

    let m = if mirror {
        mirrored_edge_map(a0, a1, b0, b1)
    } else {
        edge_map(a0, a1, b1, b0)
    };

    m.ok_or_else(|| {
        let index = if (a1 - a0).length_squared() < EDGE_EPSILON * EDGE_EPSILON { src } else { dst };
        GeometryError::DegenerateEdge { index }
    })
}

// ============================================================================
// TEMPLATE BUILDERS
// ============================================================================

/// Unit step along a heading given in degrees.
#[inline]
pub fn heading_step(degrees: f64) -> DVec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    DVec2::new(cos, sin)
}

/// Regular polygon with unit edge length, centered at the origin,
/// counter-clockwise, with edge 0 horizontal along the bottom.
pub fn regular_polygon(sides: usize) -> Result<Polygon, GeometryError> {
    if sides < 3 {
        return Err(GeometryError::TooFewVertices { needed: 3, got: sides });
    }

    let step = std::f64::consts::TAU / sides as f64;
    let radius = 0.5 / (step / 2.0).sin();
    let start = -std::f64::consts::FRAC_PI_2 - step / 2.0;

    Ok(Polygon::new(
        (0..sides)
            .map(|k| {
                let (sin, cos) = (start + step * k as f64).sin_cos();
                DVec2::new(cos * radius, sin * radius)
            })
            .collect(),
    ))
}

/// Star with `points` tips on the unit circle, alternating with inner
/// vertices. `tip_angle` (degrees) is the interior angle at each tip, which
/// fixes the inner radius. All edges have equal length.
pub fn star_polygon(points: usize, tip_angle: f64) -> Result<Polygon, GeometryError> {
    if points < 3 {
        return Err(GeometryError::TooFewVertices { needed: 3, got: points });
    }
    if !tip_angle.is_finite() || tip_angle <= 0.0 || tip_angle >= 180.0 {
        return Err(GeometryError::NonFinite);
    }

    let half_step = std::f64::consts::PI / points as f64;
    let half_tip = (tip_angle / 2.0).to_radians().tan();
    let inner = half_tip / (half_step.sin() + half_tip * half_step.cos());
    let start = std::f64::consts::FRAC_PI_2;

    Ok(Polygon::new(
        (0..points * 2)
            .map(|k| {
                let r = if k % 2 == 0 { 1.0 } else { inner };
                let (sin, cos) = (start + half_step * k as f64).sin_cos();
                DVec2::new(cos * r, sin * r)
            })
            .collect(),
    ))
}

// ============================================================================
// TESTS
// ============================================================================
