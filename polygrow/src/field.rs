//! Occupancy field: the raster collision oracle.
//!
//! The field is a square grid of `u8` cells covering the disc of radius
//! `max_radius` around the origin at `resolution` cells per model unit.
//! A claimed cell holds 255, a free one 0.
//!
//! Testing a node produces a [`Footprint`]: the node's rasterized cells,
//! restricted to their integer bounding box. The footprint is an ordinary
//! value; [`Field::overlaps`], [`Field::commit`] and [`Field::retract`] take
//! it explicitly, so there is no hidden "last tested node" state to keep in
//! sync.
//!
//! ## Rasterization
//!
//! Vertices are rounded to cell coordinates. Cells whose integer coordinate
//! lies inside the polygon (even-odd scanline) are set, then every cell on the
//! 8-connected outline is cleared again. The outline erase is a tolerance: two
//! polygons that share an edge both lose the cells along it, so exact
//! neighbours never collide on rounding noise.

use glam::{DMat3, DVec2};

use crate::error::ConfigurationError;
use crate::geometry::{self, Polygon};
use crate::node::Node;

/// Largest allowed field side, in cells.
pub const MAX_FIELD_SIDE: u64 = 8192;

const CLAIMED: u8 = 255;

/// Integer cell rectangle, inclusive of `x`/`y`, exclusive of `x + width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellRect {
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Intersection with another rectangle, if non-empty.
    pub fn intersect(&self, other: &CellRect) -> Option<CellRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);
        (x0 < x1 && y0 < y1).then(|| CellRect { x: x0, y: y0, width: x1 - x0, height: y1 - y0 })
    }
}

/// A node's rasterized cells, covering exactly `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    rect: CellRect,
    mask: Vec<u8>,
}

impl Footprint {
    #[inline]
    pub fn rect(&self) -> CellRect {
        self.rect
    }

    /// Row-major cells of [`Footprint::rect`].
    #[inline]
    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    /// Cell value at field coordinates `(x, y)`; 0 outside the rectangle.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        let r = self.rect;
        if x < r.x || y < r.y || x >= r.x + r.width || y >= r.y + r.height {
            return 0;
        }
        self.mask[(y - r.y) * r.width + (x - r.x)]
    }

    pub fn filled_cells(&self) -> usize {
        self.mask.iter().filter(|&&c| c != 0).count()
    }

    /// True if the two footprints share a set cell.
    pub fn overlaps(&self, other: &Footprint) -> bool {
        let Some(common) = self.rect.intersect(&other.rect) else {
            return false;
        };
        (common.y..common.y + common.height)
            .any(|y| (common.x..common.x + common.width).any(|x| self.get(x, y) & other.get(x, y) != 0))
    }

    #[inline]
    fn set(&mut self, x: i64, y: i64, value: u8) {
        let (x, y) = (x as usize - self.rect.x, y as usize - self.rect.y);
        self.mask[y * self.rect.width + x] = value;
    }
}

/// Claimed-area raster shared by all accepted nodes of one tree.
#[derive(Debug, Clone)]
pub struct Field {
    side: usize,
    max_radius: f64,
    resolution: u32,
    /// World (model units) to cell coordinates.
    transform: DMat3,
    cells: Vec<u8>,
}

impl Field {
    /// Allocate an empty field; fails before any growth if the requested
    /// extent is invalid or cannot be allocated.
    pub fn new(max_radius: f64, resolution: u32) -> Result<Field, ConfigurationError> {
        if !max_radius.is_finite() || max_radius <= 0.0 {
            return Err(ConfigurationError::InvalidRadius(max_radius));
        }
        if resolution == 0 {
            return Err(ConfigurationError::InvalidResolution(resolution));
        }

        let scaled = max_radius * resolution as f64;
        let side = (0.5 + scaled * 2.0).floor();
        if side > MAX_FIELD_SIDE as f64 {
            return Err(ConfigurationError::FieldTooLarge { side: side as u64, limit: MAX_FIELD_SIDE });
        }
        let side = side as usize;

        let count = side * side;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(count)
            .map_err(|_| ConfigurationError::AllocationFailed { cells: count as u64 })?;
        cells.resize(count, 0);

        Ok(Field {
            side,
            max_radius,
            resolution,
            transform: geometry::scale_translate(resolution as f64, scaled, scaled),
            cells,
        })
    }

    /// Cells per side.
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Row-major committed cells (`side * side`), for mask export.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Rasterize `template` placed by `node`.
    ///
    /// Returns `None` when any world-space vertex lies outside `max_radius`
    /// or the cell bounding box leaves the field. The committed cells are
    /// never touched.
    pub fn test_draw(&self, template: &Polygon, node: &Node) -> Option<Footprint> {
        let r2 = self.max_radius * self.max_radius;
        let world = geometry::apply(&node.global_transform, &template.points);
        if world.iter().any(|p| !p.is_finite() || p.length_squared() > r2) {
            return None;
        }

        let to_cells = self.transform * node.global_transform;
        let pts: Vec<(i64, i64)> = geometry::apply(&to_cells, &template.points)
            .into_iter()
            .map(|p: DVec2| (p.x.round() as i64, p.y.round() as i64))
            .collect();
        if pts.is_empty() {
            return None;
        }

        let (min_x, max_x) = pts.iter().fold((i64::MAX, i64::MIN), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));
        let (min_y, max_y) = pts.iter().fold((i64::MAX, i64::MIN), |(lo, hi), p| (lo.min(p.1), hi.max(p.1)));
        let side = self.side as i64;
        if min_x < 0 || min_y < 0 || max_x >= side || max_y >= side {
            return None;
        }

        let rect = CellRect {
            x: min_x as usize,
            y: min_y as usize,
            width: (max_x - min_x + 1) as usize,
            height: (max_y - min_y + 1) as usize,
        };
        let mut fp = Footprint { rect, mask: vec![0; rect.area()] };

        fill_polygon(&mut fp, &pts, (min_x, max_x), (min_y, max_y));

        let n = pts.len();
        for i in 0..n {
            draw_line(&mut fp, pts[i], pts[(i + 1) % n], 0);
        }

        Some(fp)
    }

    /// True if any cell of `fp` is already claimed.
    pub fn overlaps(&self, fp: &Footprint) -> bool {
        let r = fp.rect;
        (0..r.height).any(|row| {
            let field_row = &self.cells[(r.y + row) * self.side + r.x..][..r.width];
            let mask_row = &fp.mask[row * r.width..][..r.width];
            field_row.iter().zip(mask_row).any(|(a, b)| a & b != 0)
        })
    }

    /// Claim every cell of `fp`.
    pub fn commit(&mut self, fp: &Footprint) {
        let r = fp.rect;
        for row in 0..r.height {
            let start = (r.y + row) * self.side + r.x;
            let field_row = &mut self.cells[start..start + r.width];
            let mask_row = &fp.mask[row * r.width..][..r.width];
            for (cell, m) in field_row.iter_mut().zip(mask_row) {
                *cell |= m;
            }
        }
    }

    /// Release every cell of `fp`.
    pub fn retract(&mut self, fp: &Footprint) {
        let r = fp.rect;
        for row in 0..r.height {
            let start = (r.y + row) * self.side + r.x;
            let field_row = &mut self.cells[start..start + r.width];
            let mask_row = &fp.mask[row * r.width..][..r.width];
            for (cell, m) in field_row.iter_mut().zip(mask_row) {
                *cell &= !m;
            }
        }
    }
}

/// Even-odd scanline fill, sampling each cell at its integer coordinate.
fn fill_polygon(fp: &mut Footprint, pts: &[(i64, i64)], (min_x, max_x): (i64, i64), (min_y, max_y): (i64, i64)) {
    let n = pts.len();
    let mut crossings: Vec<f64> = Vec::with_capacity(n);

    for y in min_y..=max_y {
        let yf = y as f64;
        crossings.clear();

        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (pts[i].0 as f64, pts[i].1 as f64);
            let (xj, yj) = (pts[j].0 as f64, pts[j].1 as f64);
            if (yi > yf) != (yj > yf) {
                crossings.push(xi + (yf - yi) * (xj - xi) / (yj - yi));
            }
            j = i;
        }
        crossings.sort_by(f64::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let start = (pair[0].ceil() as i64).max(min_x);
            let end = (pair[1].floor() as i64).min(max_x);
            for x in start..=end {
                fp.set(x, y, CLAIMED);
            }
        }
    }
}

/// 8-connected Bresenham line between two cells inside the footprint.
fn draw_line(fp: &mut Footprint, from: (i64, i64), to: (i64, i64), value: u8) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        fp.set(x, y, value);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ])
    }

    fn node_at(x: f64, y: f64, scale: f64) -> Node {
        let mut node = Node::root(DVec2::ZERO, Color::WHITE);
        node.global_transform = geometry::scale_translate(scale, x, y);
        node
    }

    #[test]
    fn side_covers_diameter() {
        let field = Field::new(10.0, 40).unwrap();
        assert_eq!(field.side(), 800);
        assert_eq!(field.filled_cells(), 0);
    }

    #[test]
    fn rejects_bad_tunables() {
        assert_eq!(Field::new(0.0, 10).unwrap_err(), ConfigurationError::InvalidRadius(0.0));
        assert!(matches!(Field::new(f64::NAN, 10), Err(ConfigurationError::InvalidRadius(_))));
        assert_eq!(Field::new(1.0, 0).unwrap_err(), ConfigurationError::InvalidResolution(0));
        assert!(matches!(
            Field::new(1.0e6, 1000),
            Err(ConfigurationError::FieldTooLarge { .. })
        ));
    }

    #[test]
    fn square_footprint_interior() {
        let field = Field::new(5.0, 10).unwrap();
        let fp = field.test_draw(&unit_square(), &node_at(0.0, 0.0, 1.0)).unwrap();
        // 11x11 cell box, outline erased leaves the 9x9 interior
        assert_eq!(fp.rect().width, 11);
        assert_eq!(fp.rect().height, 11);
        assert_eq!(fp.filled_cells(), 81);
    }

    #[test]
    fn vertex_outside_radius_is_rejected() {
        let field = Field::new(2.0, 10).unwrap();
        assert!(field.test_draw(&unit_square(), &node_at(1.5, 0.0, 1.0)).is_none());
        assert!(field.test_draw(&unit_square(), &node_at(0.5, 0.0, 1.0)).is_some());
    }

    #[test]
    fn overlap_commit_retract() {
        let mut field = Field::new(5.0, 10).unwrap();
        let square = unit_square();

        let a = field.test_draw(&square, &node_at(0.0, 0.0, 1.0)).unwrap();
        assert!(!field.overlaps(&a));
        field.commit(&a);
        assert_eq!(field.filled_cells(), a.filled_cells());

        let b = field.test_draw(&square, &node_at(0.5, 0.5, 1.0)).unwrap();
        assert!(field.overlaps(&b));
        assert!(a.overlaps(&b));

        field.retract(&a);
        assert_eq!(field.filled_cells(), 0);
        assert!(!field.overlaps(&b));
    }

    #[test]
    fn edge_neighbours_do_not_overlap() {
        let mut field = Field::new(5.0, 7).unwrap();
        let square = unit_square();

        let a = field.test_draw(&square, &node_at(0.0, 0.0, 1.0)).unwrap();
        field.commit(&a);
        for (x, y) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
            let b = field.test_draw(&square, &node_at(x, y, 1.0)).unwrap();
            assert!(!field.overlaps(&b), "neighbour at ({}, {}) collided", x, y);
        }
    }

    #[test]
    fn test_draw_leaves_field_untouched() {
        let field = Field::new(3.0, 10).unwrap();
        let before = field.cells().to_vec();
        let _ = field.test_draw(&unit_square(), &node_at(-0.5, -0.5, 1.0));
        assert_eq!(field.cells(), &before[..]);
    }

    #[test]
    fn rect_intersection() {
        let a = CellRect { x: 0, y: 0, width: 4, height: 4 };
        let b = CellRect { x: 2, y: 3, width: 5, height: 5 };
        assert_eq!(a.intersect(&b), Some(CellRect { x: 2, y: 3, width: 2, height: 1 }));
        let c = CellRect { x: 4, y: 0, width: 1, height: 1 };
        assert_eq!(a.intersect(&c), None);
    }
}
