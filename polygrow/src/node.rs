//! Growth rules ([`Transform`]) and shape occurrences ([`Node`]).

use std::cmp::Ordering;

use glam::{DMat3, DMat4, DVec2};

use crate::color::{self, Color};
use crate::geometry::{self, Polygon};

/// Identifier of a node within one tree run. Unique and increasing.
pub type NodeId = u64;

/// Nodes whose linear part has `|det|` at or below this are degenerate no
/// matter what the configured minimum scale is.
const SINGULAR_DETERMINANT: f64 = 1e-5;

/// A rule for deriving a child from a parent: where the child goes, how its
/// color shifts, and how long after the parent it becomes a candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub matrix: DMat3,
    /// Affine map over `(hue, lightness, saturation, 1)`.
    pub color_adjust: DMat4,
    pub gestation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: DMat3::IDENTITY, color_adjust: DMat4::IDENTITY, gestation: 1.0 }
    }
}

impl Transform {
    pub fn new(matrix: DMat3, color_adjust: DMat4, gestation: f64) -> Self {
        Self { matrix, color_adjust, gestation }
    }

    /// Placement-only transform with unit gestation and a slight fade
    /// (lightness x0.96, saturation x0.94) per generation.
    pub fn rotate_scale_translate(angle: f64, scale: f64, translation: DVec2) -> Self {
        Self {
            matrix: geometry::rotate_scale_translate(angle, scale, translation),
            color_adjust: color::fade(0.96, 0.94),
            gestation: 1.0,
        }
    }
}

/// One instantiated copy of the template polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// `None` for the root.
    pub parent_id: Option<NodeId>,
    pub begin_time: f64,
    pub generation: u32,
    /// Maps the template into world space.
    pub global_transform: DMat3,
    pub color: Color,
}

impl Node {
    /// Root node: generation 0 at time 0, template centered on the origin.
    pub fn root(centroid: DVec2, color: Color) -> Self {
        Self {
            id: 0,
            parent_id: None,
            begin_time: 0.0,
            generation: 0,
            global_transform: geometry::scale_translate(1.0, -centroid.x, -centroid.y),
            color,
        }
    }

    /// Derive the child produced by applying `t` to this node.
    ///
    /// `jitter` is added to the gestation delay; the child never starts
    /// before its parent. Degenerate matrices are passed through untouched and
    /// caught by the viability check.
    pub fn beget(&self, t: &Transform, id: NodeId, jitter: f64) -> Node {
        let delay = t.gestation + jitter;
        let begin_time = if delay.is_nan() { self.begin_time } else { self.begin_time + delay.max(0.0) };

        Node {
            id,
            parent_id: Some(self.id),
            begin_time,
            generation: self.generation + 1,
            global_transform: self.global_transform * t.matrix,
            color: self.color.adjusted(&t.color_adjust),
        }
    }

    /// Determinant of the linear part of the global transform: the node's
    /// area relative to the template.
    #[inline]
    pub fn det(&self) -> f64 {
        geometry::determinant(&self.global_transform)
    }

    /// True if the node is too small (or singular) to ever be accepted.
    pub fn is_degenerate(&self, minimum_scale: f64) -> bool {
        let det = self.det().abs();
        !det.is_finite() || det <= SINGULAR_DETERMINANT || det < minimum_scale * minimum_scale
    }

    /// The template mapped into world space.
    pub fn world_polygon(&self, template: &Polygon) -> Polygon {
        template.transformed(&self.global_transform)
    }
}

/// Queue entry: a pending node with its insertion sequence number.
///
/// Ordered so that `BinaryHeap` pops the earliest `begin_time` first and,
/// among equal times, the earliest inserted.
#[derive(Debug, Clone)]
pub(crate) struct Pending {
    pub(crate) seq: u64,
    pub(crate) node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap
        other
            .node
            .begin_time
            .total_cmp(&self.node.begin_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn pending(seq: u64, begin_time: f64) -> Pending {
        let mut node = Node::root(DVec2::ZERO, Color::WHITE);
        node.begin_time = begin_time;
        Pending { seq, node }
    }

    #[test]
    fn root_centers_template() {
        let root = Node::root(DVec2::new(2.0, -1.0), Color::WHITE);
        assert_eq!(root.global_transform.transform_point2(DVec2::new(2.0, -1.0)), DVec2::ZERO);
        assert_eq!(root.generation, 0);
        assert_eq!(root.parent_id, None);
    }

    #[test]
    fn beget_composes_and_advances() {
        let parent = Node::root(DVec2::ZERO, Color::rgb(1.0, 0.0, 0.0));
        let t = Transform::new(
            geometry::scale_translate(0.5, 3.0, 0.0),
            DMat4::IDENTITY,
            2.5,
        );

        let child = parent.beget(&t, 7, 0.0);
        assert_eq!(child.id, 7);
        assert_eq!(child.parent_id, Some(0));
        assert_eq!(child.generation, 1);
        assert_eq!(child.begin_time, 2.5);
        assert_eq!(child.global_transform, parent.global_transform * t.matrix);
        assert!((child.det() - 0.25).abs() < 1e-12);

        let grandchild = child.beget(&t, 8, 0.0);
        assert_eq!(grandchild.generation, 2);
        assert_eq!(grandchild.begin_time, 5.0);
        assert!((grandchild.det() - 0.0625).abs() < 1e-12);
    }

    #[test]
    fn beget_applies_color_adjust() {
        let parent = Node::root(DVec2::ZERO, Color::rgb(1.0, 0.0, 0.0));
        let t = Transform::new(DMat3::IDENTITY, color::color_sink_toward(Color::rgb(0.0, 0.0, 1.0), 1.0), 1.0);
        let child = parent.beget(&t, 1, 0.0);
        assert!(child.color.b > 0.99 && child.color.r < 0.01, "got {:?}", child.color);
    }

    #[test]
    fn placement_transform_fades_each_generation() {
        let t = Transform::rotate_scale_translate(0.0, 0.8, DVec2::new(1.0, 0.0));
        assert_eq!(t.gestation, 1.0);

        let parent = Node::root(DVec2::ZERO, Color::rgb(1.0, 0.0, 0.0));
        let child = parent.beget(&t, 1, 0.0);
        let (before, after) = (parent.color.to_hls(), child.color.to_hls());
        assert!((after.y - before.y * 0.96).abs() < 1e-9);
        assert!((after.z - before.z * 0.94).abs() < 1e-9);
        assert!((child.det() - 0.64).abs() < 1e-12);
    }

    #[test]
    fn negative_jitter_never_precedes_parent() {
        let mut parent = Node::root(DVec2::ZERO, Color::WHITE);
        parent.begin_time = 4.0;
        let child = parent.beget(&Transform::default(), 1, -10.0);
        assert_eq!(child.begin_time, 4.0);
    }

    #[test]
    fn degeneracy_threshold() {
        let mut node = Node::root(DVec2::ZERO, Color::WHITE);
        node.global_transform = geometry::scale_translate(0.02, 0.0, 0.0);
        // det = 4e-4, threshold 1e-4
        assert!(!node.is_degenerate(0.01));
        node.global_transform = geometry::scale_translate(0.009, 0.0, 0.0);
        assert!(node.is_degenerate(0.01));
        node.global_transform = DMat3::ZERO;
        assert!(node.is_degenerate(0.0));
    }

    #[test]
    fn queue_pops_earliest_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(pending(0, 3.0));
        heap.push(pending(1, 1.0));
        heap.push(pending(2, 1.0));
        heap.push(pending(3, 0.5));

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|p| p.seq)).collect();
        assert_eq!(order, vec![3, 1, 2, 0]);
    }
}
