//! The growth scheduler.
//!
//! A [`Tree`] owns one run: the configuration, the occupancy field, the
//! pending queue and the accepted nodes. Each [`Tree::process`] call pops the
//! earliest pending node, decides whether it is viable and, if so, commits its
//! footprint and enqueues one child per transform. Children are only judged
//! when popped, never when enqueued.
//!
//! Growth stops on its own: shrinking variants eventually produce degenerate
//! children, and every variant eventually runs out of free field.

use std::collections::BinaryHeap;

use glam::DVec2;
use log::{debug, info, trace};

use crate::config::TreeConfig;
use crate::error::{ConfigurationError, PolygrowError};
use crate::field::{Field, Footprint};
use crate::geometry::{self, Polygon};
use crate::node::{Node, NodeId, Pending, Transform};
use crate::rng::Rng;

/// Mixed into the configuration seed for the gestation jitter stream, so it
/// never replays the sequence the variant drew its tunables from.
const JITTER_SALT: u64 = 0x6a09_e667_f3bc_c908;

/// Why a candidate was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Scaled below the minimum, singular, or too small to claim a cell.
    Degenerate,
    /// A vertex left the growth radius, or the footprint left the field.
    OutOfBounds,
    /// The footprint hits an accepted node.
    Overlap,
}

/// Result of processing one pending node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Accepted(NodeId),
    Discarded { id: NodeId, reason: DiscardReason },
}

/// Counts from [`Tree::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    pub accepted: usize,
    pub discarded: usize,
    /// True if the queue emptied before the step limit.
    pub exhausted: bool,
}

/// Pending queue plus the counters that make it deterministic.
#[derive(Debug, Clone)]
struct Spawner {
    queue: BinaryHeap<Pending>,
    next_id: NodeId,
    next_seq: u64,
    jitter: Rng,
}

impl Spawner {
    fn new(seed: u64) -> Self {
        Self { queue: BinaryHeap::new(), next_id: 0, next_seq: 0, jitter: Rng::new(seed ^ JITTER_SALT) }
    }

    fn push(&mut self, node: Node) {
        self.queue.push(Pending { seq: self.next_seq, node });
        self.next_seq += 1;
    }

    fn take_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Enqueue one child of `parent` per transform.
    fn spawn(&mut self, parent: &Node, transforms: &[Transform], randomness: f64) {
        for t in transforms {
            let jitter = if randomness > 0.0 { randomness * self.jitter.signed() } else { 0.0 };
            let id = self.take_id();
            self.push(parent.beget(t, id, jitter));
        }
    }
}

/// One growth run.
#[derive(Debug, Clone)]
pub struct Tree {
    config: TreeConfig,
    field: Field,
    spawner: Spawner,
    nodes: Vec<Node>,
    /// Template centroid; the root is translated by its negation.
    centroid: DVec2,
}

impl Tree {
    /// Validate `config`, allocate the field and seed the root.
    ///
    /// Fails before any growth if the template is malformed or the field
    /// cannot be built.
    pub fn new(config: TreeConfig) -> Result<Tree, PolygrowError> {
        if !config.minimum_scale.is_finite() || config.minimum_scale <= 0.0 {
            return Err(ConfigurationError::InvalidMinimumScale(config.minimum_scale).into());
        }
        let centroid = geometry::centroid(&config.polygon)?;
        let field = Field::new(config.max_radius, config.field_resolution)?;

        let mut tree = Tree {
            spawner: Spawner::new(config.random_seed),
            config,
            field,
            nodes: Vec::new(),
            centroid,
        };
        tree.create();
        Ok(tree)
    }

    /// Restart from the root: empty field, empty model, queue holding only
    /// the root node.
    pub fn create(&mut self) {
        self.field.clear();
        self.nodes.clear();
        self.spawner = Spawner::new(self.config.random_seed);

        let mut root = Node::root(self.centroid, self.config.root_color);
        root.id = self.spawner.take_id();
        self.spawner.push(root);

        debug!(
            "created {} tree: seed {}, {} transforms, field {}x{}",
            self.config.variant.name(),
            self.config.random_seed,
            self.config.transforms.len(),
            self.field.side(),
            self.field.side()
        );
    }

    /// Process the earliest pending node. `None` once the queue is empty.
    pub fn process(&mut self) -> Option<StepOutcome> {
        let Pending { node, .. } = self.spawner.queue.pop()?;
        let id = node.id;

        match self.evaluate(&node) {
            Err(reason) => {
                trace!("discard node {} (gen {}, t {:.3}): {:?}", id, node.generation, node.begin_time, reason);
                Some(StepOutcome::Discarded { id, reason })
            }
            Ok(fp) => {
                self.field.commit(&fp);
                self.spawner.spawn(&node, &self.config.transforms, self.config.gestation_randomness);
                debug!("accept node {} (gen {}, t {:.3})", id, node.generation, node.begin_time);
                self.nodes.push(node);
                Some(StepOutcome::Accepted(id))
            }
        }
    }

    /// Driver surface: one step; false when nothing was left to process.
    pub fn step(&mut self) -> bool {
        self.process().is_some()
    }

    /// Step until the queue empties or `max_steps` have run.
    pub fn run(&mut self, max_steps: usize) -> RunSummary {
        let mut summary = RunSummary::default();
        while summary.steps < max_steps {
            match self.process() {
                Some(StepOutcome::Accepted(_)) => summary.accepted += 1,
                Some(StepOutcome::Discarded { .. }) => summary.discarded += 1,
                None => {
                    summary.exhausted = true;
                    break;
                }
            }
            summary.steps += 1;
        }
        // the last step may have drained the queue exactly at the limit
        summary.exhausted |= self.spawner.queue.is_empty();

        info!(
            "{} steps: {} accepted, {} discarded, {} nodes, {} pending{}",
            summary.steps,
            summary.accepted,
            summary.discarded,
            self.nodes.len(),
            self.spawner.queue.len(),
            if summary.exhausted { " (exhausted)" } else { "" }
        );
        summary
    }

    /// Re-enqueue children of every accepted node under the current
    /// transforms. Accepted nodes are not re-validated.
    pub fn regrow_all(&mut self) {
        for node in &self.nodes {
            self.spawner.spawn(node, &self.config.transforms, self.config.gestation_randomness);
        }
        debug!("regrow: {} pending", self.spawner.queue.len());
    }

    /// Remove one accepted node (by id, or the oldest when `id` is `None`)
    /// and release its cells. Returns how many nodes were removed.
    ///
    /// Descendants stay in place and keep their `parent_id`.
    pub fn remove_node(&mut self, id: Option<NodeId>) -> usize {
        let index = match id {
            None if self.nodes.is_empty() => return 0,
            None => 0,
            Some(id) => match self.nodes.iter().position(|n| n.id == id) {
                Some(i) => i,
                None => return 0,
            },
        };

        let node = self.nodes.remove(index);
        // the footprint is a pure function of the node, so this is the one
        // that was committed
        if let Some(fp) = self.field.test_draw(&self.config.polygon, &node) {
            self.field.retract(&fp);
        }
        debug!("removed node {} (gen {}); descendants kept", node.id, node.generation);
        1
    }

    /// Replace the transform set. Already queued children are unaffected;
    /// call [`Tree::regrow_all`] to grow the new rules from accepted nodes.
    pub fn set_transforms(&mut self, transforms: Vec<Transform>) {
        self.config.transforms = transforms;
    }

    /// Queue an arbitrary candidate. It is judged like any other when popped.
    pub fn enqueue(&mut self, mut node: Node) -> NodeId {
        node.id = self.spawner.take_id();
        let id = node.id;
        self.spawner.push(node);
        id
    }

    /// Footprint of `node` if it would be accepted now, else why not.
    pub fn evaluate(&self, node: &Node) -> Result<Footprint, DiscardReason> {
        if node.is_degenerate(self.config.minimum_scale) {
            return Err(DiscardReason::Degenerate);
        }
        let fp = self
            .field
            .test_draw(&self.config.polygon, node)
            .ok_or(DiscardReason::OutOfBounds)?;
        // an empty footprint can never collide, so it could stack forever
        if fp.filled_cells() == 0 {
            return Err(DiscardReason::Degenerate);
        }
        if self.field.overlaps(&fp) {
            return Err(DiscardReason::Overlap);
        }
        Ok(fp)
    }

    /// Non-degenerate, in bounds and not overlapping. Changes nothing.
    pub fn is_viable(&self, node: &Node) -> bool {
        self.evaluate(node).is_ok()
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Accepted nodes in acceptance order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of pending candidates.
    pub fn pending(&self) -> usize {
        self.spawner.queue.len()
    }

    /// The node the next [`Tree::process`] call will pop.
    pub fn peek_next(&self) -> Option<&Node> {
        self.spawner.queue.peek().map(|p| &p.node)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The template as placed by `node`.
    pub fn world_polygon(&self, node: &Node) -> Polygon {
        node.world_polygon(&self.config.polygon)
    }

    /// World-space bounds of all accepted nodes.
    pub fn bounding_rect(&self) -> Option<(DVec2, DVec2)> {
        self.nodes
            .iter()
            .filter_map(|n| self.world_polygon(n).bounding_box())
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
    }
}

// ============================================================================
// TESTS
// ============================================================================
