//! # Planar kd-tree for nearest-neighbor queries
//!
//! A 2-d tree over `(longitude, latitude)` points in degree space, built once
//! per window and queried once per profile record. Distances are planar
//! Euclidean distances; there is no great-circle correction and no longitude
//! wrap-around, matching the matcher's contract.
//!
//! Ties are deterministic: when two stored points are equally distant from a
//! query, the one with the **lowest original index** wins. The search prunes
//! a subtree only when it is strictly farther than the current best, so
//! equal-distance candidates are always visited.

use nalgebra::Vector2;
use ordered_float::OrderedFloat;

/// Index node. Children are arena positions in [`KdTree2::nodes`].
#[derive(Debug)]
struct Node {
    point: Vector2<f64>,
    index: u32,
    left: Option<usize>,
    right: Option<usize>,
}

/// Running best candidate of a nearest search.
#[derive(Debug, Clone, Copy)]
struct Best {
    dist2: f64,
    index: u32,
}

/// Balanced 2-d tree over a fixed point set.
#[derive(Debug)]
pub struct KdTree2 {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl KdTree2 {
    /// Build a balanced tree; `points[i]` keeps `i` as its reported index.
    pub fn build(points: &[Vector2<f64>]) -> Self {
        let mut items: Vec<(Vector2<f64>, u32)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (*p, i as u32))
            .collect();
        let mut nodes = Vec::with_capacity(points.len());
        let root = build_subtree(&mut items, 0, &mut nodes);
        Self { nodes, root }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nearest stored point to `query` as `(original index, distance)`.
    ///
    /// Returns `None` only for an empty tree. Ties on distance resolve to the
    /// lowest original index.
    pub fn nearest(&self, query: &Vector2<f64>) -> Option<(u32, f64)> {
        let root = self.root?;
        let mut best = Best {
            dist2: f64::INFINITY,
            index: u32::MAX,
        };
        self.search(root, query, 0, &mut best);
        Some((best.index, best.dist2.sqrt()))
    }

    fn search(&self, node_idx: usize, query: &Vector2<f64>, axis: usize, best: &mut Best) {
        let node = &self.nodes[node_idx];

        let d2 = (node.point - query).norm_squared();
        if d2 < best.dist2 || (d2 == best.dist2 && node.index < best.index) {
            *best = Best {
                dist2: d2,
                index: node.index,
            };
        }

        let diff = query[axis] - node.point[axis];
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        let next_axis = (axis + 1) % 2;

        if let Some(n) = near {
            self.search(n, query, next_axis, best);
        }
        if let Some(f) = far {
            // Strict pruning: the boundary case re-enters the far side so
            // equal-distance candidates keep the index tie-break exact.
            if diff * diff <= best.dist2 {
                self.search(f, query, next_axis, best);
            }
        }
    }
}

/// Recursive median split, alternating axes. Items are reordered in place;
/// nodes are appended post-order so children always exist before their parent.
fn build_subtree(
    items: &mut [(Vector2<f64>, u32)],
    axis: usize,
    nodes: &mut Vec<Node>,
) -> Option<usize> {
    if items.is_empty() {
        return None;
    }
    let mid = items.len() / 2;
    items.select_nth_unstable_by(mid, |a, b| {
        OrderedFloat(a.0[axis])
            .cmp(&OrderedFloat(b.0[axis]))
            .then(a.1.cmp(&b.1))
    });
    let (point, index) = items[mid];
    let next_axis = (axis + 1) % 2;

    let (left_items, rest) = items.split_at_mut(mid);
    let right_items = &mut rest[1..];
    let left = build_subtree(left_items, next_axis, nodes);
    let right = build_subtree(right_items, next_axis, nodes);

    let node_idx = nodes.len();
    nodes.push(Node {
        point,
        index,
        left,
        right,
    });
    Some(node_idx)
}
