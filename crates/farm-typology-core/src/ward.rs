//! Ward minimum-variance agglomerative clustering.
//!
//! # Algorithm
//!
//! Every point starts as a singleton cluster. While more clusters remain
//! than the target, the pair whose merge would least increase the total
//! within-cluster sum of squares is merged. For clusters with sizes
//! s₁, s₂ and centroids c₁, c₂ that increase has the closed form
//!
//! ```text
//! cost = s₁·s₂/(s₁+s₂) · ‖c₁ − c₂‖²
//! ```
//!
//! # Determinism
//!
//! Two rules are contractual and must not be "improved":
//!
//! - The pair scan runs in ascending (i, then j) order and a candidate
//!   wins only on strictly lower cost, so exact ties go to the first pair
//!   encountered.
//! - The two source clusters are removed from the working list (j before i,
//!   so both indices stay valid) and the merged cluster is pushed at the
//!   end. Final label ids are positions in this working list, which makes
//!   them reproducible but semantically arbitrary.
//!
//! # Complexity
//!
//! Naive O(C²) pair rescan per merge, O(N³) overall. Fine for the tens to
//! low hundreds of farm-season rows this engine targets; a larger N needs
//! a nearest-neighbor-chain redesign, not a bigger iteration budget.

use tracing::debug;

/// One merge of the agglomeration, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStep {
    /// Ward cost of the merge (increase in within-cluster sum of squares).
    /// Non-decreasing across a run for well-formed input.
    pub cost: f64,
    /// Size of the cluster produced by this merge
    pub merged_size: usize,
}

/// Labels plus the merge trace that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct WardClustering {
    /// One label per input row, each in [0, target); stable only within
    /// one run
    pub labels: Vec<usize>,
    /// Merge-cost sequence, length `points.len() - target` when the target
    /// is below the point count
    pub merges: Vec<MergeStep>,
}

/// Transient agglomeration node; consumed when merged.
#[derive(Debug, Clone)]
struct ClusterNode {
    members: Vec<usize>,
    centroid: Vec<f64>,
    size: usize,
}

/// Agglomerate `points` into `target` clusters.
///
/// If `target >= points.len()` no merge happens and every row keeps its
/// own label. The engine validates `target < N` upstream; this function
/// only requires `target >= 1`.
pub fn cluster(points: &[Vec<f64>], target: usize) -> WardClustering {
    assert!(target >= 1, "cluster target must be >= 1");

    let n = points.len();
    let mut nodes: Vec<ClusterNode> = points
        .iter()
        .enumerate()
        .map(|(row, point)| ClusterNode {
            members: vec![row],
            centroid: point.clone(),
            size: 1,
        })
        .collect();

    let mut merges = Vec::with_capacity(n.saturating_sub(target));
    while nodes.len() > target {
        let (best_i, best_j, best_cost) = closest_pair(&nodes);
        let merged = merge(&nodes[best_i], &nodes[best_j]);
        merges.push(MergeStep {
            cost: best_cost,
            merged_size: merged.size,
        });

        // best_j > best_i: removing j first keeps i valid.
        nodes.remove(best_j);
        nodes.remove(best_i);
        nodes.push(merged);
    }

    let mut labels = vec![0usize; n];
    for (label, node) in nodes.iter().enumerate() {
        for &row in &node.members {
            labels[row] = label;
        }
    }

    debug!(
        points = n,
        clusters = nodes.len(),
        merges = merges.len(),
        "Ward agglomeration finished"
    );

    WardClustering { labels, merges }
}

/// Scan all unordered pairs for the strictly cheapest merge.
fn closest_pair(nodes: &[ClusterNode]) -> (usize, usize, f64) {
    let mut best_i = 0;
    let mut best_j = 1;
    let mut best_cost = f64::INFINITY;

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let cost = merge_cost(&nodes[i], &nodes[j]);
            if cost < best_cost {
                best_cost = cost;
                best_i = i;
                best_j = j;
            }
        }
    }

    (best_i, best_j, best_cost)
}

fn merge_cost(a: &ClusterNode, b: &ClusterNode) -> f64 {
    let squared_distance: f64 = a
        .centroid
        .iter()
        .zip(&b.centroid)
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    (a.size * b.size) as f64 / (a.size + b.size) as f64 * squared_distance
}

fn merge(a: &ClusterNode, b: &ClusterNode) -> ClusterNode {
    let size = a.size + b.size;
    let centroid = a
        .centroid
        .iter()
        .zip(&b.centroid)
        .map(|(x, y)| (x * a.size as f64 + y * b.size as f64) / size as f64)
        .collect();

    let mut members = Vec::with_capacity(size);
    members.extend_from_slice(&a.members);
    members.extend_from_slice(&b.members);

    ClusterNode {
        members,
        centroid,
        size,
    }
}
