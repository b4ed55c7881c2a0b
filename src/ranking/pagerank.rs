//! Personalized PageRank via weighted power iteration.
//!
//! A damped random walk over the reference graph: with probability
//! `damping` the walker follows an outgoing edge, chosen proportionally to
//! edge weight; otherwise it teleports according to the personalization
//! distribution (uniform when none is given). Mass sitting on dangling
//! nodes - nodes with no outgoing edges - is redistributed through the same
//! distribution each step, so it cannot leak out of the walk.
//!
//! Deterministic for a fixed graph and personalization vector; edge
//! iteration order never changes the converged result.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::RefEdge;

/// Stationary importance distribution over graph nodes.
///
/// `personalization` maps node -> teleport mass (any positive scale; it is
/// normalized internally). An empty map means uniform teleportation.
/// Convergence uses the conventional `sum(|delta|) < n * tolerance` test,
/// bounded by `max_iterations`.
pub fn personalized_rank(
    graph: &DiGraph<String, RefEdge>,
    personalization: &HashMap<NodeIndex, f64>,
    damping: f64,
    tolerance: f64,
    max_iterations: usize,
) -> HashMap<NodeIndex, f64> {
    let n = graph.node_count();
    if n == 0 {
        return HashMap::new();
    }

    // Teleport distribution: normalized personalization, or uniform
    let total_mass: f64 = personalization.values().sum();
    let teleport: Vec<f64> = if total_mass > 0.0 {
        graph
            .node_indices()
            .map(|idx| personalization.get(&idx).copied().unwrap_or(0.0) / total_mass)
            .collect()
    } else {
        vec![1.0 / n as f64; n]
    };

    // Total outgoing edge weight per node; zero marks a dangling node
    let mut out_weight = vec![0.0_f64; n];
    for edge in graph.edge_references() {
        out_weight[edge.source().index()] += edge.weight().weight;
    }

    let mut ranks = vec![1.0 / n as f64; n];

    for _ in 0..max_iterations {
        let dangling_mass: f64 = graph
            .node_indices()
            .filter(|idx| out_weight[idx.index()] == 0.0)
            .map(|idx| ranks[idx.index()])
            .sum();

        // Teleport and dangling mass first, then edge contributions
        let mut next: Vec<f64> = teleport
            .iter()
            .map(|&p| (1.0 - damping) * p + damping * dangling_mass * p)
            .collect();

        for edge in graph.edge_references() {
            let src = edge.source().index();
            next[edge.target().index()] +=
                damping * ranks[src] * edge.weight().weight / out_weight[src];
        }

        let err: f64 = next
            .iter()
            .zip(&ranks)
            .map(|(new, old)| (new - old).abs())
            .sum();

        ranks = next;

        if err < n as f64 * tolerance {
            break;
        }
    }

    graph
        .node_indices()
        .map(|idx| (idx, ranks[idx.index()]))
        .collect()
}
