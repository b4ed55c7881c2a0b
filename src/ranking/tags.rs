//! Rank redistribution and ranked tag selection.
//!
//! PageRank scores live on files; the map renders individual definitions.
//! Redistribution moves each file's rank onto the definitions it
//! references: a node's rank is split across its outgoing edges in
//! proportion to edge weight and accumulated per `(definer, identifier)`
//! pair. Edges to distinct definers of the same identifier distribute
//! independently - merging them would change relative rankings.
//!
//! Selection then walks the pairs in descending rank, skips definers that
//! are themselves active (their symbols are already visible to the caller),
//! and expands each survivor into its detail rows.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::RefEdge;
use crate::types::TagRow;

/// Distribute each node's rank across its outgoing edges.
///
/// Returns `(definer_rel_fname, identifier) -> accumulated rank`, sorted by
/// rank descending with ties broken lexicographically by the pair (the
/// accumulator is a BTreeMap, so the stable sort preserves key order).
/// Nodes with no outgoing edges contribute nothing.
pub fn distribute_ranks(
    graph: &DiGraph<String, RefEdge>,
    ranks: &HashMap<NodeIndex, f64>,
) -> Vec<((String, String), f64)> {
    let mut accumulated: BTreeMap<(String, String), f64> = BTreeMap::new();

    for src in graph.node_indices() {
        let total_weight: f64 = graph.edges(src).map(|e| e.weight().weight).sum();
        if total_weight == 0.0 {
            continue;
        }

        let src_rank = ranks.get(&src).copied().unwrap_or(0.0);
        for edge in graph.edges(src) {
            let contribution = src_rank * edge.weight().weight / total_weight;
            let key = (graph[edge.target()].clone(), edge.weight().ident.clone());
            *accumulated.entry(key).or_insert(0.0) += contribution;
        }
    }

    let mut ranked: Vec<((String, String), f64)> = accumulated.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Expand ranked `(file, identifier)` pairs into renderable detail rows,
/// most relevant first. Pairs whose definer is an active file are skipped.
pub fn select_tags(
    ranked_definitions: &[((String, String), f64)],
    definitions: &HashMap<(String, String), std::collections::BTreeSet<TagRow>>,
    chat_rel_fnames: &HashSet<String>,
) -> Vec<TagRow> {
    let mut ranked_tags = Vec::new();

    for ((fname, ident), _rank) in ranked_definitions {
        if chat_rel_fnames.contains(fname) {
            continue;
        }
        if let Some(rows) = definitions.get(&(fname.clone(), ident.clone())) {
            ranked_tags.extend(rows.iter().cloned());
        }
    }

    ranked_tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn edge(ident: &str, weight: f64) -> RefEdge {
        RefEdge {
            ident: ident.into(),
            weight,
        }
    }

    #[test]
    fn test_redistribution_conserves_source_rank() {
        let mut graph = DiGraph::new();
        let main = graph.add_node("main.py".to_string());
        let lib = graph.add_node("lib.py".to_string());
        let util = graph.add_node("util.py".to_string());
        graph.add_edge(main, lib, edge("helper", 3.0));
        graph.add_edge(main, util, edge("format", 1.0));

        let ranks = HashMap::from([(main, 0.6), (lib, 0.25), (util, 0.15)]);
        let ranked = distribute_ranks(&graph, &ranks);

        // Everything main distributes must sum back to its rank
        let distributed: f64 = ranked.iter().map(|(_, r)| r).sum();
        assert!((distributed - 0.6).abs() < 1e-12);

        // Weight 3 vs 1 splits 0.45 / 0.15
        let by_key: HashMap<_, _> = ranked.iter().cloned().collect();
        let helper = by_key[&("lib.py".to_string(), "helper".to_string())];
        let format = by_key[&("util.py".to_string(), "format".to_string())];
        assert!((helper - 0.45).abs() < 1e-12);
        assert!((format - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_same_ident_multiple_definers_split_independently() {
        // main references "helper" defined in both lib and other
        let mut graph = DiGraph::new();
        let main = graph.add_node("main.py".to_string());
        let lib = graph.add_node("lib.py".to_string());
        let other = graph.add_node("other.py".to_string());
        graph.add_edge(main, lib, edge("helper", 2.0));
        graph.add_edge(main, other, edge("helper", 2.0));

        let ranks = HashMap::from([(main, 1.0), (lib, 0.0), (other, 0.0)]);
        let ranked = distribute_ranks(&graph, &ranks);

        // Each definer gets its own half; the entries are never merged
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|(_, r)| (r - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_sink_nodes_contribute_nothing() {
        let mut graph = DiGraph::new();
        let a = graph.add_node("a.py".to_string());
        let b = graph.add_node("b.py".to_string());
        graph.add_edge(a, b, edge("x", 1.0));

        // b is a pure sink with high rank; it must not appear as a source
        let ranks = HashMap::from([(a, 0.3), (b, 0.7)]);
        let ranked = distribute_ranks(&graph, &ranks);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, ("b.py".to_string(), "x".to_string()));
        assert!((ranked[0].1 - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_sort_descending_with_lexicographic_ties() {
        let mut graph = DiGraph::new();
        let src = graph.add_node("src.py".to_string());
        let b = graph.add_node("b.py".to_string());
        let a = graph.add_node("a.py".to_string());
        // Equal weights -> equal ranks -> tie broken by (fname, ident)
        graph.add_edge(src, b, edge("x", 1.0));
        graph.add_edge(src, a, edge("x", 1.0));

        let ranks = HashMap::from([(src, 1.0)]);
        let ranked = distribute_ranks(&graph, &ranks);

        assert_eq!(ranked[0].0 .0, "a.py");
        assert_eq!(ranked[1].0 .0, "b.py");
    }

    #[test]
    fn test_select_tags_skips_active_files() {
        let ranked = vec![
            (("chat.py".to_string(), "helper".to_string()), 0.9),
            (("lib.py".to_string(), "helper".to_string()), 0.5),
        ];

        let mut definitions: HashMap<(String, String), BTreeSet<TagRow>> = HashMap::new();
        definitions.insert(
            ("chat.py".to_string(), "helper".to_string()),
            BTreeSet::from([vec!["chat.py".to_string(), "function".to_string(), "helper".to_string()]]),
        );
        definitions.insert(
            ("lib.py".to_string(), "helper".to_string()),
            BTreeSet::from([vec!["lib.py".to_string(), "function".to_string(), "helper".to_string()]]),
        );

        let chat = HashSet::from(["chat.py".to_string()]);
        let tags = select_tags(&ranked, &definitions, &chat);

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0][0], "lib.py");
    }

    #[test]
    fn test_select_tags_expands_all_matching_rows() {
        // Two declarations of the same name in one file both render
        let ranked = vec![(("lib.py".to_string(), "helper".to_string()), 0.5)];

        let mut definitions: HashMap<(String, String), BTreeSet<TagRow>> = HashMap::new();
        definitions.insert(
            ("lib.py".to_string(), "helper".to_string()),
            BTreeSet::from([
                vec!["lib.py".to_string(), "function".to_string(), "helper ()".to_string()],
                vec!["lib.py".to_string(), "prototype".to_string(), "helper".to_string()],
            ]),
        );

        let tags = select_tags(&ranked, &definitions, &HashSet::new());
        assert_eq!(tags.len(), 2);
    }
}
