//! Ranking pipeline - from cached symbols to an ordered tag list.
//!
//! Stages:
//! 1. [`build_ref_graph`]: weighted multi-edge reference graph between files
//! 2. [`personalized_rank`]: damped random-walk importance over the graph
//! 3. [`distribute_ranks`]: per-node rank split across outgoing edges,
//!    accumulated per `(definer_file, identifier)` pair
//! 4. [`select_tags`]: descending-rank expansion into renderable detail rows

mod graph;
mod pagerank;
mod tags;

pub use graph::{build_ref_graph, rel_fname, RefEdge, RefGraph};
pub use pagerank::personalized_rank;
pub use tags::{distribute_ranks, select_tags};
