//! Reference graph construction.
//!
//! Builds a directed multigraph between files from two indices:
//! - definitions: identifier -> files that declare it (via the symbol cache)
//! - references: identifier -> one entry per occurrence in a file's
//!   identifier multiset (via the identifier cache)
//!
//! Only identifiers that are both defined and referenced somewhere in the
//! file set produce edges. For each such identifier, every
//! `(referencer, definer)` pair with `referencer != definer` gets its own
//! edge weighted by the referencer's occurrence count - parallel edges for
//! different identifiers are kept separate so rank distribution can
//! attribute mass per identifier.
//!
//! Files are visited in sorted order and definer sets are kept sorted, so
//! graph construction is deterministic for a given file set.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};

use crate::cache::{IdentCache, SymbolCache};
use crate::types::TagRow;

/// One reference edge: `referencer -> definer` for a single identifier.
/// Weight = number of times the identifier occurs in the referencer.
#[derive(Debug, Clone)]
pub struct RefEdge {
    pub ident: String,
    pub weight: f64,
}

/// The constructed graph plus everything downstream stages need.
pub struct RefGraph {
    /// Nodes are relative file paths; parallel edges allowed.
    pub graph: DiGraph<String, RefEdge>,
    /// `(rel_fname, identifier)` -> detail rows for each matching
    /// declaration, in sorted order.
    pub definitions: HashMap<(String, String), BTreeSet<TagRow>>,
    /// Relative paths of the active (chat) files.
    pub chat_rel_fnames: HashSet<String>,
    /// Teleport mass per node: 1.0 for each active file present in the
    /// graph. Empty when no active file participates in any edge.
    pub personalization: HashMap<NodeIndex, f64>,
}

/// Relativize a path against the map root for display. Paths outside the
/// root keep their full form.
pub fn rel_fname(root: &Path, fname: &Path) -> String {
    fname
        .strip_prefix(root)
        .unwrap_or(fname)
        .to_string_lossy()
        .into_owned()
}

/// Build the reference graph over the union of active and other files.
///
/// A file whose symbol extraction fails contributes no definitions but is
/// still scanned for identifiers, so it can still act as a referencer.
pub fn build_ref_graph(
    root: &Path,
    chat_fnames: &[PathBuf],
    other_fnames: &[PathBuf],
    symbols: &SymbolCache,
    idents: &IdentCache,
) -> RefGraph {
    let chat_set: HashSet<&Path> = chat_fnames.iter().map(PathBuf::as_path).collect();
    let fnames: BTreeSet<&Path> = chat_fnames
        .iter()
        .chain(other_fnames.iter())
        .map(PathBuf::as_path)
        .collect();

    let mut defines: HashMap<String, BTreeSet<String>> = HashMap::new();
    let mut references: HashMap<String, Vec<String>> = HashMap::new();
    let mut definitions: HashMap<(String, String), BTreeSet<TagRow>> = HashMap::new();
    let mut chat_rel_fnames: HashSet<String> = HashSet::new();

    for fname in fnames {
        let rel = rel_fname(root, fname);

        if chat_set.contains(fname) {
            chat_rel_fnames.insert(rel.clone());
        }

        // One bad file must not abort the whole map
        if let Ok(records) = symbols.get(fname) {
            for record in records {
                defines
                    .entry(record.name.clone())
                    .or_default()
                    .insert(rel.clone());
                definitions
                    .entry((rel.clone(), record.name.clone()))
                    .or_default()
                    .insert(record.detail_row(&rel));
            }
        }

        for ident in idents.get(fname) {
            references.entry(ident).or_default().push(rel.clone());
        }
    }

    // Only identifiers both defined and referenced in the file set matter;
    // sorted for deterministic edge insertion order
    let mut candidate_idents: Vec<&String> = defines
        .keys()
        .filter(|ident| references.contains_key(*ident))
        .collect();
    candidate_idents.sort();

    let mut graph: DiGraph<String, RefEdge> = DiGraph::new();
    let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

    let mut node_for = |graph: &mut DiGraph<String, RefEdge>, rel: &str| -> NodeIndex {
        *node_map
            .entry(rel.to_string())
            .or_insert_with(|| graph.add_node(rel.to_string()))
    };

    for ident in candidate_idents {
        let definers = &defines[ident];

        // Occurrence count per referencing file is the weight signal
        let mut counts: BTreeMap<&String, f64> = BTreeMap::new();
        for referencer in &references[ident] {
            *counts.entry(referencer).or_insert(0.0) += 1.0;
        }

        for (referencer, num_refs) in counts {
            for definer in definers {
                if referencer == definer {
                    continue;
                }
                let src = node_for(&mut graph, referencer);
                let dst = node_for(&mut graph, definer);
                graph.add_edge(
                    src,
                    dst,
                    RefEdge {
                        ident: ident.clone(),
                        weight: num_refs,
                    },
                );
            }
        }
    }

    // Active files act as teleport targets only if they made it into the
    // graph; entries for absent nodes would leak rank mass
    let personalization: HashMap<NodeIndex, f64> = chat_rel_fnames
        .iter()
        .filter_map(|rel| node_map.get(rel).map(|&idx| (idx, 1.0)))
        .collect();

    RefGraph {
        graph,
        definitions,
        chat_rel_fnames,
        personalization,
    }
}
