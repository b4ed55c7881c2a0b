//! Core types for repomap.
//!
//! The fundamental unit is the [`SymbolRecord`]: one declaration reported by
//! the symbol extractor for a file. Records are serializable so they can be
//! cached across runs, keyed by path and mtime.
//!
//! Rendering works on [`TagRow`]s - flat sequences of string components that
//! the tree renderer deduplicates by shared prefix. A ranked row looks like
//! `[rel_fname, scope?, kind, name signature?]`; a fallback row is just the
//! path split into components.

use serde::{Deserialize, Serialize};

/// One symbol declaration in a file, as reported by the extractor.
///
/// Multiple records may share a name (overloads, re-declarations); each gets
/// its own detail row in the rendered map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Symbol name (function, class, variable name)
    pub name: String,
    /// Declaration kind: "function", "class", "member", etc.
    pub kind: String,
    /// Enclosing scope's name, if the symbol is nested
    pub scope: Option<String>,
    /// Signature text, if the extractor reports one
    pub signature: Option<String>,
}

impl SymbolRecord {
    /// Build the detail row rendered for this record:
    /// `[rel_fname, scope?, kind, name (+ " " + signature)]`.
    pub fn detail_row(&self, rel_fname: &str) -> TagRow {
        let mut last = self.name.clone();
        if let Some(sig) = &self.signature {
            last.push(' ');
            last.push_str(sig);
        }

        let mut row = vec![rel_fname.to_string()];
        if let Some(scope) = &self.scope {
            row.push(scope.clone());
        }
        row.push(self.kind.clone());
        row.push(last);
        row
    }
}

/// One row of the rendered tree: an ordered sequence of string components,
/// outermost first. The tree renderer sorts rows and emits only the suffix
/// past the prefix shared with the previous row.
pub type TagRow = Vec<String>;

/// Token-count estimator for the downstream consumer's budget unit.
///
/// Treated as an opaque, deterministic, monotone-ish function of the text.
/// Swap in a real tokenizer when the consumer's exact encoding matters.
pub trait TokenCounter {
    fn count(&self, text: &str) -> usize;
}

/// Character-based token estimator (1 token ~ 4 chars, rounded up).
/// Fast and model-agnostic; coarse but monotone in text length.
pub struct CharEstimator;

impl TokenCounter for CharEstimator {
    fn count(&self, text: &str) -> usize {
        (text.len() + 3) / 4
    }
}
