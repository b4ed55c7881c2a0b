//! repomap - token-budgeted, relevance-ranked maps of a source tree.
//!
//! Given a set of "active" files (already visible to the caller) and a set
//! of "other" files, repomap selects which declarations to show and in what
//! depth so the rendered map fits a token budget, prioritizing symbols most
//! relevant to the active files.
//!
//! # Pipeline
//!
//! ```text
//! files → symbol/ident caches → reference graph → personalized PageRank
//!       → rank redistribution → ranked tags → budget fit → tree text
//! ```
//!
//! The extraction collaborators are narrow, injectable traits: a ctags
//! subprocess provides symbols by default, a regex scanner provides
//! identifier multisets, and a character-based estimator stands in for the
//! consumer's tokenizer. Both extraction paths are memoized in mtime-keyed
//! caches that persist across runs.

pub mod cache;
pub mod config;
pub mod discovery;
pub mod extraction;
pub mod map;
pub mod ranking;
pub mod rendering;
pub mod types;

pub use config::MapConfig;
pub use map::RepoMap;
pub use types::{CharEstimator, SymbolRecord, TagRow, TokenCounter};
