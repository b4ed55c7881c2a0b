//! The RepoMap facade.
//!
//! Orchestrates the full pipeline: cached symbol/identifier extraction,
//! reference graph construction, personalized PageRank, rank
//! redistribution, and a binary search for the longest ranked prefix whose
//! rendered tree stays under the token budget.
//!
//! When the symbol extractor is unavailable (probed once at construction),
//! the map degrades to a flat file listing gated by the same budget - no
//! truncation is attempted there, since an unranked listing has no
//! relevance order to truncate by.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cache::{IdentCache, MemoryStore, RedbStore, SymbolCache};
use crate::config::MapConfig;
use crate::extraction::{probe_extractor, CtagsExtractor, IdentifierScanner, LexicalScanner, SymbolExtractor};
use crate::ranking::{build_ref_graph, distribute_ranks, personalized_rank, select_tags};
use crate::rendering::{fname_to_components, to_tree};
use crate::types::{CharEstimator, TagRow, TokenCounter};

/// Token-budgeted, relevance-ranked map of a source tree's symbols.
///
/// Two independent mtime-keyed caches (symbols, identifiers) persist across
/// invocations; everything else is rebuilt per call.
pub struct RepoMap {
    root: PathBuf,
    config: MapConfig,
    token_counter: Box<dyn TokenCounter>,
    symbols: SymbolCache,
    idents: IdentCache,
    has_extractor: bool,
}

impl RepoMap {
    /// Build a map with the default collaborators: universal-ctags
    /// extraction, regex identifier scanning, character-based token
    /// estimation, and persistent caches under `<root>/.repomap.cache/`.
    pub fn new(root: impl Into<PathBuf>, config: MapConfig) -> Result<Self> {
        let root = root.into();

        let tag_store = RedbStore::open(&root, "tags")?;
        let ident_store = RedbStore::open(&root, "idents")?;

        Ok(Self::assemble(
            root,
            config,
            Box::new(CtagsExtractor::new()),
            Box::new(LexicalScanner::new()),
            Box::new(CharEstimator),
            Box::new(tag_store),
            Box::new(ident_store),
        ))
    }

    /// Build a map with injected collaborators and in-memory caches.
    /// This is the seam for substituting a different tagging backend,
    /// tokenizer, or scanner without touching ranking logic.
    pub fn with_collaborators(
        root: impl Into<PathBuf>,
        config: MapConfig,
        extractor: Box<dyn SymbolExtractor>,
        scanner: Box<dyn IdentifierScanner>,
        token_counter: Box<dyn TokenCounter>,
    ) -> Self {
        Self::assemble(
            root.into(),
            config,
            extractor,
            scanner,
            token_counter,
            Box::new(MemoryStore::new()),
            Box::new(MemoryStore::new()),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        root: PathBuf,
        config: MapConfig,
        extractor: Box<dyn SymbolExtractor>,
        scanner: Box<dyn IdentifierScanner>,
        token_counter: Box<dyn TokenCounter>,
        tag_store: Box<dyn crate::cache::KeyValueStore<Vec<crate::types::SymbolRecord>>>,
        ident_store: Box<dyn crate::cache::KeyValueStore<Vec<String>>>,
    ) -> Self {
        // Probe once per facade; a disabled budget skips the probe since
        // the ranked path can never run
        let has_extractor = config.map_tokens > 0 && probe_extractor(extractor.as_ref());

        Self {
            root,
            config,
            token_counter,
            symbols: SymbolCache::new(extractor, tag_store),
            idents: IdentCache::new(scanner, ident_store),
            has_extractor,
        }
    }

    /// The sole operation callers need: a rendered map of `other_files`
    /// ranked from the perspective of `chat_files`, or `None` when no
    /// useful map fits the budget.
    pub fn get_repo_map(&self, chat_files: &[PathBuf], other_files: &[PathBuf]) -> Option<String> {
        let (listing, note) = self.choose_files_listing(chat_files, other_files)?;

        let other = if chat_files.is_empty() { "" } else { "other " };
        Some(format!(
            "Here is a map of {other}files in the repository{note}:\n\n{listing}"
        ))
    }

    fn choose_files_listing(
        &self,
        chat_files: &[PathBuf],
        other_files: &[PathBuf],
    ) -> Option<(String, &'static str)> {
        if self.config.map_tokens == 0 || other_files.is_empty() {
            return None;
        }

        if self.has_extractor {
            let listing = self.get_ranked_tags_map(chat_files, other_files)?;
            if listing.is_empty() {
                return None;
            }
            self.report_size("ranked map", &listing);
            return Some((listing, " with selected symbol details"));
        }

        // No extractor: flat listing, all or nothing under the budget
        let listing = self.get_simple_files_map(other_files);
        self.report_size("simple map", &listing);
        if self.token_counter.count(&listing) < self.config.map_tokens {
            Some((listing, ""))
        } else {
            None
        }
    }

    /// Flat tree of file paths, no ranking.
    fn get_simple_files_map(&self, other_files: &[PathBuf]) -> String {
        let rows: Vec<TagRow> = other_files
            .iter()
            .map(|fname| fname_to_components(&self.rel_fname(fname), false))
            .collect();
        to_tree(&rows)
    }

    /// Run the ranking pipeline and return detail rows, most relevant
    /// first. Empty when the graph is degenerate (no files, no shared
    /// identifiers).
    pub fn get_ranked_tags(&self, chat_files: &[PathBuf], other_files: &[PathBuf]) -> Vec<TagRow> {
        let rg = build_ref_graph(&self.root, chat_files, other_files, &self.symbols, &self.idents);

        let ranks = personalized_rank(
            &rg.graph,
            &rg.personalization,
            self.config.damping,
            self.config.tolerance,
            self.config.max_iterations,
        );

        let ranked_definitions = distribute_ranks(&rg.graph, &ranks);
        select_tags(&ranked_definitions, &rg.definitions, &rg.chat_rel_fnames)
    }

    /// Binary-search the longest ranked prefix whose rendered tree costs
    /// strictly less than the budget. Each probe re-renders from scratch;
    /// `to_tree` sorts internally, so cost is non-decreasing in prefix
    /// length and the search finds the true maximum.
    fn get_ranked_tags_map(&self, chat_files: &[PathBuf], other_files: &[PathBuf]) -> Option<String> {
        let ranked_tags = self.get_ranked_tags(chat_files, other_files);

        let mut lower: i64 = 0;
        let mut upper: i64 = ranked_tags.len() as i64;
        let mut best_tree: Option<String> = None;

        while lower <= upper {
            let middle = (lower + upper) / 2;
            let tree = to_tree(&ranked_tags[..middle as usize]);

            if self.token_counter.count(&tree) < self.config.map_tokens {
                best_tree = Some(tree);
                lower = middle + 1;
            } else {
                upper = middle - 1;
            }
        }

        best_tree
    }

    fn rel_fname(&self, fname: &Path) -> String {
        crate::ranking::rel_fname(&self.root, fname)
    }

    fn report_size(&self, label: &str, listing: &str) {
        if self.config.verbose {
            let tokens = self.token_counter.count(listing);
            eprintln!("{label}: {:.1} k-tokens", tokens as f64 / 1024.0);
        }
    }
}
