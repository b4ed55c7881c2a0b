//! Memoizing wrappers around the extraction collaborators.
//!
//! Each wrapper pairs one collaborator with one mtime-keyed store, so a
//! warm run never re-invokes the collaborator for unmodified files. Two
//! independent instances exist per map: one for extracted symbols, one for
//! scanned identifiers.
//!
//! Failure semantics differ by path:
//! - Symbol extraction errors propagate per file (the graph builder catches
//!   them so the file just contributes no definitions).
//! - Identifier scanning never errors upward - unreadable or unrecognized
//!   files degrade to an empty multiset.

mod store;

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

use crate::extraction::{IdentifierScanner, SymbolExtractor};
use crate::types::SymbolRecord;

pub use store::{KeyValueStore, MemoryStore, RedbStore};

fn file_mtime(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("failed to stat {}", path.display()))
}

/// Store key for a file: the canonical absolute path, so relative and
/// absolute spellings of the same file share one persistent entry.
fn store_key(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

/// Mtime-keyed cache over a [`SymbolExtractor`].
pub struct SymbolCache {
    extractor: Box<dyn SymbolExtractor>,
    store: Box<dyn KeyValueStore<Vec<SymbolRecord>>>,
}

impl SymbolCache {
    pub fn new(
        extractor: Box<dyn SymbolExtractor>,
        store: Box<dyn KeyValueStore<Vec<SymbolRecord>>>,
    ) -> Self {
        Self { extractor, store }
    }

    /// Symbol records for a file, from cache when the mtime matches.
    pub fn get(&self, path: &Path) -> Result<Vec<SymbolRecord>> {
        let mtime = file_mtime(path)?;
        let key = store_key(path);

        if let Some(records) = self.store.get(&key, mtime) {
            return Ok(records);
        }

        let records = self.extractor.extract(path)?;
        // A failed cache write only costs a re-extraction next run
        let _ = self.store.set(&key, mtime, &records);
        Ok(records)
    }
}

/// Mtime-keyed cache over an [`IdentifierScanner`].
pub struct IdentCache {
    scanner: Box<dyn IdentifierScanner>,
    store: Box<dyn KeyValueStore<Vec<String>>>,
}

impl IdentCache {
    pub fn new(
        scanner: Box<dyn IdentifierScanner>,
        store: Box<dyn KeyValueStore<Vec<String>>>,
    ) -> Self {
        Self { scanner, store }
    }

    /// Identifier multiset for a file, from cache when the mtime matches.
    /// Unreadable or undecodable files yield an empty multiset.
    pub fn get(&self, path: &Path) -> Vec<String> {
        let Ok(mtime) = file_mtime(path) else {
            return Vec::new();
        };
        let key = store_key(path);

        if let Some(idents) = self.store.get(&key, mtime) {
            return idents;
        }

        let idents = match fs::read_to_string(path) {
            Ok(content) => self.scanner.scan(path, &content),
            // Binary or undecodable content degrades to no references
            Err(_) => Vec::new(),
        };

        let _ = self.store.set(&key, mtime, &idents);
        idents
    }
}
