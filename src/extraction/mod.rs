//! External collaborators for symbol and identifier extraction.
//!
//! The ranking core never parses language grammars itself. It depends on two
//! narrow capabilities, injected at facade construction so a different
//! tagging backend can be substituted without touching ranking logic:
//!
//! - [`SymbolExtractor`]: declarations in a file (may fail per file)
//! - [`IdentifierScanner`]: the multiset of name-like tokens in a file's
//!   content (never fails upward; unrecognized input yields `[]`)

mod ctags;
mod idents;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;

use crate::types::SymbolRecord;

pub use ctags::CtagsExtractor;
pub use idents::LexicalScanner;

/// Symbol extractor: declarations in a file.
///
/// Errors mean the file is un-taggable (unreadable, unsupported language,
/// tool failure); the graph builder catches them per file so one bad file
/// does not abort the whole map.
pub trait SymbolExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<SymbolRecord>>;
}

/// Lexical identifier scanner: name-like tokens appearing in a file.
///
/// Returns a multiset - duplicates preserved, order irrelevant. Repetition
/// is the weight signal for reference edges. Unrecognized files yield `[]`.
pub trait IdentifierScanner {
    fn scan(&self, path: &Path, content: &str) -> Vec<String>;
}

/// Probe whether an extractor works at all by tagging a harmless Python
/// sample in a temp directory. Run once at facade construction; a failure
/// downgrades the whole session to the unranked fallback.
///
/// Each probe writes its own sample file, so facades constructed
/// concurrently in one process never race on it.
pub fn probe_extractor(extractor: &dyn SymbolExtractor) -> bool {
    static PROBE_SEQ: AtomicUsize = AtomicUsize::new(0);

    let sample = std::env::temp_dir().join(format!(
        "repomap-probe-{}-{}.py",
        std::process::id(),
        PROBE_SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    if std::fs::write(&sample, "def hello():\n    print('Hello, world!')\n").is_err() {
        return false;
    }

    let result = extractor.extract(&sample);
    std::fs::remove_file(&sample).ok();
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Extractor that only succeeds when the sample file it is handed
    /// actually exists with the expected content.
    struct ReadingExtractor;

    impl SymbolExtractor for ReadingExtractor {
        fn extract(&self, path: &Path) -> Result<Vec<SymbolRecord>> {
            let content = std::fs::read_to_string(path)?;
            anyhow::ensure!(content.contains("def hello"), "unexpected sample content");
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_probe_succeeds_for_working_extractor() {
        assert!(probe_extractor(&ReadingExtractor));
    }

    #[test]
    fn test_concurrent_probes_do_not_interfere() {
        let extractor = Arc::new(ReadingExtractor);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let extractor = extractor.clone();
                thread::spawn(move || probe_extractor(extractor.as_ref()))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
