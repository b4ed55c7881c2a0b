//! Source file discovery for the debug CLI.
//!
//! Walks directories with the `ignore` crate, so .gitignore rules apply
//! automatically, and filters out extensions that never contribute symbols
//! (binaries, images, archives, lock files). Results are sorted: the same
//! directory must yield the same file order across runs, or cache keys and
//! rendered output would wobble.

use std::path::{Path, PathBuf};

use anyhow::Result;
use ignore::WalkBuilder;

/// Extensions excluded from discovery: binary or generated files that
/// would only add noise to the symbol graph.
const EXCLUDED_EXTENSIONS: &[&str] = &[
    // Images and media
    "png", "jpg", "jpeg", "gif", "ico", "svg", "webp", "mp3", "mp4", "wav",
    // Archives
    "zip", "tar", "gz", "rar", "7z", "bz2", "xz",
    // Compiled and binary
    "pyc", "pyo", "so", "dylib", "dll", "exe", "o", "a", "class", "jar", "wasm", "bin",
    // Generated lock files
    "lock", "sum",
    // Databases
    "db", "sqlite", "sqlite3", "redb",
];

/// Find source files under a path, respecting .gitignore.
///
/// A file argument passes through unchanged; a directory is walked
/// recursively. Returns sorted absolute-ish paths (as given).
pub fn find_source_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("path does not exist: {}", path.display());
    }

    let walker = WalkBuilder::new(path)
        .hidden(true)
        .git_ignore(true)
        .require_git(false)
        .follow_links(false)
        .build();

    let mut files = Vec::new();
    for entry in walker.flatten() {
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }
        if is_excluded_by_extension(entry_path) {
            continue;
        }
        files.push(entry_path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn is_excluded_by_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| EXCLUDED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
