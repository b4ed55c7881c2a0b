//! Symbol extraction via universal-ctags.
//!
//! Invokes `ctags --output-format=json` as a subprocess, one file at a time,
//! and parses the JSON-lines output into [`SymbolRecord`]s. The `+S` field
//! flag requests signatures; `--extras=-F` suppresses file-scope extras.
//!
//! Availability is probed once per process by tagging a harmless sample
//! file in a temp directory; callers cache the boolean and fall back to the
//! unranked listing when the tool is missing.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::SymbolExtractor;
use crate::types::SymbolRecord;

/// Base ctags invocation; the file path is appended per call.
const CTAGS_ARGS: &[&str] = &["--fields=+S", "--extras=-F", "--output-format=json"];

/// One JSON line of ctags output. Lines carry a `_type` discriminator;
/// only `"tag"` entries are symbol declarations (the rest are pseudo-tags).
#[derive(Debug, Deserialize)]
struct CtagsEntry {
    #[serde(rename = "_type")]
    entry_type: String,
    name: String,
    // Pseudo-tag lines omit these fields, so they must default
    #[serde(default)]
    kind: String,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    signature: Option<String>,
}

/// Subprocess-based extractor using universal-ctags.
pub struct CtagsExtractor {
    command: String,
}

impl CtagsExtractor {
    pub fn new() -> Self {
        Self {
            command: "ctags".to_string(),
        }
    }

    /// Use a non-default ctags binary (tests, unusual installs).
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for CtagsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolExtractor for CtagsExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<SymbolRecord>> {
        let output = Command::new(&self.command)
            .args(CTAGS_ARGS)
            .arg(path)
            .output()
            .with_context(|| format!("failed to run {} on {}", self.command, path.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} exited with {} for {}",
                self.command,
                output.status,
                path.display()
            );
        }

        let stdout = String::from_utf8(output.stdout).context("ctags output was not UTF-8")?;

        let mut records = Vec::new();
        for line in stdout.lines() {
            if line.is_empty() {
                continue;
            }
            let entry: CtagsEntry = serde_json::from_str(line)
                .with_context(|| format!("unparseable ctags line: {line}"))?;

            if entry.entry_type != "tag" {
                continue;
            }

            records.push(SymbolRecord {
                name: entry.name,
                kind: entry.kind,
                scope: entry.scope,
                signature: entry.signature,
            });
        }

        Ok(records)
    }
}
