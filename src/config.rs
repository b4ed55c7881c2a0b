//! Map configuration with optional repomap.toml loading.
//!
//! All tunables live in [`MapConfig`] with sane defaults; a `repomap.toml`
//! at the project root can override the token budget:
//!
//! ```toml
//! map-tokens = 2048
//! ```

use std::path::Path;

use serde::Deserialize;

/// Default token budget for the rendered map.
pub const DEFAULT_MAP_TOKENS: usize = 1024;

/// Configuration for map construction and ranking.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Token budget the rendered map must stay under. A budget of 0
    /// disables the map entirely.
    pub map_tokens: usize,
    /// PageRank damping factor.
    pub damping: f64,
    /// Convergence tolerance for the power iteration, scaled by node count.
    pub tolerance: f64,
    /// Upper bound on power iterations before giving up on convergence.
    pub max_iterations: usize,
    /// Report measured map sizes on stderr.
    pub verbose: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            map_tokens: DEFAULT_MAP_TOKENS,
            damping: 0.85,
            tolerance: 1.0e-6,
            max_iterations: 100,
            verbose: false,
        }
    }
}

/// Raw config as deserialized from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    map_tokens: Option<usize>,
}

impl MapConfig {
    /// Load configuration from `repomap.toml` in the given directory,
    /// falling back to defaults when the file is missing or malformed.
    pub fn load(directory: &Path) -> Self {
        let path = directory.join("repomap.toml");
        let raw = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| toml::from_str::<RawConfig>(&content).ok())
            .unwrap_or_default();

        let mut config = Self::default();
        if let Some(tokens) = raw.map_tokens {
            config.map_tokens = tokens;
        }
        config
    }

    /// Override the token budget, builder-style.
    pub fn with_map_tokens(mut self, tokens: usize) -> Self {
        self.map_tokens = tokens;
        self
    }
}
