//! repomap CLI - standalone debug invocation.
//!
//! Takes directory (or file) paths, discovers source files, and prints the
//! computed map to stdout. All discovered files are treated as "other"
//! files; pass --chat to mark some as active so ranking concentrates
//! around them.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use repomap::discovery::find_source_files;
use repomap::{MapConfig, RepoMap};

/// Print a token-budgeted, relevance-ranked map of a source tree.
#[derive(Parser, Debug)]
#[command(name = "repomap")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Directories or files to map
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,

    /// Files to treat as active (ranking focuses around them and they
    /// are excluded from the output)
    #[arg(long, value_name = "FILES")]
    chat: Vec<PathBuf>,

    /// Token budget for the rendered map
    #[arg(short = 't', long, value_name = "TOKENS")]
    map_tokens: Option<usize>,

    /// Project root for display-relative paths and the cache directory.
    /// Defaults to the first path argument (or its parent for a file).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Report progress and measured map sizes on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => {
            let first = &cli.paths[0];
            if first.is_dir() {
                first.clone()
            } else {
                first.parent().unwrap_or(first).to_path_buf()
            }
        }
    };

    let mut config = MapConfig::load(&root);
    if let Some(tokens) = cli.map_tokens {
        config.map_tokens = tokens;
    }
    config.verbose = cli.verbose;

    let mut other_files = Vec::new();
    for path in &cli.paths {
        other_files.extend(find_source_files(path)?);
    }
    // Active files rank; they don't get listed
    other_files.retain(|f| !cli.chat.contains(f));

    if cli.verbose {
        eprintln!("root: {}", root.display());
        eprintln!("files: {} other, {} active", other_files.len(), cli.chat.len());
        eprintln!("budget: {} tokens", config.map_tokens);
    }

    let map = RepoMap::new(&root, config)?;
    match map.get_repo_map(&cli.chat, &other_files) {
        Some(text) => println!("{text}"),
        None => eprintln!("no map fits the token budget"),
    }

    Ok(())
}
