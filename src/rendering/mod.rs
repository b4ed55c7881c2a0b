//! Output rendering - from tag rows to the indented map text.

mod tree;

pub use tree::{fname_to_components, to_tree};
