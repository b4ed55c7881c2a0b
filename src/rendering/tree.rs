//! Deduplicated-prefix tree rendering.
//!
//! Takes rows of string components, sorts them, and emits each row's
//! components one per line - but only the suffix past the prefix shared
//! with the previous row, indented one tab per component already emitted.
//! Shared leading components (directories, file names, scopes) therefore
//! appear exactly once:
//!
//! ```text
//! a/
//! 	b.py:
//! 	c.py:
//! ```

use crate::types::TagRow;

/// Render rows as an indented, shared-prefix-deduplicated tree.
///
/// Rows are sorted lexicographically first, so callers can pass any prefix
/// of a ranked list without pre-sorting. Empty input renders as `""`.
pub fn to_tree(rows: &[TagRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut rows: Vec<&TagRow> = rows.iter().collect();
    rows.sort();

    let mut output = String::new();
    let mut last: &[String] = &[];

    for row in rows {
        let num_common = row
            .iter()
            .zip(last.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut indent = "\t".repeat(num_common);
        for item in &row[num_common..] {
            output.push_str(&indent);
            output.push_str(item);
            output.push('\n');
            indent.push('\t');
        }
        last = row;
    }

    output
}

/// Split a relative path into tree components: directories keep a trailing
/// separator; `with_colon` appends `:` to the basename (used when symbol
/// detail lines follow underneath it).
pub fn fname_to_components(fname: &str, with_colon: bool) -> TagRow {
    let mut components: Vec<&str> = fname.split('/').collect();
    let basename = components.pop().unwrap_or("");

    let mut row: TagRow = components.iter().map(|c| format!("{c}/")).collect();
    if with_colon {
        row.push(format!("{basename}:"));
    } else {
        row.push(basename.to_string());
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(items: &[&str]) -> TagRow {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_input_renders_empty() {
        assert_eq!(to_tree(&[]), "");
    }

    #[test]
    fn test_shared_prefix_emitted_once() {
        let rows = vec![row(&["a/", "b.py:"]), row(&["a/", "c.py:"])];
        assert_eq!(to_tree(&rows), "a/\n\tb.py:\n\tc.py:\n");
    }

    #[test]
    fn test_single_row() {
        let rows = vec![row(&["src/", "main.py:", "function", "main"])];
        assert_eq!(to_tree(&rows), "src/\n\tmain.py:\n\t\tfunction\n\t\t\tmain\n");
    }

    #[test]
    fn test_rows_are_sorted_before_rendering() {
        let rows = vec![row(&["b.py"]), row(&["a.py"])];
        assert_eq!(to_tree(&rows), "a.py\nb.py\n");
    }

    #[test]
    fn test_detail_rows_group_under_file() {
        let rows = vec![
            row(&["lib.py", "function", "util"]),
            row(&["lib.py", "function", "helper"]),
            row(&["other.py", "function", "helper"]),
        ];
        let expected = "lib.py\n\tfunction\n\t\thelper\n\t\tutil\nother.py\n\tfunction\n\t\thelper\n";
        assert_eq!(to_tree(&rows), expected);
    }

    #[test]
    fn test_prefix_growth_is_monotone_in_row_count() {
        // More rows can only add text - the budget fitter's binary search
        // depends on this
        let rows = vec![
            row(&["a/", "x.py:"]),
            row(&["a/", "y.py:"]),
            row(&["b/", "z.py:"]),
        ];
        let mut prev_len = 0;
        for k in 0..=rows.len() {
            let rendered = to_tree(&rows[..k]);
            assert!(rendered.len() >= prev_len);
            prev_len = rendered.len();
        }
    }

    #[test]
    fn test_fname_to_components() {
        assert_eq!(
            fname_to_components("src/core/map.py", false),
            row(&["src/", "core/", "map.py"])
        );
        assert_eq!(
            fname_to_components("src/map.py", true),
            row(&["src/", "map.py:"])
        );
        assert_eq!(fname_to_components("map.py", false), row(&["map.py"]));
    }
}
