//! Lexical identifier scanning.
//!
//! Produces the multiset of name-like tokens in a file: every occurrence of
//! an identifier, duplicates preserved. The graph builder joins these
//! against symbol definitions, so keywords and other noise tokens are cheap
//! to leave in - they only matter if some file defines a symbol with the
//! same name. Per-language keyword sets are stripped anyway to keep the
//! reference index from carrying obvious non-names.
//!
//! Language recognition is by extension; unknown extensions yield `[]`.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::IdentifierScanner;

/// Name-like token: letter or underscore, then word characters.
static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier regex is valid"));

/// Languages the scanner recognizes, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    Python,
    Rust,
    JavaScript,
    Go,
    Ruby,
    C,
    Java,
    Unknown,
}

fn detect_language(path: &Path) -> Language {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "py" | "pyi" => Language::Python,
        "rs" => Language::Rust,
        "js" | "jsx" | "ts" | "tsx" | "mjs" => Language::JavaScript,
        "go" => Language::Go,
        "rb" => Language::Ruby,
        "c" | "h" | "cc" | "cpp" | "hpp" | "cxx" => Language::C,
        "java" => Language::Java,
        _ => Language::Unknown,
    }
}

/// Keywords per language, dropped from the scan result.
fn keywords(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Python => &[
            "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
            "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
            "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise",
            "return", "try", "while", "with", "yield",
        ],
        Language::Rust => &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
            "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
            "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
            "trait", "true", "type", "unsafe", "use", "where", "while",
        ],
        Language::JavaScript => &[
            "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
            "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
            "function", "if", "import", "in", "instanceof", "let", "new", "null", "of", "return",
            "static", "super", "switch", "this", "throw", "true", "try", "typeof", "undefined",
            "var", "void", "while", "with", "yield",
        ],
        Language::Go => &[
            "break", "case", "chan", "const", "continue", "default", "defer", "else",
            "fallthrough", "for", "func", "go", "goto", "if", "import", "interface", "map",
            "package", "range", "return", "select", "struct", "switch", "type", "var",
        ],
        Language::Ruby => &[
            "alias", "and", "begin", "break", "case", "class", "def", "do", "else", "elsif",
            "end", "ensure", "false", "for", "if", "in", "module", "next", "nil", "not", "or",
            "redo", "rescue", "retry", "return", "self", "then", "true", "unless", "until",
            "when", "while", "yield",
        ],
        Language::C => &[
            "auto", "break", "case", "char", "const", "continue", "default", "do", "double",
            "else", "enum", "extern", "float", "for", "goto", "if", "int", "long", "register",
            "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
            "union", "unsigned", "void", "volatile", "while",
        ],
        Language::Java => &[
            "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
            "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
            "float", "for", "if", "implements", "import", "instanceof", "int", "interface",
            "long", "native", "new", "null", "package", "private", "protected", "public",
            "return", "short", "static", "super", "switch", "this", "throw", "throws", "true",
            "false", "try", "void", "volatile", "while",
        ],
        Language::Unknown => &[],
    }
}

/// Regex-based scanner approximating a real lexer's name-token stream.
pub struct LexicalScanner;

impl LexicalScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexicalScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierScanner for LexicalScanner {
    fn scan(&self, path: &Path, content: &str) -> Vec<String> {
        let lang = detect_language(path);
        if lang == Language::Unknown {
            return Vec::new();
        }

        let kw = keywords(lang);
        IDENT_RE
            .find_iter(content)
            .map(|m| m.as_str())
            .filter(|token| !kw.contains(token))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_preserves_duplicates() {
        let scanner = LexicalScanner::new();
        let idents = scanner.scan(
            Path::new("main.py"),
            "helper()\nhelper()\nhelper()\nutil()\n",
        );

        let helper_count = idents.iter().filter(|i| *i == "helper").count();
        let util_count = idents.iter().filter(|i| *i == "util").count();
        assert_eq!(helper_count, 3);
        assert_eq!(util_count, 1);
    }

    #[test]
    fn test_scan_strips_keywords() {
        let scanner = LexicalScanner::new();
        let idents = scanner.scan(Path::new("lib.py"), "def helper():\n    return value\n");

        assert!(!idents.contains(&"def".to_string()));
        assert!(!idents.contains(&"return".to_string()));
        assert!(idents.contains(&"helper".to_string()));
        assert!(idents.contains(&"value".to_string()));
    }

    #[test]
    fn test_unknown_extension_yields_empty() {
        let scanner = LexicalScanner::new();
        assert!(scanner.scan(Path::new("data.bin"), "helper helper").is_empty());
        assert!(scanner.scan(Path::new("no_extension"), "helper").is_empty());
    }

    #[test]
    fn test_scan_is_case_sensitive() {
        let scanner = LexicalScanner::new();
        let idents = scanner.scan(Path::new("x.rs"), "Foo foo FOO");
        assert!(idents.contains(&"Foo".to_string()));
        assert!(idents.contains(&"foo".to_string()));
        assert!(idents.contains(&"FOO".to_string()));
    }
}
