//! Static keyword table mapping a language identifier to its highlight set.
//!
//! Lookup is total: unknown language identifiers fall back to
//! [`DEFAULT_KEYWORDS`], never an error. The table is read-only for the
//! lifetime of the process; per-document selection happens in the refresh
//! engine when `language_specific` is enabled.

/// Fallback keyword list, also the default for user-configured matching.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "function", "const", "let", "var", "return", "if", "else", "for", "while", "class",
];

/// Keywords for `language_id`, or the default list if the language is unknown.
pub fn lookup(language_id: &str) -> &'static [&'static str] {
    match language_id {
        "rust" => &["fn", "struct", "enum", "impl", "trait", "use", "return", "pub"],
        "javascript" | "javascriptreact" => &[
            "function", "const", "let", "var", "return", "if", "else", "class", "async", "await",
        ],
        "typescript" | "typescriptreact" => &[
            "function", "const", "let", "interface", "type", "return", "class", "async", "await",
            "export",
        ],
        "python" => &[
            "def", "class", "import", "from", "return", "if", "else", "for", "while", "lambda",
        ],
        "go" => &["func", "type", "struct", "interface", "return", "defer", "go", "chan", "range"],
        "java" => &[
            "public", "private", "class", "interface", "return", "static", "final", "void", "new",
        ],
        "c" | "cpp" => &[
            "int", "char", "void", "return", "struct", "typedef", "const", "static", "if", "else",
        ],
        _ => DEFAULT_KEYWORDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_entry() {
        assert_eq!(
            lookup("rust"),
            &["fn", "struct", "enum", "impl", "trait", "use", "return", "pub"]
        );
    }

    #[test]
    fn test_unknown_language_falls_back_to_default() {
        assert_eq!(lookup("brainfuck"), DEFAULT_KEYWORDS);
        assert_eq!(lookup(""), DEFAULT_KEYWORDS);
    }

    #[test]
    fn test_default_list_has_ten_words() {
        assert_eq!(DEFAULT_KEYWORDS.len(), 10);
    }
}
