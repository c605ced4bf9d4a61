use crate::models::CharRange;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;

/// Whole-word keyword matcher.
///
/// Patterns are compiled once per keyword and cached across refreshes; the
/// matcher runs on every keystroke and every animation tick, so recompilation
/// would dominate the cost. Keyword text is escaped before being wrapped in
/// word boundaries so metacharacters in user keywords match literally.
///
/// Matching is plain regex over raw text: occurrences inside string literals
/// or comments are not excluded.
pub struct MatchFinder {
    patterns: HashMap<String, Regex>,
}

impl MatchFinder {
    pub fn new() -> Self {
        Self {
            patterns: HashMap::new(),
        }
    }

    /// Find whole-word, case-sensitive occurrences of each keyword in `text`.
    ///
    /// The result preserves keyword order; keywords without matches are
    /// omitted and duplicates collapse to their first occurrence. Offsets are
    /// character offsets into `text`.
    ///
    /// There is no internal size limit; callers enforce the
    /// [`MAX_DOCUMENT_CHARS`](crate::models::MAX_DOCUMENT_CHARS) guard. Worst
    /// case is O(keywords × text length).
    pub fn find_ranges(&mut self, text: &str, keywords: &[&str]) -> IndexMap<String, Vec<CharRange>> {
        let mut results: IndexMap<String, Vec<CharRange>> = IndexMap::new();

        for &keyword in keywords {
            if keyword.is_empty() || results.contains_key(keyword) {
                continue;
            }

            let pattern = self.pattern_for(keyword);
            let byte_ranges: Vec<(usize, usize)> = pattern
                .find_iter(text)
                .map(|m| (m.start(), m.end()))
                .collect();

            if byte_ranges.is_empty() {
                continue;
            }

            results.insert(keyword.to_string(), char_ranges(text, &byte_ranges));
        }

        results
    }

    fn pattern_for(&mut self, keyword: &str) -> &Regex {
        self.patterns.entry(keyword.to_string()).or_insert_with(|| {
            let pattern = format!(r"\b{}\b", regex::escape(keyword));
            Regex::new(&pattern).expect("escaped keyword pattern always compiles")
        })
    }
}

impl Default for MatchFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert ascending, non-overlapping byte ranges to character ranges in a
/// single pass over `text`.
fn char_ranges(text: &str, byte_ranges: &[(usize, usize)]) -> Vec<CharRange> {
    // Flattened boundary offsets stay sorted because the ranges are ascending
    // and non-overlapping.
    let mut boundaries = Vec::with_capacity(byte_ranges.len() * 2);
    for &(start, end) in byte_ranges {
        boundaries.push(start);
        boundaries.push(end);
    }

    let mut converted = Vec::with_capacity(boundaries.len());
    let mut next = 0;
    let mut char_index = 0;
    for (byte_index, _) in text.char_indices() {
        while next < boundaries.len() && boundaries[next] == byte_index {
            converted.push(char_index);
            next += 1;
        }
        char_index += 1;
    }
    // Boundaries at the end of the text.
    while next < boundaries.len() {
        converted.push(char_index);
        next += 1;
    }

    converted
        .chunks(2)
        .map(|pair| CharRange::new(pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_only() {
        let mut finder = MatchFinder::new();
        let results = finder.find_ranges("classify", &["class"]);
        assert!(results.is_empty());

        let results = finder.find_ranges("a class apart", &["class"]);
        assert_eq!(results["class"], vec![CharRange::new(2, 7)]);
    }

    #[test]
    fn test_scenario_offsets() {
        let mut finder = MatchFinder::new();
        let results = finder.find_ranges("function foo() { const x = 1; }", &["function", "const"]);

        assert_eq!(results.len(), 2);
        assert_eq!(results["function"], vec![CharRange::new(0, 8)]);
        assert_eq!(results["const"], vec![CharRange::new(17, 22)]);
    }

    #[test]
    fn test_order_follows_keyword_list() {
        let mut finder = MatchFinder::new();
        let results = finder.find_ranges("b a c", &["c", "a", "b"]);

        let order: Vec<&str> = results.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_zero_match_keywords_omitted() {
        let mut finder = MatchFinder::new();
        let results = finder.find_ranges("fn main() {}", &["fn", "struct"]);

        assert!(results.contains_key("fn"));
        assert!(!results.contains_key("struct"));
    }

    #[test]
    fn test_metacharacter_keyword_matches_literally() {
        let mut finder = MatchFinder::new();
        // Unescaped, "c++" would be the regex /\bc++\b/ and match runs of c's.
        let results = finder.find_ranges("c cc c++ d", &["c++"]);
        assert_eq!(results["c++"], vec![CharRange::new(5, 8)]);
        assert!(finder.find_ranges("cc", &["c++"]).is_empty());
    }

    #[test]
    fn test_case_sensitive() {
        let mut finder = MatchFinder::new();
        assert!(finder.find_ranges("Return", &["return"]).is_empty());
    }

    #[test]
    fn test_multiple_occurrences_in_order() {
        let mut finder = MatchFinder::new();
        let results = finder.find_ranges("if a if b if", &["if"]);
        assert_eq!(
            results["if"],
            vec![CharRange::new(0, 2), CharRange::new(5, 7), CharRange::new(10, 12)]
        );
    }

    #[test]
    fn test_offsets_are_character_offsets() {
        let mut finder = MatchFinder::new();
        // "é" is two bytes; character offsets must not drift after it.
        let results = finder.find_ranges("émoji fn x", &["fn"]);
        assert_eq!(results["fn"], vec![CharRange::new(6, 8)]);
    }

    #[test]
    fn test_match_at_end_of_text() {
        let mut finder = MatchFinder::new();
        let results = finder.find_ranges("let x = value", &["value"]);
        assert_eq!(results["value"], vec![CharRange::new(8, 13)]);
    }

    #[test]
    fn test_duplicate_keywords_collapse() {
        let mut finder = MatchFinder::new();
        let results = finder.find_ranges("fn fn", &["fn", "fn"]);
        assert_eq!(results.len(), 1);
        assert_eq!(results["fn"].len(), 2);
    }

    #[test]
    fn test_empty_keyword_ignored() {
        let mut finder = MatchFinder::new();
        assert!(finder.find_ranges("anything", &[""]).is_empty());
    }

    #[test]
    fn test_pattern_cache_survives_calls() {
        let mut finder = MatchFinder::new();
        finder.find_ranges("fn a", &["fn"]);
        finder.find_ranges("fn b", &["fn"]);
        assert_eq!(finder.patterns.len(), 1);
    }
}
