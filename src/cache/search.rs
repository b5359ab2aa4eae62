//! Windowed Search Module
//!
//! Lexical search inside a cached document. Each line containing any query
//! term yields a window of surrounding lines; identical windows are kept once.

use std::collections::HashSet;

use crate::config::DEFAULT_CONTEXT_LINES;

/// Separator placed between excerpts when they are presented together.
pub const SECTION_SEPARATOR: &str = "\n\n---SECTION---\n";

/// Splits a query into lowercase whitespace-delimited terms.
pub fn query_terms(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

// == Search ==
/// Searches `body` for `query` using the default context window.
pub fn search(body: &str, query: &str) -> Vec<String> {
    search_with_context(body, query, DEFAULT_CONTEXT_LINES)
}

/// Returns excerpts of `body` around every line matching any term of `query`.
///
/// A line matches when any lowercase term is a substring of the lowercased
/// line. The window spans `context` lines on either side, clipped to the
/// document. Excerpts keep the order of their first match; an excerpt equal
/// to one already collected is dropped.
pub fn search_with_context(body: &str, query: &str, context: usize) -> Vec<String> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = body.split('\n').collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut excerpts = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let lowered = line.to_lowercase();
        if !terms.iter().any(|term| lowered.contains(term.as_str())) {
            continue;
        }

        let start = i.saturating_sub(context);
        let end = i.saturating_add(context).saturating_add(1).min(lines.len());
        let excerpt = lines[start..end].join("\n");

        if seen.insert(excerpt.clone()) {
            excerpts.push(excerpt);
        }
    }

    excerpts
}

/// Joins excerpts for display.
pub fn join_excerpts(excerpts: &[String]) -> String {
    excerpts.join(SECTION_SEPARATOR)
}
