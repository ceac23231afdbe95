//! Denylist term matching

use aho_corasick::AhoCorasick;
use nutriguard_core::Result;

/// Substring matcher over a fixed, ordered list of lowercase terms
///
/// When several terms occur in the same text, the one listed first wins,
/// regardless of where in the text each occurs.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    automaton: AhoCorasick,
    terms: Vec<String>,
}

impl TermMatcher {
    /// Build a matcher. Terms are lowercased; callers lowercase the text.
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let automaton = AhoCorasick::new(&terms).map_err(|e| {
            nutriguard_core::Error::config(format!("Failed to build term matcher: {}", e))
        })?;

        Ok(Self { automaton, terms })
    }

    /// The earliest-listed term occurring anywhere in `text`
    pub fn first_listed(&self, text: &str) -> Option<&str> {
        self.automaton
            .find_overlapping_iter(text)
            .map(|m| m.pattern().as_usize())
            .min()
            .map(|idx| self.terms[idx].as_str())
    }

    /// Terms in list order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
