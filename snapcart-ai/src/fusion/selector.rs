// Term Selector
//
// Alphabetical-then-cutoff: sort the matched set case-insensitively, keep the
// first `cutoff` terms, title-case and join with single spaces. Confidence is
// not consulted; this is a known limitation of the selection policy, not a
// defect. The output depends only on the set contents, never on arrival order.

use super::matcher::MatchedTerm;
use super::normalizer::{case_fold, title_case};
use std::collections::HashSet;

/// Cutoff used by the search-only variant
pub const QUICK_CUTOFF: usize = 3;

/// Cutoff used by the catalog variant
pub const CATALOG_CUTOFF: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSelector {
    cutoff: usize,
}

impl TermSelector {
    /// Selector keeping at most `cutoff` terms (minimum 1)
    pub fn new(cutoff: usize) -> Self {
        Self {
            cutoff: cutoff.max(1),
        }
    }

    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Reduce matched terms to the final search phrase
    ///
    /// Returns `None` when no term survives (caller reports "no term detected").
    pub fn select<'a, I>(&self, terms: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a MatchedTerm>,
    {
        let mut ranked: Vec<(String, &MatchedTerm)> = terms
            .into_iter()
            .filter(|t| !t.text.trim().is_empty())
            .map(|t| (case_fold(&t.text), t))
            .collect();

        // Total order: folded text, then basis, then raw text
        ranked.sort_by(|(fa, a), (fb, b)| {
            fa.cmp(fb)
                .then(a.basis.cmp(&b.basis))
                .then(a.text.cmp(&b.text))
        });

        let mut seen = HashSet::new();
        let words: Vec<String> = ranked
            .into_iter()
            .map(|(_, t)| title_case(&t.text))
            .filter(|titled| !titled.is_empty() && seen.insert(case_fold(titled)))
            .take(self.cutoff)
            .collect();

        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }
}

impl Default for TermSelector {
    fn default() -> Self {
        Self::new(QUICK_CUTOFF)
    }
}
