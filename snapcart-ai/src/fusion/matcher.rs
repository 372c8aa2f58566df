// Taxonomy Matcher - Keyword Expansion and Category Inference
//
// Bidirectional substring rule, case-insensitive: a candidate `c` matches a
// taxonomy term `k` if `k` contains `c` or `c` contains `k`. Both directions
// are checked independently, so short candidates can match inside long
// keywords (and vice versa). This is permissive on purpose and can produce
// false positives for short candidates.

use super::coordinator::CandidateSet;
use super::normalizer::{case_fold, is_long_enough};
use super::taxonomy::Taxonomy;
use crate::types::ProductCategory;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Why a term is in the matched set
///
/// Ordered strongest first; used to pick the representative when two terms
/// fold to the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchBasis {
    /// Raw candidate term from a recognition signal
    Candidate,
    /// Candidate and taxonomy term are equal (case-insensitive)
    Exact,
    /// Taxonomy term occurs inside the candidate
    SubstringOfCandidate,
    /// Candidate occurs inside the taxonomy term
    CandidateSubstringOfKeyword,
}

/// Candidate term or taxonomy term that survived cross-matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedTerm {
    pub text: String,
    pub basis: MatchBasis,
}

/// Matched terms keyed by case-folded text
#[derive(Debug, Clone, Default)]
pub struct MatchedTermSet {
    terms: Vec<MatchedTerm>,
    index: HashMap<String, usize>,
}

impl MatchedTermSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or strengthen a term
    ///
    /// An existing entry is replaced only by a strictly stronger basis.
    pub fn insert(&mut self, text: &str, basis: MatchBasis) {
        let key = case_fold(text);
        match self.index.get(&key) {
            Some(&idx) => {
                if basis < self.terms[idx].basis {
                    self.terms[idx] = MatchedTerm {
                        text: text.to_string(),
                        basis,
                    };
                }
            }
            None => {
                self.index.insert(key, self.terms.len());
                self.terms.push(MatchedTerm {
                    text: text.to_string(),
                    basis,
                });
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchedTerm> {
        self.terms.iter()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.index.contains_key(&case_fold(text))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for MatchedTermSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for text in iter {
            set.insert(text, MatchBasis::Candidate);
        }
        set
    }
}

/// Bidirectional substring test on already case-folded strings
pub fn cross_match_folded(candidate: &str, keyword: &str) -> Option<MatchBasis> {
    if candidate.is_empty() || keyword.is_empty() {
        return None;
    }
    if candidate == keyword {
        Some(MatchBasis::Exact)
    } else if candidate.contains(keyword) {
        Some(MatchBasis::SubstringOfCandidate)
    } else if keyword.contains(candidate) {
        Some(MatchBasis::CandidateSubstringOfKeyword)
    } else {
        None
    }
}

/// Bidirectional, case-insensitive substring test
pub fn cross_match(candidate: &str, keyword: &str) -> Option<MatchBasis> {
    cross_match_folded(&case_fold(candidate), &case_fold(keyword))
}

/// Expands candidate sets against a shared taxonomy
#[derive(Debug, Clone)]
pub struct TaxonomyMatcher {
    taxonomy: Arc<Taxonomy>,
}

impl TaxonomyMatcher {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Union of candidate terms (length > 2) and every taxonomy term any candidate matches
    ///
    /// With an empty taxonomy this is just the candidate terms.
    pub fn expand(&self, candidates: &CandidateSet) -> MatchedTermSet {
        let mut set = MatchedTermSet::new();

        for text in candidates.texts().filter(|t| is_long_enough(t)) {
            set.insert(text, MatchBasis::Candidate);
        }

        for text in candidates.texts() {
            let folded = case_fold(text);
            for (_, terms) in self.taxonomy.folded_entries() {
                for term in terms {
                    if let Some(basis) = cross_match_folded(&folded, &term.folded) {
                        set.insert(&term.text, basis);
                    }
                }
            }
        }

        debug!(
            candidates = candidates.len(),
            matched = set.len(),
            "Taxonomy expansion complete"
        );

        set
    }

    /// Best-guess category for a set of input terms
    ///
    /// Score per category = number of its entries whose name or any keyword
    /// cross-matches any input term. Highest score wins; ties go to the
    /// category declared first. No score above zero → `Other`.
    pub fn infer_category<'a, I>(&self, terms: I) -> ProductCategory
    where
        I: IntoIterator<Item = &'a str>,
    {
        let inputs: Vec<String> = terms
            .into_iter()
            .map(case_fold)
            .filter(|t| !t.trim().is_empty())
            .collect();

        let mut scores: HashMap<ProductCategory, usize> = HashMap::new();
        for (entry, entry_terms) in self.taxonomy.folded_entries() {
            let matched = entry_terms.iter().any(|term| {
                inputs
                    .iter()
                    .any(|input| cross_match_folded(input, &term.folded).is_some())
            });
            if matched {
                *scores.entry(entry.category).or_insert(0) += 1;
            }
        }

        let mut best = ProductCategory::Other;
        let mut best_score = 0;
        for category in self.taxonomy.categories() {
            let score = scores.get(category).copied().unwrap_or(0);
            if score > best_score {
                best = *category;
                best_score = score;
            }
        }

        debug!(category = %best, score = best_score, "Category inferred");
        best
    }
}
