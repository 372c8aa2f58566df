// Signal Policy - Per-Source Confidence Filtering and Label Cleanup
//
// Thresholds are strict (`confidence > min_confidence`):
// - Text:   top candidate per region, > 0.6, tokenized into words
// - Object: top 3 labels, > 0.3, comma-truncated, punctuation-stripped, title-cased
// - Scene:  top 2 labels, > 0.5, comma-truncated, punctuation-stripped, title-cased
//
// Labels still holding symbols after stripping are dropped.

use crate::fusion::normalizer::{
    is_long_enough, is_word_text, strip_punctuation, title_case, truncate_label,
};
use crate::types::{RecognitionCandidate, SourceKind};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Selection rule applied to one adapter's raw candidates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPolicy {
    pub kind: SourceKind,
    /// Candidates must score strictly above this
    pub min_confidence: f32,
    /// Maximum labels kept after ranking (None = one per text region)
    pub max_labels: Option<usize>,
}

impl SignalPolicy {
    pub const TEXT: SignalPolicy = SignalPolicy {
        kind: SourceKind::Text,
        min_confidence: 0.6,
        max_labels: None,
    };

    pub const OBJECT: SignalPolicy = SignalPolicy {
        kind: SourceKind::Object,
        min_confidence: 0.3,
        max_labels: Some(3),
    };

    pub const SCENE: SignalPolicy = SignalPolicy {
        kind: SourceKind::Scene,
        min_confidence: 0.5,
        max_labels: Some(2),
    };

    pub fn for_kind(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Text => Self::TEXT,
            SourceKind::Object => Self::OBJECT,
            SourceKind::Scene => Self::SCENE,
        }
    }

    /// Reduce raw candidates to raw term strings (normalization happens later)
    pub fn select(&self, candidates: &[RecognitionCandidate]) -> Vec<String> {
        match self.kind {
            SourceKind::Text => self.select_text(candidates),
            SourceKind::Object | SourceKind::Scene => self.select_labels(candidates),
        }
    }

    fn select_text(&self, candidates: &[RecognitionCandidate]) -> Vec<String> {
        top_per_region(candidates)
            .into_iter()
            .filter(|c| c.confidence > self.min_confidence)
            .flat_map(|c| c.label.split_whitespace().map(strip_punctuation).collect::<Vec<_>>())
            .filter(|token| is_long_enough(token) && is_word_text(token))
            .collect()
    }

    fn select_labels(&self, candidates: &[RecognitionCandidate]) -> Vec<String> {
        let mut ranked: Vec<&RecognitionCandidate> = candidates
            .iter()
            .filter(|c| c.confidence > self.min_confidence)
            .collect();

        // Stable sort: equal scores keep provider order
        ranked.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        ranked
            .into_iter()
            .take(self.max_labels.unwrap_or(usize::MAX))
            .map(|c| title_case(&strip_punctuation(truncate_label(&c.label))))
            .filter(|label| !label.is_empty() && is_word_text(label))
            .collect()
    }
}

/// Highest-confidence candidate of each text region, in region discovery order
///
/// Candidates without a region index are their own region.
fn top_per_region(candidates: &[RecognitionCandidate]) -> Vec<&RecognitionCandidate> {
    let mut best: Vec<&RecognitionCandidate> = Vec::new();
    let mut slots: HashMap<u32, usize> = HashMap::new();

    for candidate in candidates {
        match candidate.region {
            Some(region) => match slots.get(&region) {
                Some(&idx) => {
                    if candidate.confidence > best[idx].confidence {
                        best[idx] = candidate;
                    }
                }
                None => {
                    slots.insert(region, best.len());
                    best.push(candidate);
                }
            },
            None => best.push(candidate),
        }
    }

    best
}
