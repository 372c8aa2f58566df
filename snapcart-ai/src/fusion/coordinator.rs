// Signal Coordinator - Fan-Out / Fan-In over the Three Recognition Adapters
//
// Each adapter runs on its own tokio task (parallel on the multi-thread
// runtime) and writes only to its own report. The join waits for all three;
// a failed, timed-out or panicked adapter reports an empty term list. The
// merge into the candidate set runs after the join, single-threaded.
//
// Cancellation (token or dropping the future) aborts the in-flight adapter
// tasks and discards whatever they produced.

use super::normalizer::{case_fold, normalize_terms};
use crate::extractors::{RecognizerSet, SignalPolicy};
use crate::types::{CandidateTerm, RecognitionError, Recognizer, SourceKind};
use crate::utils::image_decoder::DecodedImage;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How one signal finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Ok,
    Failed,
    TimedOut,
    Panicked,
}

/// Filtered, normalized output of one signal
#[derive(Debug, Clone)]
pub struct SignalReport {
    pub kind: SourceKind,
    pub recognizer: String,
    pub status: SignalStatus,
    pub terms: Vec<CandidateTerm>,
    pub elapsed: Duration,
}

impl SignalReport {
    fn empty(kind: SourceKind, recognizer: String, status: SignalStatus, elapsed: Duration) -> Self {
        Self {
            kind,
            recognizer,
            status,
            terms: Vec::new(),
            elapsed,
        }
    }
}

/// Union of candidate terms across signals, keyed by case-folded text
///
/// The first-seen representative keeps its casing; later duplicates are dropped.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    terms: Vec<CandidateTerm>,
    keys: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a term; returns false if an equal (case-folded) term exists or it is blank
    pub fn insert(&mut self, term: CandidateTerm) -> bool {
        if term.text.trim().is_empty() {
            return false;
        }
        if self.keys.insert(case_fold(&term.text)) {
            self.terms.push(term);
            true
        } else {
            false
        }
    }

    /// Merge signal reports in the order given
    pub fn from_reports(reports: &[SignalReport]) -> Self {
        let mut set = Self::new();
        for report in reports {
            for term in &report.terms {
                set.insert(term.clone());
            }
        }
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateTerm> {
        self.terms.iter()
    }

    /// Display texts in merge order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.text.as_str())
    }

    pub fn contains(&self, text: &str) -> bool {
        self.keys.contains(&case_fold(text))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<CandidateTerm> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = CandidateTerm>>(iter: I) -> Self {
        let mut set = Self::new();
        for term in iter {
            set.insert(term);
        }
        set
    }
}

/// Aborts spawned adapter tasks when the join is abandoned
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Fan-out/fan-in coordinator
#[derive(Clone)]
pub struct SignalCoordinator {
    recognizers: RecognizerSet,
    /// Per-adapter timeout (None = wait indefinitely)
    signal_timeout: Option<Duration>,
}

impl SignalCoordinator {
    pub fn new(recognizers: RecognizerSet, signal_timeout: Option<Duration>) -> Self {
        Self {
            recognizers,
            signal_timeout,
        }
    }

    /// Run all three adapters and return their reports in signal order
    ///
    /// Returns `None` if `cancel` fires before every adapter has reported.
    pub async fn dispatch(
        &self,
        image: Arc<DecodedImage>,
        cancel: &CancellationToken,
    ) -> Option<Vec<SignalReport>> {
        if cancel.is_cancelled() {
            return None;
        }

        let handles: Vec<_> = SourceKind::ALL
            .iter()
            .map(|&kind| {
                let recognizer = Arc::clone(self.recognizers.get(kind));
                let name = recognizer.name().to_string();
                let image = Arc::clone(&image);
                let timeout = self.signal_timeout;
                let handle = tokio::spawn(run_signal(recognizer, image, timeout));
                (kind, name, handle)
            })
            .collect();

        let _guard = AbortOnDrop(handles.iter().map(|(_, _, h)| h.abort_handle()).collect());
        let started = Instant::now();

        let join_all = futures::future::join_all(handles.into_iter().map(
            |(kind, name, handle)| async move {
                match handle.await {
                    Ok(report) => report,
                    Err(e) => {
                        warn!(signal = %kind, recognizer = %name, error = %e, "Recognizer task panicked");
                        SignalReport::empty(kind, name, SignalStatus::Panicked, started.elapsed())
                    }
                }
            },
        ));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Inference cancelled; discarding in-flight recognizer work");
                None
            }
            reports = join_all => {
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "All signals reported");
                Some(reports)
            }
        }
    }

    /// Dispatch and merge into a candidate set
    pub async fn gather(
        &self,
        image: Arc<DecodedImage>,
        cancel: &CancellationToken,
    ) -> Option<CandidateSet> {
        self.dispatch(image, cancel)
            .await
            .map(|reports| CandidateSet::from_reports(&reports))
    }
}

/// One adapter branch: recognize, apply signal policy, normalize
async fn run_signal(
    recognizer: Arc<dyn Recognizer>,
    image: Arc<DecodedImage>,
    timeout: Option<Duration>,
) -> SignalReport {
    let kind = recognizer.kind();
    let name = recognizer.name().to_string();
    let started = Instant::now();

    let outcome = match timeout {
        Some(limit) => tokio::time::timeout(limit, recognizer.recognize(&image))
            .await
            .unwrap_or(Err(RecognitionError::Timeout(limit.as_millis() as u64))),
        None => recognizer.recognize(&image).await,
    };

    match outcome {
        Ok(candidates) => {
            let raw = SignalPolicy::for_kind(kind).select(&candidates);
            let terms: Vec<CandidateTerm> = normalize_terms(raw)
                .into_iter()
                .map(|text| CandidateTerm::new(text, kind))
                .collect();

            debug!(
                signal = %kind,
                recognizer = %name,
                candidates = candidates.len(),
                kept = terms.len(),
                "Signal completed"
            );

            SignalReport {
                kind,
                recognizer: name,
                status: SignalStatus::Ok,
                terms,
                elapsed: started.elapsed(),
            }
        }
        Err(RecognitionError::Timeout(ms)) => {
            warn!(signal = %kind, recognizer = %name, timeout_ms = ms, "Recognizer timed out");
            SignalReport::empty(kind, name, SignalStatus::TimedOut, started.elapsed())
        }
        Err(e) => {
            warn!(signal = %kind, recognizer = %name, error = %e, "Recognizer failed");
            SignalReport::empty(kind, name, SignalStatus::Failed, started.elapsed())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::StaticRecognizer;
    use image::{DynamicImage, RgbImage};

    fn image() -> Arc<DecodedImage> {
        Arc::new(DecodedImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(2, 2))))
    }

    fn term(text: &str, kind: SourceKind) -> CandidateTerm {
        CandidateTerm::new(text, kind)
    }

    #[test]
    fn case_fold_dedup_keeps_first_seen() {
        let set: CandidateSet = ["Shoe", "shoe", "SHOE"]
            .into_iter()
            .map(|t| term(t, SourceKind::Object))
            .collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set.texts().next(), Some("Shoe"));
        assert!(set.contains("sHoE"));
    }

    #[test]
    fn blank_terms_are_rejected() {
        let mut set = CandidateSet::new();
        assert!(!set.insert(term("   ", SourceKind::Text)));
        assert!(set.is_empty());
    }

    #[test]
    fn merge_follows_report_order() {
        let reports = vec![
            SignalReport {
                kind: SourceKind::Text,
                recognizer: "t".into(),
                status: SignalStatus::Ok,
                terms: vec![term("Nike", SourceKind::Text)],
                elapsed: Duration::ZERO,
            },
            SignalReport {
                kind: SourceKind::Object,
                recognizer: "o".into(),
                status: SignalStatus::Ok,
                terms: vec![term("Running Shoe", SourceKind::Object), term("NIKE", SourceKind::Object)],
                elapsed: Duration::ZERO,
            },
        ];
        let set = CandidateSet::from_reports(&reports);
        let texts: Vec<_> = set.texts().collect();
        assert_eq!(texts, vec!["Nike", "Running Shoe"]);
        assert_eq!(set.iter().next().unwrap().source_kind, SourceKind::Text);
    }

    #[tokio::test]
    async fn failed_signal_does_not_affect_others() {
        let recognizers = RecognizerSet::new(
            Arc::new(StaticRecognizer::unavailable(SourceKind::Text)),
            Arc::new(StaticRecognizer::from_labels(SourceKind::Object, &[("mug", 0.9)])),
            Arc::new(StaticRecognizer::from_labels(SourceKind::Scene, &[("kitchen", 0.8)])),
        );
        let coordinator = SignalCoordinator::new(recognizers, None);

        let reports = coordinator
            .dispatch(image(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].status, SignalStatus::Failed);
        assert!(reports[0].terms.is_empty());
        assert_eq!(reports[1].terms, vec![term("Mug", SourceKind::Object)]);
        assert_eq!(reports[2].terms, vec![term("Kitchen", SourceKind::Scene)]);
    }

    #[tokio::test]
    async fn pre_cancelled_token_dispatches_nothing() {
        let coordinator = SignalCoordinator::new(RecognizerSet::unavailable(), None);
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(coordinator.gather(image(), &cancel).await.is_none());
    }
}
