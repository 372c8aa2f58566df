//! Inference Pipeline
//!
//! Wires the signal coordinator, taxonomy matcher and term selector into the
//! single public operation `infer(image) -> InferenceOutcome`.
//!
//! # Variants
//! - **quick search**: cutoff 3, no category guess
//! - **catalog**: cutoff 5, category guess
//!
//! # Error Handling
//! - Adapter failures are folded into empty signals by the coordinator
//! - All signals empty → `InferenceOutcome::NoTermDetected`
//! - Cancellation → `InferenceOutcome::Cancelled`, no partial result
//!
//! # Example
//! ```rust,ignore
//! let pipeline = InferencePipeline::new(recognizers, Taxonomy::builtin(), PipelineConfig::catalog());
//! match pipeline.infer(Arc::new(image)).await {
//!     InferenceOutcome::Detected(result) => println!("{}", result.search_term),
//!     InferenceOutcome::NoTermDetected => println!("enter a name manually"),
//!     InferenceOutcome::Cancelled => {}
//! }
//! ```

use super::{PipelineEvent, PipelineStage};
use crate::extractors::RecognizerSet;
use crate::fusion::selector::{CATALOG_CUTOFF, QUICK_CUTOFF};
use crate::fusion::{CandidateSet, SignalCoordinator, Taxonomy, TaxonomyMatcher, TermSelector};
use crate::types::{InferenceOutcome, InferenceResult};
use crate::utils::image_decoder::DecodedImage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of terms kept in the search phrase
    pub cutoff: usize,
    /// Produce a category guess alongside the search term
    pub infer_category: bool,
    /// Per-adapter timeout (None = wait for every adapter indefinitely)
    pub signal_timeout: Option<Duration>,
}

impl PipelineConfig {
    /// Search-only variant
    pub fn quick_search() -> Self {
        Self {
            cutoff: QUICK_CUTOFF,
            infer_category: false,
            signal_timeout: None,
        }
    }

    /// Variant with category guess
    pub fn catalog() -> Self {
        Self {
            cutoff: CATALOG_CUTOFF,
            infer_category: true,
            signal_timeout: None,
        }
    }

    pub fn with_signal_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.signal_timeout = timeout;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::quick_search()
    }
}

/// Stateless inference pipeline; construct once and share
pub struct InferencePipeline {
    coordinator: SignalCoordinator,
    matcher: TaxonomyMatcher,
    selector: TermSelector,
    config: PipelineConfig,
    event_tx: Option<mpsc::Sender<PipelineEvent>>,
}

impl InferencePipeline {
    pub fn new(recognizers: RecognizerSet, taxonomy: Arc<Taxonomy>, config: PipelineConfig) -> Self {
        Self {
            coordinator: SignalCoordinator::new(recognizers, config.signal_timeout),
            matcher: TaxonomyMatcher::new(taxonomy),
            selector: TermSelector::new(config.cutoff),
            config,
            event_tx: None,
        }
    }

    /// Create pipeline with event channel for progress reporting
    pub fn with_events(
        recognizers: RecognizerSet,
        taxonomy: Arc<Taxonomy>,
        config: PipelineConfig,
        event_tx: mpsc::Sender<PipelineEvent>,
    ) -> Self {
        let mut pipeline = Self::new(recognizers, taxonomy, config);
        pipeline.event_tx = Some(event_tx);
        pipeline
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one inference to completion
    pub async fn infer(&self, image: Arc<DecodedImage>) -> InferenceOutcome {
        self.infer_with_cancel(image, &CancellationToken::new()).await
    }

    /// Run one inference that the caller may abandon via `cancel`
    pub async fn infer_with_cancel(
        &self,
        image: Arc<DecodedImage>,
        cancel: &CancellationToken,
    ) -> InferenceOutcome {
        self.enter(PipelineStage::Dispatched);
        info!(
            width = image.width(),
            height = image.height(),
            cutoff = self.config.cutoff,
            category = self.config.infer_category,
            "Inference dispatched"
        );

        self.enter(PipelineStage::AwaitingAllSignals);
        let Some(reports) = self.coordinator.dispatch(image, cancel).await else {
            self.emit_event(PipelineEvent::Cancelled);
            return InferenceOutcome::Cancelled;
        };

        for report in &reports {
            self.emit_event(PipelineEvent::SignalCompleted {
                source: report.kind,
                terms: report.terms.iter().map(|t| t.text.clone()).collect(),
                status: report.status,
            });
        }

        // Joined work finished; honour a cancel that raced with the join
        if cancel.is_cancelled() {
            self.emit_event(PipelineEvent::Cancelled);
            return InferenceOutcome::Cancelled;
        }

        self.enter(PipelineStage::Merged);
        let candidates = CandidateSet::from_reports(&reports);
        debug!(
            candidates = candidates.len(),
            terms = ?candidates.texts().collect::<Vec<_>>(),
            "Signals merged"
        );

        let outcome = self.decide(&candidates);
        self.enter(PipelineStage::Terminal);
        outcome
    }

    /// Pure stages after the join: expand, select, categorize
    fn decide(&self, candidates: &CandidateSet) -> InferenceOutcome {
        self.enter(PipelineStage::TaxonomyExpanded);
        let matched = self.matcher.expand(candidates);

        self.enter(PipelineStage::Selected);
        let Some(search_term) = self.selector.select(matched.iter()) else {
            info!("No term detected");
            return InferenceOutcome::NoTermDetected;
        };

        let category_guess = self
            .config
            .infer_category
            .then(|| self.matcher.infer_category(candidates.texts()));

        info!(
            search_term = %search_term,
            category = ?category_guess,
            matched = matched.len(),
            "Search term selected"
        );

        InferenceOutcome::Detected(InferenceResult {
            search_term,
            category_guess,
        })
    }

    fn enter(&self, stage: PipelineStage) {
        debug!(stage = ?stage, "Pipeline stage");
        self.emit_event(PipelineEvent::StageEntered { stage });
    }

    /// Emit pipeline event if channel configured
    ///
    /// Never waits on the observer: a full channel drops the event.
    fn emit_event(&self, event: PipelineEvent) {
        if let Some(tx) = &self.event_tx {
            match tx.try_send(event) {
                Ok(()) | Err(TrySendError::Closed(_)) => {}
                Err(TrySendError::Full(event)) => {
                    debug!(event = ?event, "Event channel full; dropping pipeline event");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
