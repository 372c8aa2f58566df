//! Photo inference workflow
//!
//! One invocation passes strictly through:
//! Dispatched → AwaitingAllSignals → Merged → TaxonomyExpanded → Selected → Terminal
//!
//! No state survives an invocation; cancellation can end it at any point
//! before `Selected`.

pub mod pipeline;

use crate::fusion::SignalStatus;
use crate::types::SourceKind;

pub use pipeline::{InferencePipeline, PipelineConfig};

/// Pipeline state within one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Dispatched,
    AwaitingAllSignals,
    Merged,
    TaxonomyExpanded,
    Selected,
    Terminal,
}

/// Progress events for observers (logs, SSE, tests)
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    /// Pipeline entered a new stage
    StageEntered {
        stage: PipelineStage,
    },

    /// One recognition signal reported
    SignalCompleted {
        source: SourceKind,
        /// Terms kept after confidence filtering and normalization
        terms: Vec<String>,
        status: SignalStatus,
    },

    /// Invocation was cancelled by the caller
    Cancelled,
}
