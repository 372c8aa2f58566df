//! Core Types and Trait Definitions for snapcart-ai
//!
//! Defines the data model of the image-to-search-term pipeline:
//! - **Adapters:** `Recognizer` (text, object, scene signals)
//! - **Fusion:** `CandidateTerm` union, taxonomy matching, term selection
//! - **Output:** `InferenceResult` / `InferenceOutcome`
//!
//! # Flow
//! Dispatched → AwaitingAllSignals → Merged → TaxonomyExpanded → Selected → Terminal

use crate::utils::image_decoder::DecodedImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Signals
// ============================================================================

/// Independent recognition source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Text recognition (OCR)
    Text,
    /// Object / label classification
    Object,
    /// Scene classification
    Scene,
}

impl SourceKind {
    /// All signals, in merge order
    pub const ALL: [SourceKind; 3] = [SourceKind::Text, SourceKind::Object, SourceKind::Scene];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Text => "text",
            SourceKind::Object => "object",
            SourceKind::Scene => "scene",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One signal's raw output unit
///
/// Produced by a `Recognizer`, consumed only by the signal coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionCandidate {
    /// Label or recognized string
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Signal that produced this candidate
    pub source_kind: SourceKind,
    /// Detected text region (text signal only); candidates sharing a region
    /// are alternatives for the same piece of text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<u32>,
}

impl RecognitionCandidate {
    /// Create new candidate with clamped confidence (0.0-1.0)
    pub fn new(label: impl Into<String>, confidence: f32, source_kind: SourceKind) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            label: label.into(),
            confidence,
            source_kind,
            region: None,
        }
    }

    /// Attach a text region index
    pub fn in_region(mut self, region: u32) -> Self {
        self.region = Some(region);
        self
    }
}

/// Normalized, source-tagged term that survived per-source filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTerm {
    /// Display text (original casing from first-seen candidate)
    pub text: String,
    /// Signal the term came from
    pub source_kind: SourceKind,
}

impl CandidateTerm {
    pub fn new(text: impl Into<String>, source_kind: SourceKind) -> Self {
        Self {
            text: text.into(),
            source_kind,
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Product category attached to taxonomy entries and inferred per photo
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Footwear,
    Accessories,
    Home,
    Kitchen,
    Beauty,
    Sports,
    Toys,
    Books,
    Grocery,
    /// Unclassified (no category scored above zero)
    #[default]
    Other,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Electronics => "electronics",
            ProductCategory::Clothing => "clothing",
            ProductCategory::Footwear => "footwear",
            ProductCategory::Accessories => "accessories",
            ProductCategory::Home => "home",
            ProductCategory::Kitchen => "kitchen",
            ProductCategory::Beauty => "beauty",
            ProductCategory::Sports => "sports",
            ProductCategory::Toys => "toys",
            ProductCategory::Books => "books",
            ProductCategory::Grocery => "grocery",
            ProductCategory::Other => "other",
        }
    }

    /// Parse stored category text; unknown values map to `Other`
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "electronics" => ProductCategory::Electronics,
            "clothing" => ProductCategory::Clothing,
            "footwear" => ProductCategory::Footwear,
            "accessories" => ProductCategory::Accessories,
            "home" => ProductCategory::Home,
            "kitchen" => ProductCategory::Kitchen,
            "beauty" => ProductCategory::Beauty,
            "sports" => ProductCategory::Sports,
            "toys" => ProductCategory::Toys,
            "books" => ProductCategory::Books,
            "grocery" => ProductCategory::Grocery,
            _ => ProductCategory::Other,
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal output of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Space-joined, title-cased search phrase
    pub search_term: String,
    /// Category guess (catalog variant only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_guess: Option<ProductCategory>,
}

/// How an invocation ended
///
/// "Nothing detected" and cancellation are distinct outcomes, never an empty
/// `InferenceResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceOutcome {
    /// A non-empty search term was selected
    Detected(InferenceResult),
    /// Every signal came back empty (or was filtered away)
    NoTermDetected,
    /// Caller cancelled; partial results were discarded
    Cancelled,
}

impl InferenceOutcome {
    pub fn result(&self) -> Option<&InferenceResult> {
        match self {
            InferenceOutcome::Detected(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, InferenceOutcome::Cancelled)
    }
}

// ============================================================================
// Recognition adapter trait
// ============================================================================

/// Recognition adapter (black-box capability provider)
///
/// Returns candidates in provider rank order. Failure and "nothing found" are
/// treated identically by the pipeline.
///
/// # Example
/// ```rust,ignore
/// use snapcart_ai::types::{Recognizer, RecognitionCandidate, RecognitionError, SourceKind};
///
/// struct Barcode;
///
/// #[async_trait::async_trait]
/// impl Recognizer for Barcode {
///     fn kind(&self) -> SourceKind { SourceKind::Text }
///     fn name(&self) -> &str { "barcode" }
///
///     async fn recognize(&self, image: &DecodedImage) -> Result<Vec<RecognitionCandidate>, RecognitionError> {
///         Ok(vec![RecognitionCandidate::new("0123456789", 0.9, SourceKind::Text)])
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    /// Signal this adapter provides
    fn kind(&self) -> SourceKind;

    /// Adapter name for logging
    fn name(&self) -> &str;

    /// Run recognition against a decoded image
    ///
    /// # Errors
    /// Returns `RecognitionError` on any adapter-local failure; the
    /// coordinator folds it into an empty list for this signal.
    async fn recognize(
        &self,
        image: &DecodedImage,
    ) -> Result<Vec<RecognitionCandidate>, RecognitionError>;
}

/// Adapter-local recognition error
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Image could not be processed for this signal
    #[error("Image decode error: {0}")]
    Decode(String),

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Recognition service returned an error
    #[error("API error: {0}")]
    Api(String),

    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Adapter not configured / not available
    #[error("Recognizer not available: {0}")]
    NotAvailable(String),

    /// Adapter exceeded its configured timeout
    #[error("Recognizer timed out after {0} ms")]
    Timeout(u64),

    /// Internal processing error
    #[error("Internal error: {0}")]
    Internal(String),
}
