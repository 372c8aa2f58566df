//! Recognition Adapters
//!
//! Thin shims around the three black-box capability providers. Each adapter
//! returns ranked `RecognitionCandidate`s; the per-signal `SignalPolicy`
//! reduces them to raw terms before fusion.
//!
//! # Adapters
//! 1. **remote_recognizer** - HTTP classification service (text, object or scene)
//! 2. **static_recognizer** - Fixed output / unavailable signal
//!
//! # Error Isolation
//! Adapter failures never leave the signal coordinator: a failed signal
//! contributes an empty list and the other two are unaffected.

pub mod remote_recognizer;
pub mod signal_policy;
pub mod static_recognizer;

pub use remote_recognizer::RemoteRecognizer;
pub use signal_policy::SignalPolicy;
pub use static_recognizer::StaticRecognizer;

use crate::types::{Recognizer, SourceKind};
use std::sync::Arc;
use tracing::warn;

/// The three recognition adapters of one pipeline
///
/// Exactly one adapter per signal; the coordinator dispatches all three on
/// every invocation.
#[derive(Clone)]
pub struct RecognizerSet {
    pub text: Arc<dyn Recognizer>,
    pub object: Arc<dyn Recognizer>,
    pub scene: Arc<dyn Recognizer>,
}

impl RecognizerSet {
    /// Build a set, checking each adapter is in the right slot
    ///
    /// A misplaced adapter is logged and replaced by an unavailable one.
    pub fn new(
        text: Arc<dyn Recognizer>,
        object: Arc<dyn Recognizer>,
        scene: Arc<dyn Recognizer>,
    ) -> Self {
        Self {
            text: checked_slot(SourceKind::Text, text),
            object: checked_slot(SourceKind::Object, object),
            scene: checked_slot(SourceKind::Scene, scene),
        }
    }

    /// Every signal unavailable (pipeline always reports "no term detected")
    pub fn unavailable() -> Self {
        Self {
            text: Arc::new(StaticRecognizer::unavailable(SourceKind::Text)),
            object: Arc::new(StaticRecognizer::unavailable(SourceKind::Object)),
            scene: Arc::new(StaticRecognizer::unavailable(SourceKind::Scene)),
        }
    }

    /// Adapter for a signal
    pub fn get(&self, kind: SourceKind) -> &Arc<dyn Recognizer> {
        match kind {
            SourceKind::Text => &self.text,
            SourceKind::Object => &self.object,
            SourceKind::Scene => &self.scene,
        }
    }
}

fn checked_slot(expected: SourceKind, recognizer: Arc<dyn Recognizer>) -> Arc<dyn Recognizer> {
    if recognizer.kind() == expected {
        recognizer
    } else {
        warn!(
            expected = %expected,
            actual = %recognizer.kind(),
            recognizer = recognizer.name(),
            "Recognizer wired to wrong signal slot; disabling it"
        );
        Arc::new(StaticRecognizer::unavailable(expected))
    }
}
