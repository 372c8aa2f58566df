// Static Recognizer
//
// Adapter with fixed output. Wired in for signals that have no configured
// backend (always unavailable) and used to replay recorded recognizer output.

use crate::types::{RecognitionCandidate, RecognitionError, Recognizer, SourceKind};
use crate::utils::image_decoder::DecodedImage;
use async_trait::async_trait;

pub struct StaticRecognizer {
    kind: SourceKind,
    name: String,
    output: Option<Vec<RecognitionCandidate>>,
}

impl StaticRecognizer {
    /// Adapter that always returns `candidates`
    pub fn new(kind: SourceKind, candidates: Vec<RecognitionCandidate>) -> Self {
        Self {
            kind,
            name: format!("static-{}", kind),
            output: Some(candidates),
        }
    }

    /// Adapter that returns nothing (successful empty result)
    pub fn empty(kind: SourceKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// Adapter that always fails with `NotAvailable`
    pub fn unavailable(kind: SourceKind) -> Self {
        Self {
            kind,
            name: format!("unavailable-{}", kind),
            output: None,
        }
    }

    /// Convenience: candidates from `(label, confidence)` pairs
    pub fn from_labels(kind: SourceKind, labels: &[(&str, f32)]) -> Self {
        let candidates = labels
            .iter()
            .enumerate()
            .map(|(idx, (label, confidence))| {
                let candidate = RecognitionCandidate::new(*label, *confidence, kind);
                if kind == SourceKind::Text {
                    candidate.in_region(idx as u32)
                } else {
                    candidate
                }
            })
            .collect();
        Self::new(kind, candidates)
    }
}

#[async_trait]
impl Recognizer for StaticRecognizer {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn recognize(
        &self,
        _image: &DecodedImage,
    ) -> Result<Vec<RecognitionCandidate>, RecognitionError> {
        match &self.output {
            Some(candidates) => Ok(candidates.clone()),
            None => Err(RecognitionError::NotAvailable(format!(
                "no {} recognizer configured",
                self.kind
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn image() -> DecodedImage {
        DecodedImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(1, 1)))
    }

    #[tokio::test]
    async fn replays_fixed_candidates() {
        let recognizer = StaticRecognizer::from_labels(SourceKind::Object, &[("mug", 0.8)]);
        let out = recognizer.recognize(&image()).await.unwrap();
        assert_eq!(out, vec![RecognitionCandidate::new("mug", 0.8, SourceKind::Object)]);
    }

    #[tokio::test]
    async fn text_labels_get_one_region_each() {
        let recognizer =
            StaticRecognizer::from_labels(SourceKind::Text, &[("ACME", 0.9), ("Kettle", 0.8)]);
        let out = recognizer.recognize(&image()).await.unwrap();
        assert_eq!(out[0].region, Some(0));
        assert_eq!(out[1].region, Some(1));
    }

    #[tokio::test]
    async fn unavailable_always_fails() {
        let recognizer = StaticRecognizer::unavailable(SourceKind::Scene);
        assert!(matches!(
            recognizer.recognize(&image()).await,
            Err(RecognitionError::NotAvailable(_))
        ));
    }
}
