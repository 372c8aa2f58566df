// Remote Recognizer - HTTP Classification Service Adapter
//
// POSTs the photo (base64 PNG) to a classifier endpoint and maps the JSON
// reply to recognition candidates. Every failure stays adapter-local.

use crate::types::{RecognitionCandidate, RecognitionError, Recognizer, SourceKind};
use crate::utils::image_decoder::DecodedImage;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    kind: SourceKind,
    image: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    candidates: Vec<RemoteCandidate>,
}

#[derive(Debug, Deserialize)]
struct RemoteCandidate {
    label: String,
    confidence: f32,
    #[serde(default)]
    region: Option<u32>,
}

pub struct RemoteRecognizer {
    kind: SourceKind,
    name: String,
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteRecognizer {
    /// Create adapter for one signal
    ///
    /// # Errors
    /// Fails only if the HTTP client cannot be built (TLS backend init).
    pub fn new(
        kind: SourceKind,
        endpoint: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, RecognitionError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| RecognitionError::Internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            kind,
            name: format!("remote-{}", kind),
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Recognizer for RemoteRecognizer {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn recognize(
        &self,
        image: &DecodedImage,
    ) -> Result<Vec<RecognitionCandidate>, RecognitionError> {
        let png = image
            .to_png_bytes()
            .map_err(|e| RecognitionError::Decode(e.to_string()))?;
        let encoded = STANDARD.encode(png);

        debug!(
            recognizer = %self.name,
            endpoint = %self.endpoint,
            payload_bytes = encoded.len(),
            "Posting image to recognition service"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&RecognizeRequest {
                kind: self.kind,
                image: &encoded,
            })
            .send()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RecognitionError::Api(format!(
                "{} returned {}",
                self.endpoint,
                response.status()
            )));
        }

        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::Parse(e.to_string()))?;

        Ok(body
            .candidates
            .into_iter()
            .map(|c| {
                let candidate = RecognitionCandidate::new(c.label, c.confidence, self.kind);
                match c.region {
                    Some(region) => candidate.in_region(region),
                    None => candidate,
                }
            })
            .collect())
    }
}
