//! Inference pipeline integration tests
//!
//! Drive `InferencePipeline` through the public library API with in-test
//! recognizers (static, slow, panicking).

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use snapcart_ai::extractors::{RecognizerSet, StaticRecognizer};
use snapcart_ai::fusion::{Taxonomy, TaxonomyEntry};
use snapcart_ai::types::{
    InferenceOutcome, ProductCategory, RecognitionCandidate, RecognitionError, Recognizer,
    SourceKind,
};
use snapcart_ai::utils::DecodedImage;
use snapcart_ai::workflow::{InferencePipeline, PipelineConfig, PipelineEvent};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn test_image() -> Arc<DecodedImage> {
    Arc::new(DecodedImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(8, 8))))
}

fn fixed(kind: SourceKind, labels: &[(&str, f32)]) -> Arc<dyn Recognizer> {
    Arc::new(StaticRecognizer::from_labels(kind, labels))
}

fn empty(kind: SourceKind) -> Arc<dyn Recognizer> {
    Arc::new(StaticRecognizer::empty(kind))
}

/// "coat" occurs inside "overcoat" and "raincoat"; "jacket" matches only itself
fn jacket_taxonomy() -> Arc<Taxonomy> {
    Arc::new(Taxonomy::new(vec![
        TaxonomyEntry::new(
            "Jacket",
            ProductCategory::Clothing,
            &["bomber", "coat", "overcoat", "raincoat", "denim"],
        ),
        TaxonomyEntry::new("Mug", ProductCategory::Kitchen, &["cup"]),
    ]))
}

/// Sleeps, then returns one label; records whether it ran to completion
struct SlowRecognizer {
    kind: SourceKind,
    delay: Duration,
    label: &'static str,
    finished: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl SlowRecognizer {
    fn new(kind: SourceKind, delay: Duration, label: &'static str) -> Self {
        Self {
            kind,
            delay,
            label,
            finished: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Recognizer for SlowRecognizer {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn name(&self) -> &str {
        "slow"
    }

    async fn recognize(
        &self,
        _image: &DecodedImage,
    ) -> Result<Vec<RecognitionCandidate>, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok(vec![RecognitionCandidate::new(self.label, 0.95, self.kind).in_region(0)])
    }
}

struct PanickingRecognizer(SourceKind);

#[async_trait]
impl Recognizer for PanickingRecognizer {
    fn kind(&self) -> SourceKind {
        self.0
    }

    fn name(&self) -> &str {
        "panicking"
    }

    async fn recognize(
        &self,
        _image: &DecodedImage,
    ) -> Result<Vec<RecognitionCandidate>, RecognitionError> {
        panic!("recognizer crashed");
    }
}

#[tokio::test]
async fn coat_expands_and_cuts_alphabetically() {
    let recognizers = RecognizerSet::new(
        empty(SourceKind::Text),
        fixed(SourceKind::Object, &[("Jacket", 0.9), ("coat, overcoat", 0.8)]),
        empty(SourceKind::Scene),
    );

    // Matched set: Coat, Jacket, overcoat, raincoat
    let quick = InferencePipeline::new(
        recognizers.clone(),
        jacket_taxonomy(),
        PipelineConfig::quick_search(),
    );
    let result = quick.infer(test_image()).await.result().cloned().unwrap();
    assert_eq!(result.search_term, "Coat Jacket Overcoat");
    assert_eq!(result.category_guess, None);

    let catalog = InferencePipeline::new(recognizers, jacket_taxonomy(), PipelineConfig::catalog());
    let result = catalog.infer(test_image()).await.result().cloned().unwrap();
    assert_eq!(result.search_term, "Coat Jacket Overcoat Raincoat");
    assert_eq!(result.category_guess, Some(ProductCategory::Clothing));
}

#[tokio::test]
async fn unrelated_keywords_of_an_entry_are_not_added() {
    let recognizers = RecognizerSet::new(
        empty(SourceKind::Text),
        fixed(SourceKind::Object, &[("Jacket", 0.9)]),
        empty(SourceKind::Scene),
    );
    let pipeline = InferencePipeline::new(recognizers, jacket_taxonomy(), PipelineConfig::catalog());

    let result = pipeline.infer(test_image()).await.result().cloned().unwrap();
    assert_eq!(result.search_term, "Jacket");
    assert_eq!(result.category_guess, Some(ProductCategory::Clothing));
}

#[tokio::test]
async fn text_signal_is_tokenized_and_stripped() {
    let recognizers = RecognizerSet::new(
        fixed(SourceKind::Text, &[("Nike Air!!", 0.7), ("ignored", 0.6)]),
        empty(SourceKind::Object),
        empty(SourceKind::Scene),
    );
    let pipeline = InferencePipeline::new(
        recognizers,
        Arc::new(Taxonomy::empty()),
        PipelineConfig::quick_search(),
    );

    let result = pipeline.infer(test_image()).await.result().cloned().unwrap();
    assert_eq!(result.search_term, "Air Nike");
}

#[tokio::test]
async fn duplicate_terms_across_signals_merge() {
    let recognizers = RecognizerSet::new(
        fixed(SourceKind::Text, &[("NIKE", 0.9)]),
        fixed(SourceKind::Object, &[("nike", 0.8)]),
        fixed(SourceKind::Scene, &[("Nike", 0.9)]),
    );
    let pipeline = InferencePipeline::new(
        recognizers,
        Arc::new(Taxonomy::empty()),
        PipelineConfig::catalog(),
    );

    let result = pipeline.infer(test_image()).await.result().cloned().unwrap();
    assert_eq!(result.search_term, "Nike");
    assert_eq!(result.category_guess, Some(ProductCategory::Other));
}

#[tokio::test]
async fn low_confidence_everywhere_is_no_term_detected() {
    let recognizers = RecognizerSet::new(
        fixed(SourceKind::Text, &[("Logo", 0.6)]),
        fixed(SourceKind::Object, &[("Cup", 0.3)]),
        fixed(SourceKind::Scene, &[("Kitchen", 0.5)]),
    );
    let pipeline = InferencePipeline::new(recognizers, jacket_taxonomy(), PipelineConfig::catalog());

    assert_eq!(pipeline.infer(test_image()).await, InferenceOutcome::NoTermDetected);
}

#[tokio::test]
async fn unavailable_adapters_degrade_gracefully() {
    let pipeline = InferencePipeline::new(
        RecognizerSet::unavailable(),
        jacket_taxonomy(),
        PipelineConfig::catalog(),
    );
    assert_eq!(pipeline.infer(test_image()).await, InferenceOutcome::NoTermDetected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn adapters_run_concurrently() {
    let delay = Duration::from_millis(200);
    let recognizers = RecognizerSet::new(
        Arc::new(SlowRecognizer::new(SourceKind::Text, delay, "Acme")),
        Arc::new(SlowRecognizer::new(SourceKind::Object, delay, "Kettle")),
        Arc::new(SlowRecognizer::new(SourceKind::Scene, delay, "Kitchen")),
    );
    let pipeline = InferencePipeline::new(
        recognizers,
        Arc::new(Taxonomy::empty()),
        PipelineConfig::quick_search(),
    );

    let started = Instant::now();
    let result = pipeline.infer(test_image()).await.result().cloned().unwrap();
    let elapsed = started.elapsed();

    assert_eq!(result.search_term, "Acme Kettle Kitchen");
    assert!(
        elapsed < Duration::from_millis(550),
        "three 200ms adapters took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn cancellation_discards_in_flight_work() {
    let slow = SlowRecognizer::new(SourceKind::Object, Duration::from_millis(200), "Kettle");
    let finished = Arc::clone(&slow.finished);
    let recognizers = RecognizerSet::new(
        fixed(SourceKind::Text, &[("Acme", 0.9)]),
        Arc::new(slow),
        empty(SourceKind::Scene),
    );

    let (tx, mut rx) = mpsc::channel(64);
    let pipeline = InferencePipeline::with_events(
        recognizers,
        Arc::new(Taxonomy::empty()),
        PipelineConfig::quick_search(),
        tx,
    );

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        trigger.cancel();
    });

    let outcome = pipeline.infer_with_cancel(test_image(), &cancel).await;
    assert_eq!(outcome, InferenceOutcome::Cancelled);

    // The aborted adapter never completes its sleep
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!finished.load(Ordering::SeqCst));

    drop(pipeline);
    let mut saw_cancel = false;
    let mut signals = 0;
    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::Cancelled => saw_cancel = true,
            PipelineEvent::SignalCompleted { .. } => signals += 1,
            PipelineEvent::StageEntered { .. } => {}
        }
    }
    assert!(saw_cancel);
    assert_eq!(signals, 0, "no partial signal results after cancel");
}

#[tokio::test]
async fn dropping_the_future_aborts_adapters() {
    let slow = SlowRecognizer::new(SourceKind::Scene, Duration::from_millis(200), "Kitchen");
    let finished = Arc::clone(&slow.finished);
    let pipeline = InferencePipeline::new(
        RecognizerSet::new(empty(SourceKind::Text), empty(SourceKind::Object), Arc::new(slow)),
        Arc::new(Taxonomy::empty()),
        PipelineConfig::quick_search(),
    );

    let abandoned = tokio::time::timeout(Duration::from_millis(30), pipeline.infer(test_image())).await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn timed_out_adapter_contributes_nothing() {
    let slow = SlowRecognizer::new(SourceKind::Object, Duration::from_secs(5), "Kettle");
    let calls = Arc::clone(&slow.calls);
    let recognizers = RecognizerSet::new(
        fixed(SourceKind::Text, &[("Acme", 0.9)]),
        Arc::new(slow),
        fixed(SourceKind::Scene, &[("Office", 0.8)]),
    );
    let config = PipelineConfig::quick_search().with_signal_timeout(Some(Duration::from_millis(100)));
    let pipeline = InferencePipeline::new(recognizers, Arc::new(Taxonomy::empty()), config);

    let started = Instant::now();
    let result = pipeline.infer(test_image()).await.result().cloned().unwrap();

    assert_eq!(result.search_term, "Acme Office");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn panicking_adapter_is_isolated() {
    let recognizers = RecognizerSet::new(
        Arc::new(PanickingRecognizer(SourceKind::Text)),
        fixed(SourceKind::Object, &[("Mug", 0.9)]),
        empty(SourceKind::Scene),
    );
    let pipeline = InferencePipeline::new(recognizers, jacket_taxonomy(), PipelineConfig::catalog());

    let result = pipeline.infer(test_image()).await.result().cloned().unwrap();
    assert_eq!(result.search_term, "Mug");
    assert_eq!(result.category_guess, Some(ProductCategory::Kitchen));
}

#[tokio::test]
async fn pipeline_is_reusable_and_deterministic() {
    let recognizers = RecognizerSet::new(
        fixed(SourceKind::Text, &[("Acme", 0.9)]),
        fixed(SourceKind::Object, &[("Jacket", 0.9), ("Mug", 0.8), ("Coat", 0.7), ("Scarf", 0.2)]),
        fixed(SourceKind::Scene, &[("Store", 0.9), ("Street", 0.6), ("Mall", 0.95)]),
    );
    let pipeline = Arc::new(InferencePipeline::new(
        recognizers,
        jacket_taxonomy(),
        PipelineConfig::catalog(),
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move { pipeline.infer(test_image()).await }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }
    assert!(outcomes.windows(2).all(|w| w[0] == w[1]));

    let result = outcomes[0].result().unwrap();
    assert_eq!(result.search_term, "Acme Coat Jacket Mall Mug");
    assert_eq!(result.category_guess, Some(ProductCategory::Clothing));
}

#[tokio::test]
async fn undrained_event_channel_does_not_block_cancel() {
    let slow = SlowRecognizer::new(SourceKind::Object, Duration::from_secs(5), "Kettle");
    let recognizers = RecognizerSet::new(empty(SourceKind::Text), Arc::new(slow), empty(SourceKind::Scene));

    // Capacity 1 and never read: every event after the first finds it full
    let (tx, _rx) = mpsc::channel(1);
    let pipeline = InferencePipeline::with_events(
        recognizers,
        Arc::new(Taxonomy::empty()),
        PipelineConfig::quick_search(),
        tx,
    );

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(2),
        pipeline.infer_with_cancel(test_image(), &cancel),
    )
    .await
    .expect("cancelled inference must return promptly");
    assert_eq!(outcome, InferenceOutcome::Cancelled);
}

#[tokio::test]
async fn undrained_event_channel_does_not_block_completion() {
    let recognizers = RecognizerSet::new(
        fixed(SourceKind::Text, &[("Acme", 0.9)]),
        empty(SourceKind::Object),
        empty(SourceKind::Scene),
    );
    let (tx, _rx) = mpsc::channel(1);
    let pipeline = InferencePipeline::with_events(
        recognizers,
        Arc::new(Taxonomy::empty()),
        PipelineConfig::quick_search(),
        tx,
    );

    let outcome = tokio::time::timeout(Duration::from_secs(2), pipeline.infer(test_image()))
        .await
        .expect("inference must not wait on observers");
    assert_eq!(outcome.result().unwrap().search_term, "Acme");
}
