// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Orchestrator tests with a mocked generative client
//!
//! The recognizer and rasterizer stubs encode the page number in the page
//! width, so the recognized text shows which pages were read and in what
//! order.

use aksara_lontara::llm::GenerativeClient;
use aksara_lontara::vision::{DocumentRasterizer, ImageInput, PageIter};
use aksara_lontara::{LontaraError, Recognizer, TranslationOrchestrator, TranslationRecord};
use async_trait::async_trait;
use image::DynamicImage;
use mockall::mock;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const GOOD_REPLY: &str =
    "```json\n{\"aksara\": \"ᨕᨁ\", \"latin\": \"aga\", \"indonesia\": \"apa\"}\n```";

mock! {
    pub Gemini {}

    #[async_trait]
    impl GenerativeClient for Gemini {
        async fn generate(&self, model: &str, prompt: &str) -> Result<String, LontaraError>;
    }
}

/// Reads back the page number a [`PageRasterizer`] encoded as the width
#[derive(Default)]
struct WidthRecognizer {
    calls: AtomicUsize,
}

impl Recognizer for WidthRecognizer {
    fn recognize(&self, input: &ImageInput) -> Result<String, LontaraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rgb = input.to_rgb()?;
        Ok(format!("page{}", rgb.width()))
    }
}

struct FailingRecognizer;

impl Recognizer for FailingRecognizer {
    fn recognize(&self, _input: &ImageInput) -> Result<String, LontaraError> {
        Err(LontaraError::InferenceFailure("session closed".into()))
    }
}

/// Yields `pages` blank bitmaps; page `n` is `n` pixels wide
struct PageRasterizer {
    pages: u32,
    fail_at: Option<u32>,
}

impl PageRasterizer {
    fn with_pages(pages: u32) -> Self {
        Self {
            pages,
            fail_at: None,
        }
    }
}

impl DocumentRasterizer for PageRasterizer {
    fn pages<'a>(&'a self, path: &Path) -> Result<PageIter<'a>, LontaraError> {
        if !path.to_string_lossy().ends_with(".pdf") {
            return Err(LontaraError::not_found("PDF", path));
        }
        let fail_at = self.fail_at;
        Ok(Box::new((1..=self.pages).map(move |n| {
            if Some(n) == fail_at {
                Err(LontaraError::DocumentFailure(format!("render page {} failed", n)))
            } else {
                Ok(DynamicImage::new_rgb8(n, 10))
            }
        })))
    }
}

fn orchestrator(
    recognizer: Arc<dyn Recognizer>,
    rasterizer: PageRasterizer,
    client: MockGemini,
) -> TranslationOrchestrator {
    TranslationOrchestrator::new(recognizer, Arc::new(rasterizer), Arc::new(client), DEFAULT_MODEL)
}

#[tokio::test]
async fn test_translate_text_uses_default_model() {
    let mut client = MockGemini::new();
    client
        .expect_generate()
        .withf(|model, prompt| model == DEFAULT_MODEL && prompt.contains("ᨕᨁ"))
        .times(1)
        .returning(|_, _| Ok(GOOD_REPLY.to_string()));

    let orchestrator = orchestrator(
        Arc::new(WidthRecognizer::default()),
        PageRasterizer::with_pages(0),
        client,
    );
    let record = orchestrator.translate_text("ᨕᨁ", None).await.unwrap();
    assert_eq!(record, TranslationRecord::new("ᨕᨁ", "aga", "apa"));
}

#[tokio::test]
async fn test_model_override_is_per_call() {
    let mut client = MockGemini::new();
    client
        .expect_generate()
        .withf(|model, _| model == "gemini-2.5-pro")
        .times(1)
        .returning(|_, _| Ok(GOOD_REPLY.to_string()));
    client
        .expect_generate()
        .withf(|model, _| model == DEFAULT_MODEL)
        .times(1)
        .returning(|_, _| Ok(GOOD_REPLY.to_string()));

    let orchestrator = orchestrator(
        Arc::new(WidthRecognizer::default()),
        PageRasterizer::with_pages(0),
        client,
    );
    orchestrator
        .translate_text("ᨕᨁ", Some("gemini-2.5-pro"))
        .await
        .unwrap();
    orchestrator.translate_text("ᨕᨁ", None).await.unwrap();
    assert_eq!(orchestrator.default_model(), DEFAULT_MODEL);
}

#[tokio::test]
async fn test_malformed_reply_becomes_empty_record() {
    let mut client = MockGemini::new();
    client
        .expect_generate()
        .times(1)
        .returning(|_, _| Ok("{\"aksara\": \"ᨕ".to_string()));

    let orchestrator = orchestrator(
        Arc::new(WidthRecognizer::default()),
        PageRasterizer::with_pages(0),
        client,
    );
    let record = orchestrator.translate_text("ᨕᨁ", None).await.unwrap();
    assert_eq!(record, TranslationRecord::empty());
}

#[tokio::test]
async fn test_service_failure_propagates() {
    let mut client = MockGemini::new();
    client
        .expect_generate()
        .times(1)
        .returning(|_, _| Err(LontaraError::ExternalServiceFailure("503".into())));

    let orchestrator = orchestrator(
        Arc::new(WidthRecognizer::default()),
        PageRasterizer::with_pages(0),
        client,
    );
    let result = orchestrator.translate_text("ᨕᨁ", None).await;
    assert!(matches!(result, Err(LontaraError::ExternalServiceFailure(_))));
}

#[tokio::test]
async fn test_translate_image_sends_recognized_text() {
    let mut client = MockGemini::new();
    client
        .expect_generate()
        .withf(|_, prompt| prompt.contains("Input Lontara text:\npage7\n"))
        .times(1)
        .returning(|_, _| Ok(GOOD_REPLY.to_string()));

    let orchestrator = orchestrator(
        Arc::new(WidthRecognizer::default()),
        PageRasterizer::with_pages(0),
        client,
    );
    let record = orchestrator
        .translate_image(DynamicImage::new_rgb8(7, 10), None)
        .await
        .unwrap();
    assert_eq!(record.latin, "aga");
}

#[tokio::test]
async fn test_unsupported_image_never_reaches_model() {
    let mut client = MockGemini::new();
    client.expect_generate().times(0);

    let orchestrator = orchestrator(
        Arc::new(WidthRecognizer::default()),
        PageRasterizer::with_pages(0),
        client,
    );
    let scalar = ndarray::arr0(3u8).into_dyn();
    let result = orchestrator.translate_image(scalar, None).await;
    assert!(matches!(result, Err(LontaraError::UnsupportedInputType(_))));
}

#[tokio::test]
async fn test_zero_page_document_skips_model() {
    let mut client = MockGemini::new();
    client.expect_generate().times(0);

    let recognizer = Arc::new(WidthRecognizer::default());
    let orchestrator = orchestrator(recognizer.clone(), PageRasterizer::with_pages(0), client);

    let record = orchestrator
        .translate_document("empty.pdf", None)
        .await
        .unwrap();
    assert_eq!(record, TranslationRecord::empty());
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_pages_joined_in_order() {
    let mut client = MockGemini::new();
    client
        .expect_generate()
        .withf(|_, prompt| prompt.contains("page1\npage2"))
        .times(1)
        .returning(|_, _| Ok(GOOD_REPLY.to_string()));

    let recognizer = Arc::new(WidthRecognizer::default());
    let orchestrator = orchestrator(recognizer.clone(), PageRasterizer::with_pages(2), client);

    let record = orchestrator
        .translate_document("naskah.pdf", Some("gemini-2.5-pro"))
        .await
        .unwrap();
    assert_eq!(record.indonesia, "apa");
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_page_failure_aborts_document() {
    let mut client = MockGemini::new();
    client.expect_generate().times(0);

    let orchestrator = orchestrator(
        Arc::new(WidthRecognizer::default()),
        PageRasterizer {
            pages: 3,
            fail_at: Some(2),
        },
        client,
    );
    let result = orchestrator.translate_document("naskah.pdf", None).await;
    assert!(matches!(result, Err(LontaraError::DocumentFailure(_))));
}

#[tokio::test]
async fn test_recognition_failure_propagates() {
    let mut client = MockGemini::new();
    client.expect_generate().times(0);

    let orchestrator = orchestrator(
        Arc::new(FailingRecognizer),
        PageRasterizer::with_pages(1),
        client,
    );
    let result = orchestrator.translate_document("naskah.pdf", None).await;
    assert!(matches!(result, Err(LontaraError::InferenceFailure(_))));
}

#[tokio::test]
async fn test_missing_document() {
    let mut client = MockGemini::new();
    client.expect_generate().times(0);

    let orchestrator = orchestrator(
        Arc::new(WidthRecognizer::default()),
        PageRasterizer::with_pages(2),
        client,
    );
    let result = orchestrator.translate_document("naskah.docx", None).await;
    assert!(matches!(result, Err(LontaraError::ResourceNotFound { .. })));
}

#[test]
fn test_recognize_only_paths() {
    let orchestrator = orchestrator(
        Arc::new(WidthRecognizer::default()),
        PageRasterizer::with_pages(3),
        MockGemini::new(),
    );
    assert_eq!(
        orchestrator.recognize_document("naskah.pdf").unwrap(),
        "page1\npage2\npage3"
    );
    assert_eq!(
        orchestrator
            .recognize_image(DynamicImage::new_rgb8(4, 4))
            .unwrap(),
        "page4"
    );
}
