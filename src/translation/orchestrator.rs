// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sequences OCR, prompting and the generative call for each input kind

use anyhow::{Context, Result as AnyResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::coercer::coerce;
use super::record::TranslationRecord;
use crate::config::LontaraConfig;
use crate::errors::LontaraError;
use crate::llm::{translate_text_prompt, GeminiClient, GenerativeClient};
use crate::vision::ocr::{OnnxRecognizer, Recognizer};
use crate::vision::{DocumentRasterizer, ImageInput, PdfiumRasterizer};

/// Entry point for text, image and document translation
///
/// Every collaborator is shared and immutable, so one orchestrator can
/// serve concurrent requests. The model can be overridden per call.
pub struct TranslationOrchestrator {
    recognizer: Arc<dyn Recognizer>,
    rasterizer: Arc<dyn DocumentRasterizer>,
    client: Arc<dyn GenerativeClient>,
    default_model: String,
}

impl std::fmt::Debug for TranslationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationOrchestrator")
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

impl TranslationOrchestrator {
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        rasterizer: Arc<dyn DocumentRasterizer>,
        client: Arc<dyn GenerativeClient>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            recognizer,
            rasterizer,
            client,
            default_model: default_model.into(),
        }
    }

    /// Load the OCR model, bind Pdfium and configure the Gemini client
    pub fn from_config(config: &LontaraConfig) -> AnyResult<Self> {
        let api_key = config.require_api_key()?;

        let recognizer = OnnxRecognizer::new(
            &config.ocr_model_path,
            &config.ocr_dict_path,
            config.recognizer_config(),
        )
        .context("Failed to load OCR recognizer")?;
        let rasterizer = PdfiumRasterizer::new(config.rasterizer_config())
            .context("Failed to initialize PDF rasterizer")?;
        let client = GeminiClient::new(&config.gemini_endpoint, api_key, config.request_timeout())
            .context("Failed to create Gemini client")?;

        Ok(Self::new(
            Arc::new(recognizer),
            Arc::new(rasterizer),
            Arc::new(client),
            config.model_name.clone(),
        ))
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Transliterate and translate Lontara text
    ///
    /// Only a malformed model reply is absorbed (as the empty record);
    /// service failures are returned.
    pub async fn translate_text(
        &self,
        text: &str,
        model: Option<&str>,
    ) -> Result<TranslationRecord, LontaraError> {
        let model = model.unwrap_or(&self.default_model);
        let start = Instant::now();

        let prompt = translate_text_prompt(text);
        debug!("Prompt for {}: {} chars", model, prompt.len());

        let reply = self.client.generate(model, &prompt).await?;
        let record = coerce(&reply);

        info!(
            "Translated {} chars of Lontara with {} in {}ms",
            text.chars().count(),
            model,
            start.elapsed().as_millis()
        );
        Ok(record)
    }

    /// Recognize the Lontara in a single image, then translate it
    pub async fn translate_image(
        &self,
        image: impl Into<ImageInput>,
        model: Option<&str>,
    ) -> Result<TranslationRecord, LontaraError> {
        let text = self.recognize_image(image)?;
        self.translate_text(&text, model).await
    }

    /// Recognize every page of a document, then translate the joined text
    ///
    /// A document with no pages yields the empty record without calling the
    /// model.
    pub async fn translate_document(
        &self,
        path: impl AsRef<Path>,
        model: Option<&str>,
    ) -> Result<TranslationRecord, LontaraError> {
        match self.recognize_pages(path.as_ref())? {
            Some(text) => self.translate_text(&text, model).await,
            None => Ok(TranslationRecord::empty()),
        }
    }

    /// OCR only: the recognized text of one image
    pub fn recognize_image(&self, image: impl Into<ImageInput>) -> Result<String, LontaraError> {
        let input = image.into();
        let text = self.recognizer.recognize(&input)?;
        debug!("Recognized {} chars from {} input", text.chars().count(), input.kind());
        Ok(text)
    }

    /// OCR only: page texts joined with newlines, trimmed
    pub fn recognize_document(&self, path: impl AsRef<Path>) -> Result<String, LontaraError> {
        Ok(self.recognize_pages(path.as_ref())?.unwrap_or_default())
    }

    /// `None` when the document has no pages
    fn recognize_pages(&self, path: &Path) -> Result<Option<String>, LontaraError> {
        let mut texts = Vec::new();
        for (index, page) in self.rasterizer.pages(path)?.enumerate() {
            let text = self.recognizer.recognize(&page?.into())?;
            debug!("Page {}: {} chars", index + 1, text.chars().count());
            texts.push(text);
        }

        if texts.is_empty() {
            debug!("{} has no pages", path.display());
            return Ok(None);
        }
        info!("Recognized {} pages of {}", texts.len(), path.display());
        Ok(Some(texts.join("\n").trim().to_string()))
    }
}
