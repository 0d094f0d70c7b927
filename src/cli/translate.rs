// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::LontaraConfig;
use crate::translation::{TranslationOrchestrator, TranslationRecord};
use crate::vision::ocr::{OnnxRecognizer, Recognizer};
use crate::vision::ImageInput;

/// Arguments for the text command
#[derive(Args, Debug)]
pub struct TextArgs {
    /// Lontara text to translate
    pub text: String,

    /// Generative model to use instead of the configured default
    #[arg(long)]
    pub model: Option<String>,
}

/// Arguments for the image command
#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Image file containing one line of Lontara
    pub path: PathBuf,

    /// Generative model to use instead of the configured default
    #[arg(long)]
    pub model: Option<String>,
}

/// Arguments for the pdf command
#[derive(Args, Debug)]
pub struct PdfArgs {
    /// PDF document
    pub path: PathBuf,

    /// Generative model to use instead of the configured default
    #[arg(long)]
    pub model: Option<String>,
}

/// Arguments for the recognize command
#[derive(Args, Debug)]
pub struct RecognizeArgs {
    /// Image file containing one line of Lontara
    pub path: PathBuf,
}

/// TOML file when given, environment otherwise
///
/// An API key missing from the file is still picked up from the environment.
pub fn load_config(path: Option<&Path>) -> Result<LontaraConfig> {
    let config = match path {
        Some(path) => {
            let mut config = LontaraConfig::from_toml_file(path)?;
            if config.gemini_api_key.is_none() {
                config.gemini_api_key = LontaraConfig::from_env().gemini_api_key;
            }
            config
        }
        None => LontaraConfig::from_env(),
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn print_record(record: &TranslationRecord) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

pub async fn translate_text(config: &LontaraConfig, args: TextArgs) -> Result<()> {
    let orchestrator = TranslationOrchestrator::from_config(config)?;
    let record = orchestrator
        .translate_text(&args.text, args.model.as_deref())
        .await?;
    print_record(&record)
}

pub async fn translate_image(config: &LontaraConfig, args: ImageArgs) -> Result<()> {
    let orchestrator = TranslationOrchestrator::from_config(config)?;
    let record = orchestrator
        .translate_image(args.path.as_path(), args.model.as_deref())
        .await
        .with_context(|| format!("Failed to translate {}", args.path.display()))?;
    print_record(&record)
}

pub async fn translate_pdf(config: &LontaraConfig, args: PdfArgs) -> Result<()> {
    let orchestrator = TranslationOrchestrator::from_config(config)?;
    let record = orchestrator
        .translate_document(&args.path, args.model.as_deref())
        .await
        .with_context(|| format!("Failed to translate {}", args.path.display()))?;
    print_record(&record)
}

/// OCR only; needs no API key
pub fn recognize(config: &LontaraConfig, args: RecognizeArgs) -> Result<()> {
    let recognizer = OnnxRecognizer::new(
        &config.ocr_model_path,
        &config.ocr_dict_path,
        config.recognizer_config(),
    )
    .context("Failed to load OCR recognizer")?;

    let text = recognizer
        .recognize(&ImageInput::from(args.path.as_path()))
        .with_context(|| format!("Failed to recognize {}", args.path.display()))?;
    info!("Recognized {} glyphs", text.chars().count());
    println!("{}", text);
    Ok(())
}
