// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration
//!
//! Loaded from environment variables (with `.env` support) or a TOML file.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};
use crate::vision::document::DEFAULT_RENDER_SCALE;
use crate::vision::ocr::{NormalizerConfig, RecognizerConfig, REC_INPUT_HEIGHT, REC_MAX_WIDTH};
use crate::vision::RasterizerConfig;

const DEFAULT_OCR_MODEL_PATH: &str =
    "dir_ocr_models/PP-OCRv5_server_rec_infer/buginese_ocr_model.onnx";
const DEFAULT_OCR_DICT_PATH: &str = "dir_ocr_models/PP-OCRv5_server_rec_infer/lontara_chr.txt";

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LontaraConfig {
    /// Gemini API key; required only for translation
    pub gemini_api_key: Option<String>,

    pub gemini_endpoint: String,

    /// Default generative model, overridable per call
    pub model_name: String,

    /// ONNX recognition model
    pub ocr_model_path: PathBuf,

    /// Glyph dictionary matching the recognition model
    pub ocr_dict_path: PathBuf,

    /// Recognition input height in pixels
    pub img_height: u32,

    /// Recognition input width cap in pixels
    pub max_width: u32,

    pub use_gpu: bool,

    /// PDF page upscaling factor
    pub pdf_render_scale: f32,

    /// Directory containing the Pdfium shared library (system library if unset)
    pub pdfium_library_dir: Option<PathBuf>,

    /// Gemini request timeout; no timeout if unset
    pub request_timeout_secs: Option<u64>,
}

impl Default for LontaraConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model_name: DEFAULT_GEMINI_MODEL.to_string(),
            ocr_model_path: PathBuf::from(DEFAULT_OCR_MODEL_PATH),
            ocr_dict_path: PathBuf::from(DEFAULT_OCR_DICT_PATH),
            img_height: REC_INPUT_HEIGHT,
            max_width: REC_MAX_WIDTH,
            use_gpu: false,
            pdf_render_scale: DEFAULT_RENDER_SCALE,
            pdfium_library_dir: None,
            request_timeout_secs: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl LontaraConfig {
    /// Create configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first. Unset or
    /// unparsable variables keep their defaults.
    ///
    /// Environment variables:
    /// - `GEMINI_API_KEY`, `GEMINI_ENDPOINT`, `GEMINI_MODEL`, `GEMINI_TIMEOUT_SECS`
    /// - `OCR_MODEL_PATH`, `OCR_DICT_PATH`, `OCR_IMG_HEIGHT`, `OCR_MAX_WIDTH`, `OCR_USE_GPU`
    /// - `PDF_RENDER_SCALE`, `PDFIUM_LIBRARY_DIR`
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Self {
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_endpoint: env::var("GEMINI_ENDPOINT").unwrap_or(defaults.gemini_endpoint),
            model_name: env::var("GEMINI_MODEL").unwrap_or(defaults.model_name),
            ocr_model_path: env::var("OCR_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ocr_model_path),
            ocr_dict_path: env::var("OCR_DICT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ocr_dict_path),
            img_height: env_parse("OCR_IMG_HEIGHT").unwrap_or(defaults.img_height),
            max_width: env_parse("OCR_MAX_WIDTH").unwrap_or(defaults.max_width),
            use_gpu: env::var("OCR_USE_GPU")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.use_gpu),
            pdf_render_scale: env_parse("PDF_RENDER_SCALE").unwrap_or(defaults.pdf_render_scale),
            pdfium_library_dir: env::var("PDFIUM_LIBRARY_DIR").ok().map(PathBuf::from),
            request_timeout_secs: env_parse("GEMINI_TIMEOUT_SECS"),
        }
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.img_height == 0 {
            bail!("img_height must be > 0");
        }
        if self.max_width == 0 {
            bail!("max_width must be > 0");
        }
        if !(self.pdf_render_scale > 0.0) {
            bail!("pdf_render_scale must be > 0 (got {})", self.pdf_render_scale);
        }
        if self.model_name.trim().is_empty() {
            bail!("model_name must not be empty");
        }
        Ok(())
    }

    /// The API key, or an error explaining how to set it
    pub fn require_api_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("Missing GEMINI_API_KEY in environment variables"))
    }

    pub fn recognizer_config(&self) -> RecognizerConfig {
        RecognizerConfig {
            normalizer: NormalizerConfig {
                height: self.img_height,
                max_width: self.max_width,
            },
            use_gpu: self.use_gpu,
            ..RecognizerConfig::default()
        }
    }

    pub fn rasterizer_config(&self) -> RasterizerConfig {
        RasterizerConfig {
            render_scale: self.pdf_render_scale,
            library_dir: self.pdfium_library_dir.clone(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
