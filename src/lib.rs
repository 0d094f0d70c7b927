// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod errors;
pub mod llm;
pub mod translation;
pub mod vision;

pub use config::LontaraConfig;
pub use errors::LontaraError;
pub use llm::{GeminiClient, GenerativeClient};
pub use translation::{TranslationOrchestrator, TranslationRecord};
pub use vision::ocr::{CharacterTable, ImageNormalizer, OnnxRecognizer, Recognizer};
pub use vision::{DocumentRasterizer, ImageInput, PdfiumRasterizer};
