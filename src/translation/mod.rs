// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lontara transliteration and translation
//!
//! - `record` - The three-field result record
//! - `coercer` - Fence stripping and lenient parsing of model replies
//! - `orchestrator` - Text, image and document entry points

pub mod coercer;
pub mod orchestrator;
pub mod record;

pub use coercer::{clean_json_text, coerce, parse_record, MalformedResponse};
pub use orchestrator::TranslationOrchestrator;
pub use record::TranslationRecord;
