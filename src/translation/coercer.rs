// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Turns a free-form model reply into a [`TranslationRecord`]

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::record::TranslationRecord;

const FENCE: &str = "```";

/// Why a model reply could not be read as a record
#[derive(Error, Debug)]
pub enum MalformedResponse {
    #[error("reply is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("reply JSON root is not an object")]
    NotAnObject,

    #[error("reply fields have the wrong type: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Strip surrounding whitespace and markdown code fences
///
/// Fence removal only happens when the reply opens with a fence; in that
/// case every fence line (```` ``` ```` or ```` ```json ````) is dropped.
pub fn clean_json_text(raw: &str) -> String {
    let text = raw.trim();
    if !text.starts_with(FENCE) {
        return text.to_string();
    }

    text.lines()
        .filter(|line| !line.trim_start().starts_with(FENCE))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Strict parse of already-cleaned text
pub fn parse_record(text: &str) -> Result<TranslationRecord, MalformedResponse> {
    let value: Value = serde_json::from_str(text).map_err(MalformedResponse::Syntax)?;
    if !value.is_object() {
        return Err(MalformedResponse::NotAnObject);
    }
    serde_json::from_value(value).map_err(MalformedResponse::Shape)
}

/// Clean and parse a reply, falling back to the empty record
pub fn coerce(raw: &str) -> TranslationRecord {
    match parse_record(&clean_json_text(raw)) {
        Ok(record) => record,
        Err(e) => {
            warn!("Discarding malformed model reply ({} chars): {}", raw.len(), e);
            TranslationRecord::empty()
        }
    }
}
