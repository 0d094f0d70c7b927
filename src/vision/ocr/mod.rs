// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lontara text recognition
//!
//! Components:
//! - `dictionary` - Class index to glyph table (index 0 is the CTC blank)
//! - `preprocessing` - Image normalization for the recognition model
//! - `recognition` - ONNX inference and greedy CTC decoding

pub mod dictionary;
pub mod preprocessing;
pub mod recognition;

pub use dictionary::{CharacterTable, BLANK_INDEX};
pub use preprocessing::{ImageNormalizer, NormalizerConfig, REC_INPUT_HEIGHT, REC_MAX_WIDTH};
pub use recognition::{
    collapse_indices, greedy_ctc_decode, OnnxRecognizer, Recognizer, RecognizerConfig,
};
