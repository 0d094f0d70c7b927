// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod gemini_client;
pub mod prompts;

pub use gemini_client::{
    GeminiClient, GenerativeClient, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL,
};
pub use prompts::translate_text_prompt;
