// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types shared by the recognition and translation pipeline

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by recognition, rasterization and translation
///
/// Every variant propagates unmodified to the caller. Malformed model replies
/// are the one failure that never appears here: see
/// [`MalformedResponse`](crate::translation::MalformedResponse).
#[derive(Debug, Error)]
pub enum LontaraError {
    #[error("{what} not found: {}", path.display())]
    ResourceNotFound { what: &'static str, path: PathBuf },

    #[error("Unsupported image input: {0}")]
    UnsupportedInputType(String),

    #[error("Character index {index} out of range for dictionary of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Document rendering failed: {0}")]
    DocumentFailure(String),

    #[error("Recognition inference failed: {0}")]
    InferenceFailure(String),

    #[error("Generative language service failed: {0}")]
    ExternalServiceFailure(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LontaraError {
    pub fn not_found(what: &'static str, path: impl AsRef<Path>) -> Self {
        LontaraError::ResourceNotFound {
            what,
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Fail with `ResourceNotFound` unless `path` exists
pub(crate) fn ensure_exists(what: &'static str, path: &Path) -> Result<(), LontaraError> {
    if path.exists() {
        Ok(())
    } else {
        Err(LontaraError::not_found(what, path))
    }
}
