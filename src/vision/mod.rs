// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for Aksara Lontara
//!
//! This module provides:
//! - OCR (text recognition) of single text images via an ONNX model
//! - Rasterization of PDF pages so documents can go through the same OCR

pub mod document;
pub mod image_utils;
pub mod ocr;

pub use document::{DocumentRasterizer, PageIter, PdfiumRasterizer, RasterizerConfig};
pub use image_utils::ImageInput;
