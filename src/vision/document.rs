// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PDF page rasterization for document OCR

use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{ensure_exists, LontaraError};

/// Default page upscaling factor; glyphs recognize better at 2x
pub const DEFAULT_RENDER_SCALE: f32 = 2.0;

/// Lazily rendered pages of one document, in page order
pub type PageIter<'a> = Box<dyn Iterator<Item = Result<DynamicImage, LontaraError>> + 'a>;

/// Renders every page of a paged document to a bitmap
///
/// A returned iterator is consumed once; call `pages` again to start over.
pub trait DocumentRasterizer: Send + Sync {
    fn pages<'a>(&'a self, path: &Path) -> Result<PageIter<'a>, LontaraError>;
}

/// Rasterizer configuration
#[derive(Debug, Clone)]
pub struct RasterizerConfig {
    /// Scale factor applied to every page
    pub render_scale: f32,
    /// Directory holding the Pdfium shared library; `None` uses the system library
    pub library_dir: Option<PathBuf>,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            render_scale: DEFAULT_RENDER_SCALE,
            library_dir: None,
        }
    }
}

/// Pdfium-backed PDF rasterizer
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
    render_scale: f32,
}

impl std::fmt::Debug for PdfiumRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumRasterizer")
            .field("render_scale", &self.render_scale)
            .finish_non_exhaustive()
    }
}

impl PdfiumRasterizer {
    /// Bind the Pdfium library once for the lifetime of the rasterizer
    pub fn new(config: RasterizerConfig) -> Result<Self, LontaraError> {
        let bindings = match &config.library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| LontaraError::DocumentFailure(format!("pdfium bind failed: {}", e)))?;

        info!("Pdfium bound, rendering pages at {}x", config.render_scale);

        Ok(Self {
            pdfium: Pdfium::new(bindings),
            render_scale: config.render_scale,
        })
    }
}

impl DocumentRasterizer for PdfiumRasterizer {
    fn pages<'a>(&'a self, path: &Path) -> Result<PageIter<'a>, LontaraError> {
        ensure_exists("PDF", path)?;

        let document = self.pdfium.load_pdf_from_file(path, None).map_err(|e| {
            LontaraError::DocumentFailure(format!("pdfium open {} failed: {}", path.display(), e))
        })?;
        let count = document.pages().len();
        debug!("Opened {} ({} pages)", path.display(), count);

        Ok(Box::new(RenderedPages {
            document,
            render_config: PdfRenderConfig::new().scale_page_by_factor(self.render_scale),
            next: 0,
            count,
        }))
    }
}

struct RenderedPages<'a> {
    document: PdfDocument<'a>,
    render_config: PdfRenderConfig,
    next: u16,
    count: u16,
}

impl Iterator for RenderedPages<'_> {
    type Item = Result<DynamicImage, LontaraError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let rendered = self
            .document
            .pages()
            .get(index)
            .map_err(|e| {
                LontaraError::DocumentFailure(format!("page {} access failed: {}", index, e))
            })
            .and_then(|page| {
                page.render_with_config(&self.render_config)
                    .map(|bitmap| bitmap.as_image())
                    .map_err(|e| {
                        LontaraError::DocumentFailure(format!(
                            "render page {} failed: {}",
                            index, e
                        ))
                    })
            });

        Some(rendered)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}
