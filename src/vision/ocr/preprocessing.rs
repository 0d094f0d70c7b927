// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the Lontara recognition model

use image::imageops::FilterType;
use image::RgbImage;
use ndarray::Array4;
use serde::{Deserialize, Serialize};

use crate::errors::LontaraError;
use crate::vision::image_utils::ImageInput;

/// Recognition model input height (PP-OCRv5 rec models use 48)
pub const REC_INPUT_HEIGHT: u32 = 48;

/// Maximum width for recognition model input
pub const REC_MAX_WIDTH: u32 = 320;

/// Geometry of the recognition input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Fixed output height in pixels
    pub height: u32,
    /// Upper bound on output width in pixels
    pub max_width: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            height: REC_INPUT_HEIGHT,
            max_width: REC_MAX_WIDTH,
        }
    }
}

/// Turns any [`ImageInput`] into a `[1, 3, H, W]` tensor in [-1, 1]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer {
    config: NormalizerConfig,
}

impl ImageNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Output width for a source image of `width` x `height`
    ///
    /// The aspect ratio is preserved up to `max_width`; wider lines are
    /// squashed into `max_width` rather than scaled down as a whole.
    pub fn target_width(&self, width: u32, height: u32) -> u32 {
        let ratio = width as f32 / height as f32;
        let new_width = (self.config.height as f32 * ratio).round() as u32;
        new_width.clamp(1, self.config.max_width)
    }

    /// Preprocess an image for recognition
    ///
    /// Steps:
    /// 1. Convert to RGB (grayscale expanded, alpha dropped)
    /// 2. Resize to the fixed height, width from aspect ratio (capped)
    /// 3. Scale to [0, 1], then map to [-1, 1] with `(v - 0.5) / 0.5`
    /// 4. Reorder HWC to CHW and add the batch dimension
    pub fn normalize(&self, input: &ImageInput) -> Result<Array4<f32>, LontaraError> {
        let rgb = input.to_rgb()?;
        Ok(self.normalize_rgb(&rgb))
    }

    fn normalize_rgb(&self, rgb: &RgbImage) -> Array4<f32> {
        let height = self.config.height;
        let width = self.target_width(rgb.width(), rgb.height());

        let resized = image::imageops::resize(rgb, width, height, FilterType::Triangle);

        let mut tensor = Array4::zeros((1, 3, height as usize, width as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                let value = pixel[c] as f32 / 255.0;
                tensor[[0, c, y as usize, x as usize]] = (value - 0.5) / 0.5;
            }
        }

        tensor
    }
}
