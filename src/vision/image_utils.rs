// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image inputs accepted by the recognizer and their conversion to RGB

use image::{DynamicImage, Rgb, RgbImage};
use ndarray::{Array2, Array3, ArrayD, Ix2, Ix3};
use std::path::{Path, PathBuf};

use crate::errors::{ensure_exists, LontaraError};

/// An image handed to the recognition pipeline
///
/// The three shapes cover everything the pipeline can consume:
/// - `Path`: an image file on disk (PNG, JPG, WebP, ...)
/// - `Bitmap`: an already decoded image, e.g. a rendered PDF page
/// - `Pixels`: a raw `u8` pixel array, either `(H, W)` grayscale or
///   `(H, W, C)` with 1, 3 or 4 channels
#[derive(Debug, Clone)]
pub enum ImageInput {
    Path(PathBuf),
    Bitmap(DynamicImage),
    Pixels(ArrayD<u8>),
}

impl ImageInput {
    /// Convert the input to an 8-bit RGB image
    ///
    /// Grayscale data is expanded to three identical channels and alpha is
    /// dropped, so the same pixels produce the same RGB image regardless of
    /// which variant carried them.
    pub fn to_rgb(&self) -> Result<RgbImage, LontaraError> {
        let rgb = match self {
            ImageInput::Path(path) => {
                ensure_exists("Image", path)?;
                image::open(path)
                    .map_err(|e| {
                        LontaraError::ImageDecode(format!("{}: {}", path.display(), e))
                    })?
                    .to_rgb8()
            }
            ImageInput::Bitmap(image) => image.to_rgb8(),
            ImageInput::Pixels(pixels) => pixels_to_rgb(pixels)?,
        };

        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(LontaraError::UnsupportedInputType(format!(
                "image has zero area ({}x{})",
                rgb.width(),
                rgb.height()
            )));
        }

        Ok(rgb)
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ImageInput::Path(_) => "path",
            ImageInput::Bitmap(_) => "bitmap",
            ImageInput::Pixels(_) => "pixels",
        }
    }
}

fn pixels_to_rgb(pixels: &ArrayD<u8>) -> Result<RgbImage, LontaraError> {
    match pixels.ndim() {
        2 => {
            let gray = pixels
                .view()
                .into_dimensionality::<Ix2>()
                .map_err(|e| LontaraError::UnsupportedInputType(e.to_string()))?;
            let (h, w) = gray.dim();
            Ok(RgbImage::from_fn(w as u32, h as u32, |x, y| {
                let v = gray[[y as usize, x as usize]];
                Rgb([v, v, v])
            }))
        }
        3 => {
            let hwc = pixels
                .view()
                .into_dimensionality::<Ix3>()
                .map_err(|e| LontaraError::UnsupportedInputType(e.to_string()))?;
            let (h, w, c) = hwc.dim();
            match c {
                1 => Ok(RgbImage::from_fn(w as u32, h as u32, |x, y| {
                    let v = hwc[[y as usize, x as usize, 0]];
                    Rgb([v, v, v])
                })),
                3 | 4 => Ok(RgbImage::from_fn(w as u32, h as u32, |x, y| {
                    let (y, x) = (y as usize, x as usize);
                    Rgb([hwc[[y, x, 0]], hwc[[y, x, 1]], hwc[[y, x, 2]]])
                })),
                other => Err(LontaraError::UnsupportedInputType(format!(
                    "pixel array with {} channels (expected 1, 3 or 4)",
                    other
                ))),
            }
        }
        ndim => Err(LontaraError::UnsupportedInputType(format!(
            "pixel array with {} dimensions (expected HxW or HxWxC)",
            ndim
        ))),
    }
}

impl From<PathBuf> for ImageInput {
    fn from(path: PathBuf) -> Self {
        ImageInput::Path(path)
    }
}

impl From<&Path> for ImageInput {
    fn from(path: &Path) -> Self {
        ImageInput::Path(path.to_path_buf())
    }
}

impl From<&str> for ImageInput {
    fn from(path: &str) -> Self {
        ImageInput::Path(PathBuf::from(path))
    }
}

impl From<DynamicImage> for ImageInput {
    fn from(image: DynamicImage) -> Self {
        ImageInput::Bitmap(image)
    }
}

impl From<RgbImage> for ImageInput {
    fn from(image: RgbImage) -> Self {
        ImageInput::Bitmap(DynamicImage::ImageRgb8(image))
    }
}

impl From<ArrayD<u8>> for ImageInput {
    fn from(pixels: ArrayD<u8>) -> Self {
        ImageInput::Pixels(pixels)
    }
}

impl From<Array3<u8>> for ImageInput {
    fn from(pixels: Array3<u8>) -> Self {
        ImageInput::Pixels(pixels.into_dyn())
    }
}

impl From<Array2<u8>> for ImageInput {
    fn from(pixels: Array2<u8>) -> Self {
        ImageInput::Pixels(pixels.into_dyn())
    }
}
