// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Normalizer input tests
//!
//! The same pixels must produce the same tensor whether they arrive as a
//! file path, a decoded bitmap or a raw pixel array.

use aksara_lontara::vision::ocr::{ImageNormalizer, NormalizerConfig};
use aksara_lontara::vision::ImageInput;
use aksara_lontara::LontaraError;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use ndarray::{Array2, Array3};
use tempfile::TempDir;

fn striped_line(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let ink = if (x / 7) % 2 == 0 && y > 4 && y < height - 4 { 20 } else { 235 };
        Rgb([ink, ink.saturating_add((x % 13) as u8), ink.saturating_sub((y % 5) as u8)])
    })
}

fn to_hwc(image: &RgbImage) -> Array3<u8> {
    let (w, h) = image.dimensions();
    Array3::from_shape_vec((h as usize, w as usize, 3), image.as_raw().clone()).unwrap()
}

#[test]
fn test_path_bitmap_and_pixels_identical() {
    let image = striped_line(150, 40);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line.png");
    image.save(&path).unwrap();

    let normalizer = ImageNormalizer::default();
    let from_path = normalizer.normalize(&ImageInput::from(path.as_path())).unwrap();
    let from_bitmap = normalizer
        .normalize(&DynamicImage::ImageRgb8(image.clone()).into())
        .unwrap();
    let from_pixels = normalizer.normalize(&to_hwc(&image).into()).unwrap();

    assert_eq!(from_path.shape(), &[1, 3, 48, 180]);
    assert_eq!(from_path, from_bitmap);
    assert_eq!(from_bitmap, from_pixels);
}

#[test]
fn test_rgba_pixels_drop_alpha() {
    let image = striped_line(60, 48);
    let rgba = DynamicImage::ImageRgb8(image.clone()).to_rgba8();
    let (w, h) = rgba.dimensions();
    let pixels =
        Array3::from_shape_vec((h as usize, w as usize, 4), rgba.into_raw()).unwrap();

    let normalizer = ImageNormalizer::default();
    let from_rgba = normalizer.normalize(&pixels.into()).unwrap();
    let from_rgb = normalizer.normalize(&image.into()).unwrap();
    assert_eq!(from_rgba, from_rgb);
}

#[test]
fn test_grayscale_pixels_match_gray_bitmap() {
    let gray = GrayImage::from_fn(90, 30, |x, y| Luma([((x * 3 + y) % 256) as u8]));
    let pixels = Array2::from_shape_fn((30, 90), |(y, x)| gray.get_pixel(x as u32, y as u32)[0]);

    let normalizer = ImageNormalizer::default();
    let from_pixels = normalizer.normalize(&pixels.into()).unwrap();
    let from_bitmap = normalizer
        .normalize(&DynamicImage::ImageLuma8(gray).into())
        .unwrap();
    assert_eq!(from_pixels, from_bitmap);
}

#[test]
fn test_output_geometry_bounds() {
    let normalizer = ImageNormalizer::new(NormalizerConfig {
        height: 48,
        max_width: 320,
    });
    for (w, h) in [(1, 1), (10, 300), (48, 48), (319, 48), (5000, 20), (640, 96)] {
        let tensor = normalizer
            .normalize(&DynamicImage::new_rgb8(w, h).into())
            .unwrap();
        assert_eq!(tensor.shape()[0], 1);
        assert_eq!(tensor.shape()[1], 3);
        assert_eq!(tensor.shape()[2], 48);
        assert!(tensor.shape()[3] >= 1 && tensor.shape()[3] <= 320, "{}x{}", w, h);
    }
}

#[test]
fn test_missing_path() {
    let normalizer = ImageNormalizer::default();
    let result = normalizer.normalize(&ImageInput::from("/nonexistent/line.png"));
    assert!(matches!(result, Err(LontaraError::ResourceNotFound { .. })));
}

#[test]
fn test_undecodable_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line.png");
    std::fs::write(&path, b"not an image").unwrap();

    let normalizer = ImageNormalizer::default();
    let result = normalizer.normalize(&ImageInput::from(path.as_path()));
    assert!(matches!(result, Err(LontaraError::ImageDecode(_))));
}

#[test]
fn test_unsupported_arrays() {
    let normalizer = ImageNormalizer::default();

    let scalar = ndarray::arr0(1u8).into_dyn();
    assert!(matches!(
        normalizer.normalize(&scalar.into()),
        Err(LontaraError::UnsupportedInputType(_))
    ));

    let two_channel = Array3::<u8>::zeros((10, 10, 2));
    assert!(matches!(
        normalizer.normalize(&two_channel.into()),
        Err(LontaraError::UnsupportedInputType(_))
    ));

    let empty = Array2::<u8>::zeros((0, 10));
    assert!(matches!(
        normalizer.normalize(&empty.into()),
        Err(LontaraError::UnsupportedInputType(_))
    ));
}
