//! Shared test utilities for the coverfit test suite.
//!
//! Builds real encoded images in memory so tests exercise the actual codecs
//! without fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let jpeg = encode_test_image(300, 200, MimeType::Jpeg);
//! let art = Artwork::new(jpeg, "image/jpeg");
//! ```

use crate::imaging::MimeType;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Deterministic noisy gradient.
///
/// The noise term keeps lossless encoders from collapsing the image to a few
/// bytes, so byte budgets in tests are meaningful.
pub fn test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        let noise = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)) % 97;
        Rgb([
            (x % 256) as u8,
            (y % 256) as u8,
            ((x + y) % 128 + noise) as u8,
        ])
    }))
}

/// Encode [`test_image`] as `mime`. JPEG uses quality 95 so reductions have
/// room to work.
pub fn encode_test_image(width: u32, height: u32, mime: MimeType) -> Vec<u8> {
    let img = test_image(width, height);
    let mut buf = Vec::new();
    match mime {
        MimeType::Jpeg => {
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 95))
                .unwrap();
        }
        MimeType::Gif => {
            DynamicImage::ImageRgba8(img.to_rgba8())
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Gif)
                .unwrap();
        }
        other => {
            img.write_to(&mut Cursor::new(&mut buf), other.image_format())
                .unwrap();
        }
    }
    buf
}
