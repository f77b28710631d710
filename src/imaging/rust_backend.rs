//! Pure Rust codec backend, built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format | `image::guess_format` |
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Decode (PNG, JPEG, GIF, BMP) | `ImageReader::decode` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `JpegEncoder::new_with_quality` |
//! | Encode → PNG | `PngEncoder::new_with_quality` (compression effort) |
//! | Encode → BMP | `BmpEncoder` |
//! | Encode → GIF | `DynamicImage::write_to` (first frame only) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::mime::MimeType;
use super::params::{Compression, EncodeParams, Quality};
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{self, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::sync::LazyLock;
use tracing::debug;

/// Formats whose decoders are compiled in.
static READ_FORMATS: LazyLock<Vec<MimeType>> = LazyLock::new(|| {
    MimeType::ALL
        .into_iter()
        .filter(|mime| mime.image_format().reading_enabled())
        .collect()
});

/// Formats whose encoders are compiled in.
static WRITE_FORMATS: LazyLock<Vec<MimeType>> = LazyLock::new(|| {
    MimeType::ALL
        .into_iter()
        .filter(|mime| mime.image_format().writing_enabled())
        .collect()
});

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the source format and make sure a decoder for it is compiled in.
fn source_format(data: &[u8]) -> Result<ImageFormat, BackendError> {
    let format = image::guess_format(data)
        .map_err(|e| BackendError::DecodeFailed(format!("Unrecognized image data: {e}")))?;
    match MimeType::from_image_format(format) {
        Some(mime) if READ_FORMATS.contains(&mime) => Ok(format),
        _ => Err(BackendError::DecodeFailed(format!(
            "No reader for {format:?} data"
        ))),
    }
}

/// Decode an in-memory image.
fn load_image(data: &[u8]) -> Result<DynamicImage, BackendError> {
    let format = source_format(data)?;
    ImageReader::with_format(Cursor::new(data), format)
        .decode()
        .map_err(|e| BackendError::DecodeFailed(format!("Failed to decode {format:?}: {e}")))
}

/// Convert pixels into a layout the target encoder accepts.
///
/// JPEG has no alpha channel, GIF frames are RGBA8, and BMP only takes 8-bit
/// channels. PNG accepts everything the supported decoders produce.
fn prepare_for(img: DynamicImage, target: MimeType) -> DynamicImage {
    match target {
        MimeType::Jpeg => match img {
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => img,
            other if !other.color().has_color() && !other.color().has_alpha() => {
                DynamicImage::ImageLuma8(other.to_luma8())
            }
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
        MimeType::Gif => DynamicImage::ImageRgba8(img.to_rgba8()),
        MimeType::Bmp => match img {
            DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_)
            | DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_) => img,
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
        MimeType::Png => img,
    }
}

fn encode_image(
    img: &DynamicImage,
    target: MimeType,
    quality: Quality,
    compression: Compression,
) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let result = match target {
        MimeType::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
            img.write_with_encoder(encoder)
        }
        MimeType::Png => {
            let level = match compression {
                Compression::Default => png::CompressionType::Default,
                Compression::Best => png::CompressionType::Best,
            };
            let encoder =
                PngEncoder::new_with_quality(&mut buf, level, png::FilterType::Adaptive);
            img.write_with_encoder(encoder)
        }
        MimeType::Bmp => {
            let encoder = BmpEncoder::new(&mut buf);
            img.write_with_encoder(encoder)
        }
        MimeType::Gif => img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Gif),
    };
    result.map_err(|e| BackendError::EncodeFailed(format!("{target} encode failed: {e}")))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn read_formats(&self) -> &[MimeType] {
        &READ_FORMATS
    }

    fn write_formats(&self) -> &[MimeType] {
        &WRITE_FORMATS
    }

    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError> {
        let format = source_format(data)?;
        let (width, height) = ImageReader::with_format(Cursor::new(data), format)
            .into_dimensions()
            .map_err(|e| {
                BackendError::DecodeFailed(format!("Failed to read dimensions: {e}"))
            })?;
        Ok(Dimensions { width, height })
    }

    fn encode(&self, params: &EncodeParams<'_>) -> Result<Vec<u8>, BackendError> {
        if !WRITE_FORMATS.contains(&params.target) {
            return Err(BackendError::Unsupported(format!(
                "No {} encoder compiled in",
                params.target
            )));
        }

        let img = load_image(params.source)?;
        let img = match params.resize {
            Some(Dimensions { width, height })
                if (width, height) != (img.width(), img.height()) =>
            {
                img.resize_exact(width, height, FilterType::Lanczos3)
            }
            _ => img,
        };
        let img = prepare_for(img, params.target);
        let out = encode_image(&img, params.target, params.quality, params.compression)?;

        debug!(
            target_mime = %params.target,
            width = img.width(),
            height = img.height(),
            quality = params.quality.value(),
            bytes = out.len(),
            "encoded image"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};

    /// Noisy gradient: compresses badly enough that quality changes matter.
    fn test_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let noise = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)) % 64;
            Rgb([(x % 256) as u8, (y % 256) as u8, (128 + noise) as u8])
        }))
    }

    fn encoded(img: &DynamicImage, mime: MimeType) -> Vec<u8> {
        encode_image(
            &prepare_for(img.clone(), mime),
            mime,
            Quality::default(),
            Compression::Default,
        )
        .unwrap()
    }

    #[test]
    fn all_artwork_formats_are_compiled_in() {
        let backend = RustBackend::new();
        for mime in MimeType::ALL {
            assert!(backend.read_formats().contains(&mime), "read {mime}");
            assert!(backend.write_formats().contains(&mime), "write {mime}");
        }
    }

    #[test]
    fn identify_every_format() {
        let backend = RustBackend::new();
        let img = test_rgb(64, 48);
        for mime in MimeType::ALL {
            let data = encoded(&img, mime);
            assert_eq!(
                backend.identify(&data).unwrap(),
                Dimensions::new(64, 48),
                "{mime}"
            );
        }
    }

    #[test]
    fn identify_garbage_is_decode_failure() {
        let backend = RustBackend::new();
        let err = backend.identify(b"definitely not an image").unwrap_err();
        assert!(matches!(err, BackendError::DecodeFailed(_)));
    }

    #[test]
    fn encode_garbage_is_decode_failure() {
        let backend = RustBackend::new();
        let err = backend
            .encode(&EncodeParams::convert(b"GIF89a-truncated", MimeType::Png))
            .unwrap_err();
        assert!(matches!(err, BackendError::DecodeFailed(_)));
    }

    #[test]
    fn encode_converts_between_formats() {
        let backend = RustBackend::new();
        let png = encoded(&test_rgb(40, 30), MimeType::Png);
        for mime in MimeType::ALL {
            let out = backend.encode(&EncodeParams::convert(&png, mime)).unwrap();
            assert_eq!(MimeType::sniff(&out), Some(mime));
            assert_eq!(backend.identify(&out).unwrap(), Dimensions::new(40, 30));
        }
    }

    #[test]
    fn encode_resizes_exactly() {
        let backend = RustBackend::new();
        let jpeg = encoded(&test_rgb(300, 200), MimeType::Jpeg);
        let out = backend
            .encode(
                &EncodeParams::convert(&jpeg, MimeType::Jpeg).with_resize(Dimensions::new(150, 100)),
            )
            .unwrap();
        assert_eq!(backend.identify(&out).unwrap(), Dimensions::new(150, 100));
    }

    #[test]
    fn lower_jpeg_quality_is_smaller() {
        let backend = RustBackend::new();
        let png = encoded(&test_rgb(256, 256), MimeType::Png);
        let high = backend
            .encode(&EncodeParams::convert(&png, MimeType::Jpeg).with_quality(Quality::new(95)))
            .unwrap();
        let low = backend
            .encode(&EncodeParams::convert(&png, MimeType::Jpeg).with_quality(Quality::new(10)))
            .unwrap();
        assert!(low.len() < high.len(), "{} !< {}", low.len(), high.len());
    }

    #[test]
    fn alpha_source_encodes_to_jpeg() {
        let backend = RustBackend::new();
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 10, Rgba([255, 0, 0, 128])));
        let png = encoded(&rgba, MimeType::Png);
        let out = backend.encode(&EncodeParams::convert(&png, MimeType::Jpeg)).unwrap();
        assert_eq!(MimeType::sniff(&out), Some(MimeType::Jpeg));
    }

    #[test]
    fn grayscale_survives_jpeg() {
        let gray = DynamicImage::ImageLuma16(image::ImageBuffer::from_pixel(
            8,
            8,
            image::Luma([40_000u16]),
        ));
        let prepared = prepare_for(gray, MimeType::Jpeg);
        assert!(matches!(prepared, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn gif_roundtrip_keeps_pixels_opaque() {
        let backend = RustBackend::new();
        let png = encoded(&test_rgb(16, 16), MimeType::Png);
        let gif = backend.encode(&EncodeParams::convert(&png, MimeType::Gif)).unwrap();
        let decoded = load_image(&gif).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded.get_pixel(3, 3)[3], 255);
    }
}
