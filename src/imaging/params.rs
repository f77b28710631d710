//! Parameter types for codec operations.
//!
//! These structs describe *what* to encode, not *how*. They are the interface
//! between the transcoder in [`operations`](super::operations) (which decides
//! quality steps and target sizes) and the [`backend`](super::backend) (which
//! does the pixel work). A mock backend can record them without touching any
//! codec.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Compression`]: Effort for lossless encoders that have one (PNG).
//! - [`EncodeParams`]: Everything a re-encode needs: source bytes, target
//!   mime, optional exact output dimensions, quality, compression.

use super::backend::Dimensions;
use super::mime::MimeType;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Compression effort for lossless encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Default,
    Best,
}

/// Parameters for a single decode → (resize) → encode pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams<'a> {
    /// Encoded source image; its format is autodetected.
    pub source: &'a [u8],
    pub target: MimeType,
    /// Exact output dimensions. `None` keeps the source dimensions.
    pub resize: Option<Dimensions>,
    /// Ignored by lossless targets.
    pub quality: Quality,
    /// Ignored by targets without a compression knob.
    pub compression: Compression,
}

impl<'a> EncodeParams<'a> {
    /// Plain format conversion: no resize, default quality and compression.
    pub fn convert(source: &'a [u8], target: MimeType) -> Self {
        Self {
            source,
            target,
            resize: None,
            quality: Quality::default(),
            compression: Compression::Default,
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_resize(mut self, dimensions: Dimensions) -> Self {
        self.resize = Some(dimensions);
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn convert_params_keep_source_dimensions() {
        let params = EncodeParams::convert(b"abc", MimeType::Png);
        assert_eq!(params.resize, None);
        assert_eq!(params.quality, Quality::default());
        assert_eq!(params.compression, Compression::Default);
    }

    #[test]
    fn builder_methods_override_fields() {
        let params = EncodeParams::convert(b"abc", MimeType::Jpeg)
            .with_quality(Quality::new(40))
            .with_resize(Dimensions {
                width: 10,
                height: 5,
            })
            .with_compression(Compression::Best);
        assert_eq!(params.quality.value(), 40);
        assert_eq!(
            params.resize,
            Some(Dimensions {
                width: 10,
                height: 5
            })
        );
        assert_eq!(params.compression, Compression::Best);
    }
}
