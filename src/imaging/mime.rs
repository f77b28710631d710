//! The closed set of artwork encodings.
//!
//! Tag formats carry the picture's mime type as a free-form string
//! (`APIC` frames, FLAC `PICTURE` blocks, MP4 `covr` atoms). Inside this crate
//! every decision is made on [`MimeType`]; raw strings are parsed at the edge
//! and anything unrecognized is treated as unsupported.

use image::ImageFormat;
use std::fmt;

/// Image encodings artwork can be read from and written to.
///
/// Variant order is the order formats are listed in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MimeType {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl MimeType {
    pub const ALL: [MimeType; 4] = [MimeType::Png, MimeType::Jpeg, MimeType::Gif, MimeType::Bmp];

    /// Parse a raw mime string. Case-insensitive; `image/jpg` is accepted as
    /// an alias because taggers in the wild write it.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/bmp" | "image/x-bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    /// Whether the encoder takes a quality parameter.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Gif => ImageFormat::Gif,
            Self::Bmp => ImageFormat::Bmp,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::Bmp => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Detect the encoding from the buffer's magic bytes, ignoring whatever
    /// mime type the tag declared.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        image::guess_format(data)
            .ok()
            .and_then(Self::from_image_format)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
