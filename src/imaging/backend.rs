//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between the transcoder and whatever
//! codec stack the process has: format tables for capability queries, a cheap
//! header probe, and one decode → resize → encode primitive.
//!
//! Two implementations ship:
//! [`RustBackend`](super::rust_backend::RustBackend), the full pure-Rust codec
//! stack, and [`ConstrainedBackend`](super::constrained_backend::ConstrainedBackend),
//! which has no codecs and answers every codec call with
//! [`BackendError::Unsupported`].

use super::mime::MimeType;
use super::params::EncodeParams;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The active backend cannot do this at all. Callers usually recover by
    /// omitting the artwork.
    #[error("Unsupported: {0}")]
    Unsupported(String),
    /// The bytes are not an image any supported reader understands.
    #[error("Decode failed: {0}")]
    DecodeFailed(String),
    /// The image decoded but the encoder refused it.
    #[error("Encode failed: {0}")]
    EncodeFailed(String),
    /// A byte or pixel budget could not be met even at the quality/size floor.
    #[error("Constraint unsatisfiable: {0}")]
    ConstraintUnsatisfiable(String),
}

impl BackendError {
    /// True for missing-capability failures, false for anything caused by the
    /// image data or the requested budget.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

/// Pixel dimensions of an encoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn longer_edge(self) -> u32 {
        self.width.max(self.height)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Trait for image codec backends.
///
/// Format tables must agree with what [`encode`](ImageBackend::encode)
/// accepts: a mime listed in `write_formats` never fails with
/// [`BackendError::Unsupported`].
pub trait ImageBackend: Send + Sync {
    /// Short identifier used in diagnostics and logs.
    fn name(&self) -> &'static str;

    /// Formats the decoder stack can parse.
    fn read_formats(&self) -> &[MimeType];

    /// Formats the encoder stack can produce.
    fn write_formats(&self) -> &[MimeType];

    /// Read dimensions from the image header.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode `params.source`, optionally resize, and encode to `params.target`.
    fn encode(&self, params: &EncodeParams<'_>) -> Result<Vec<u8>, BackendError>;
}
