//! Backend for runtimes without a usable codec stack.
//!
//! Reports no readable or writable formats and refuses every codec call with
//! [`BackendError::Unsupported`], so a tag writer skips the artwork instead of
//! embedding bytes nobody re-encoded.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::mime::MimeType;
use super::params::EncodeParams;

#[derive(Debug, Default)]
pub struct ConstrainedBackend;

impl ConstrainedBackend {
    pub fn new() -> Self {
        Self
    }

    fn unsupported(operation: &str) -> BackendError {
        BackendError::Unsupported(format!(
            "{operation} is not available: no image codecs on this runtime"
        ))
    }
}

impl ImageBackend for ConstrainedBackend {
    fn name(&self) -> &'static str {
        "constrained"
    }

    fn read_formats(&self) -> &[MimeType] {
        &[]
    }

    fn write_formats(&self) -> &[MimeType] {
        &[]
    }

    fn identify(&self, _data: &[u8]) -> Result<Dimensions, BackendError> {
        Err(Self::unsupported("identify"))
    }

    fn encode(&self, params: &EncodeParams<'_>) -> Result<Vec<u8>, BackendError> {
        Err(Self::unsupported(&format!("encoding {}", params.target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_no_formats() {
        let backend = ConstrainedBackend::new();
        assert!(backend.read_formats().is_empty());
        assert!(backend.write_formats().is_empty());
    }

    #[test]
    fn every_codec_call_is_unsupported() {
        let backend = ConstrainedBackend::new();
        assert!(backend.identify(b"\x89PNG").unwrap_err().is_unsupported());
        for mime in MimeType::ALL {
            let err = backend
                .encode(&EncodeParams::convert(b"\x89PNG", mime))
                .unwrap_err();
            assert!(err.is_unsupported(), "{mime}: {err}");
        }
    }
}
