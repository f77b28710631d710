//! Capability queries over the active backend.
//!
//! Pure lookups: nothing here decodes or encodes. Answers always agree with
//! what [`operations::write_image`](super::operations::write_image) accepts.

use super::backend::ImageBackend;
use super::mime::MimeType;
use std::collections::BTreeSet;

/// Whether the backend can encode `mime_type`. Unrecognized strings are not
/// writable; this never fails.
pub fn is_mime_type_writable(backend: &(impl ImageBackend + ?Sized), mime_type: &str) -> bool {
    MimeType::parse(mime_type).is_some_and(|mime| is_writable(backend, mime))
}

pub(crate) fn is_writable(backend: &(impl ImageBackend + ?Sized), mime: MimeType) -> bool {
    backend.write_formats().contains(&mime)
}

/// Formats the backend's decoders can parse.
pub fn supported_read_formats(backend: &(impl ImageBackend + ?Sized)) -> BTreeSet<MimeType> {
    backend.read_formats().iter().copied().collect()
}

/// Formats the backend's encoders can produce.
pub fn supported_write_formats(backend: &(impl ImageBackend + ?Sized)) -> BTreeSet<MimeType> {
    backend.write_formats().iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::imaging::{ConstrainedBackend, Dimensions, RustBackend};

    #[test]
    fn rust_backend_writes_all_artwork_formats() {
        let backend = RustBackend::new();
        for mime in ["image/png", "image/jpeg", "image/gif", "image/bmp", "image/jpg"] {
            assert!(is_mime_type_writable(&backend, mime), "{mime}");
        }
    }

    #[test]
    fn unrecognized_strings_are_not_writable() {
        let backend = RustBackend::new();
        assert!(!is_mime_type_writable(&backend, "image/webp"));
        assert!(!is_mime_type_writable(&backend, "text/plain"));
        assert!(!is_mime_type_writable(&backend, ""));
    }

    #[test]
    fn constrained_backend_writes_nothing() {
        let backend = ConstrainedBackend::new();
        assert!(!is_mime_type_writable(&backend, "image/png"));
        assert!(supported_read_formats(&backend).is_empty());
        assert!(supported_write_formats(&backend).is_empty());
    }

    #[test]
    fn sets_reflect_backend_tables() {
        let backend =
            MockBackend::new(Dimensions::new(1, 1)).with_formats(&[MimeType::Jpeg, MimeType::Png]);
        let expected: BTreeSet<MimeType> = [MimeType::Png, MimeType::Jpeg].into_iter().collect();
        assert_eq!(supported_read_formats(&backend), expected);
        assert_eq!(supported_write_formats(&backend), expected);
        assert!(!is_mime_type_writable(&backend, "image/gif"));
    }

    #[test]
    fn works_through_trait_objects() {
        let backend: Box<dyn ImageBackend> = Box::new(RustBackend::new());
        assert!(is_mime_type_writable(backend.as_ref(), "image/png"));
        assert_eq!(supported_write_formats(backend.as_ref()).len(), 4);
    }
}
