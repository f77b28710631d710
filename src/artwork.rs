//! The artwork value object: an embedded picture's bytes and declared type.
//!
//! Tag readers build an [`Artwork`] when they parse a picture frame; the
//! transcoder in [`imaging::operations`](crate::imaging::operations) is the
//! only code that replaces its payload. Whenever the payload changes, the mime
//! type and the cached dimensions change with it, so the buffer always stays a
//! complete image of the declared type.

use crate::imaging::{Dimensions, MimeType};
use std::fmt;
use std::io::Cursor;
use std::sync::OnceLock;

#[derive(Clone)]
pub struct Artwork {
    image_data: Vec<u8>,
    mime_type: String,
    /// Filled from the image header on first request.
    dimensions: OnceLock<Option<Dimensions>>,
}

impl Artwork {
    /// Wrap bytes with the mime type the tag declared for them.
    pub fn new(image_data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            image_data,
            mime_type: mime_type.into(),
            dimensions: OnceLock::new(),
        }
    }

    /// Wrap bytes, taking the mime type from their magic number.
    ///
    /// Unknown data gets an empty mime type, which no backend considers writable.
    pub fn from_bytes(image_data: Vec<u8>) -> Self {
        let mime = MimeType::sniff(&image_data)
            .map(MimeType::as_str)
            .unwrap_or_default();
        Self::new(image_data, mime)
    }

    pub fn image_data(&self) -> &[u8] {
        &self.image_data
    }

    pub fn into_image_data(self) -> Vec<u8> {
        self.image_data
    }

    pub fn len(&self) -> usize {
        self.image_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_data.is_empty()
    }

    /// The declared mime type, exactly as supplied.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The declared mime type, if it is one this crate handles.
    pub fn mime(&self) -> Option<MimeType> {
        MimeType::parse(&self.mime_type)
    }

    /// Pixel dimensions, parsed from the image header once and cached.
    ///
    /// `None` when the header cannot be read.
    pub fn dimensions(&self) -> Option<Dimensions> {
        *self
            .dimensions
            .get_or_init(|| read_dimensions(&self.image_data))
    }

    pub fn width(&self) -> Option<u32> {
        self.dimensions().map(|d| d.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.dimensions().map(|d| d.height)
    }

    /// Replace the payload. Cached dimensions are dropped.
    pub fn set_image_data(&mut self, image_data: Vec<u8>) {
        self.image_data = image_data;
        self.dimensions = OnceLock::new();
    }

    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) {
        self.mime_type = mime_type.into();
    }

    /// Replace payload, mime type and dimensions together after a re-encode.
    pub fn replace_image(&mut self, image_data: Vec<u8>, mime: MimeType, dimensions: Dimensions) {
        self.image_data = image_data;
        self.mime_type = mime.as_str().to_string();
        self.dimensions = OnceLock::from(Some(dimensions));
    }
}

fn read_dimensions(data: &[u8]) -> Option<Dimensions> {
    let (width, height) = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    Some(Dimensions { width, height })
}

impl fmt::Debug for Artwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artwork")
            .field("mime_type", &self.mime_type)
            .field("len", &self.image_data.len())
            .field("dimensions", &self.dimensions.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::encode_test_image;

    #[test]
    fn dimensions_are_read_from_header() {
        let art = Artwork::new(encode_test_image(120, 80, MimeType::Png), "image/png");
        assert_eq!(art.dimensions(), Some(Dimensions::new(120, 80)));
        assert_eq!(art.width(), Some(120));
        assert_eq!(art.height(), Some(80));
    }

    #[test]
    fn dimensions_of_garbage_are_none() {
        let art = Artwork::new(b"nope".to_vec(), "image/png");
        assert_eq!(art.dimensions(), None);
    }

    #[test]
    fn from_bytes_sniffs_mime() {
        let art = Artwork::from_bytes(encode_test_image(8, 8, MimeType::Jpeg));
        assert_eq!(art.mime_type(), "image/jpeg");
        assert_eq!(art.mime(), Some(MimeType::Jpeg));

        let unknown = Artwork::from_bytes(b"????".to_vec());
        assert_eq!(unknown.mime_type(), "");
        assert_eq!(unknown.mime(), None);
    }

    #[test]
    fn unrecognized_declared_mime_is_kept_verbatim() {
        let art = Artwork::new(vec![1, 2, 3], "image/x-foo");
        assert_eq!(art.mime_type(), "image/x-foo");
        assert_eq!(art.mime(), None);
    }

    #[test]
    fn set_image_data_invalidates_cached_dimensions() {
        let mut art = Artwork::new(encode_test_image(10, 10, MimeType::Png), "image/png");
        assert_eq!(art.dimensions(), Some(Dimensions::new(10, 10)));

        art.set_image_data(encode_test_image(20, 5, MimeType::Png));
        assert_eq!(art.dimensions(), Some(Dimensions::new(20, 5)));
    }

    #[test]
    fn replace_image_updates_everything() {
        let mut art = Artwork::new(encode_test_image(10, 10, MimeType::Png), "image/png");
        let jpeg = encode_test_image(4, 3, MimeType::Jpeg);
        let len = jpeg.len();

        art.replace_image(jpeg, MimeType::Jpeg, Dimensions::new(4, 3));
        assert_eq!(art.mime_type(), "image/jpeg");
        assert_eq!(art.len(), len);
        assert_eq!(art.dimensions(), Some(Dimensions::new(4, 3)));
    }

    #[test]
    fn debug_omits_payload() {
        let art = Artwork::new(vec![0; 1000], "image/png");
        let dbg = format!("{art:?}");
        assert!(dbg.contains("len: 1000"));
        assert!(!dbg.contains("0, 0, 0"));
    }
}
