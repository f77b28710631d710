//! Image codecs and artwork reduction in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Convert** | decode with `image`, re-encode with the target's encoder |
//! | **Shrink** | Lanczos3 resize to a longer-edge limit |
//! | **Reduce quality** | JPEG quality ladder; lossless falls back to halving dimensions |
//!
//! The module is split into:
//! - **Mime**: [`MimeType`], the closed set of artwork encodings
//! - **Calculations**: Pure functions for dimension and quality planning (unit testable)
//! - **Parameters**: Data structures describing a re-encode
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`] and [`ConstrainedBackend`]
//! - **Capability**: read/write format queries
//! - **Operations**: High-level functions combining calculations + backend
//! - **Platform**: backend selection and the shared process-wide backend

pub mod backend;
mod calculations;
pub mod capability;
pub mod constrained_backend;
mod mime;
pub mod operations;
mod params;
pub mod platform;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{fit_within, next_halving, quality_steps};
pub use capability::{is_mime_type_writable, supported_read_formats, supported_write_formats};
pub use constrained_backend::ConstrainedBackend;
pub use mime::MimeType;
pub use operations::{
    Reduction, ReductionConfig, convert_artwork, make_smaller, reduce_quality, show_read_formats,
    show_write_formats, write_image, write_image_as_png,
};
pub use params::{Compression, EncodeParams, Quality};
pub use platform::{BackendChoice, BackendKind, probe, select_backend, shared_backend};
pub use rust_backend::RustBackend;
