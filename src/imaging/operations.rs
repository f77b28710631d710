//! High-level artwork operations.
//!
//! These functions combine calculations with backend execution: they check
//! capabilities, plan quality ladders and target dimensions, call the backend,
//! and commit results into the [`Artwork`]. A result is committed only once it
//! satisfies the requested budget; on any error the artwork is left untouched.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{fit_within, next_halving, quality_steps};
use super::capability::is_writable;
use super::mime::MimeType;
use super::params::{Compression, EncodeParams, Quality};
use crate::artwork::Artwork;
use crate::config::ReductionSettings;
use tracing::{debug, info};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Knobs for [`reduce_quality`] and [`make_smaller`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionConfig {
    /// First quality tried, and the quality used by [`make_smaller`] for JPEG.
    pub initial_quality: Quality,
    /// Amount quality drops per attempt.
    pub quality_step: u32,
    /// Last quality tried before giving up.
    pub min_quality: Quality,
    /// Lossless reduction never shrinks the longer edge below this.
    pub min_dimension: u32,
}

impl ReductionConfig {
    /// Build a ReductionConfig from loaded config values.
    pub fn from_settings(settings: &ReductionSettings) -> Self {
        Self {
            initial_quality: Quality::new(settings.initial_quality),
            quality_step: settings.quality_step,
            min_quality: Quality::new(settings.min_quality),
            min_dimension: settings.min_dimension,
        }
    }
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self::from_settings(&ReductionSettings::default())
    }
}

/// What [`reduce_quality`] did to meet the byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Already within budget; nothing was re-encoded.
    AlreadyFits,
    /// Lossy re-encode at the given quality.
    Reencoded { quality: Quality, bytes: usize },
    /// Lossless re-encode at maximum compression, same dimensions.
    Recompressed { bytes: usize },
    /// Lossless re-encode at reduced dimensions.
    Shrunk { dimensions: Dimensions, bytes: usize },
}

/// Resolve the artwork's declared mime and make sure the backend can write it.
fn writable_mime(backend: &(impl ImageBackend + ?Sized), artwork: &Artwork) -> Result<MimeType> {
    let mime = MimeType::parse(artwork.mime_type()).ok_or_else(|| {
        BackendError::Unsupported(format!(
            "Unrecognized artwork mime type '{}'",
            artwork.mime_type()
        ))
    })?;
    ensure_writable(backend, mime)?;
    Ok(mime)
}

fn ensure_writable(backend: &(impl ImageBackend + ?Sized), mime: MimeType) -> Result<()> {
    if is_writable(backend, mime) {
        Ok(())
    } else {
        Err(BackendError::Unsupported(format!(
            "{mime} is not writable by the {} backend",
            backend.name()
        )))
    }
}

/// Decode `image_data` (format autodetected) and re-encode it as `mime_type`.
///
/// Fails with [`BackendError::Unsupported`] when `mime_type` is unrecognized or
/// not writable, and with [`BackendError::DecodeFailed`] when no reader
/// understands the input.
pub fn write_image(
    backend: &(impl ImageBackend + ?Sized),
    image_data: &[u8],
    mime_type: &str,
) -> Result<Vec<u8>> {
    let mime = MimeType::parse(mime_type).ok_or_else(|| {
        BackendError::Unsupported(format!("Unrecognized mime type '{mime_type}'"))
    })?;
    ensure_writable(backend, mime)?;
    backend.encode(&EncodeParams::convert(image_data, mime))
}

/// [`write_image`] with PNG, the canonical interchange format for artwork.
pub fn write_image_as_png(
    backend: &(impl ImageBackend + ?Sized),
    image_data: &[u8],
) -> Result<Vec<u8>> {
    write_image(backend, image_data, MimeType::Png.as_str())
}

/// Re-encode the artwork in place as `target`, keeping its dimensions.
pub fn convert_artwork(
    backend: &(impl ImageBackend + ?Sized),
    artwork: &mut Artwork,
    target: MimeType,
    config: &ReductionConfig,
) -> Result<()> {
    ensure_writable(backend, target)?;
    let dims = backend.identify(artwork.image_data())?;
    let out = backend.encode(
        &EncodeParams::convert(artwork.image_data(), target).with_quality(config.initial_quality),
    )?;
    debug!(from = artwork.mime_type(), to = %target, bytes = out.len(), "converted artwork");
    artwork.replace_image(out, target, dims);
    Ok(())
}

/// Shrink the artwork so its longer edge is at most `max_dimension`.
///
/// Aspect ratio is preserved (see [`fit_within`]) and the artwork keeps its
/// mime type. Artwork already within the limit is left as is. Returns the
/// resulting dimensions.
pub fn make_smaller(
    backend: &(impl ImageBackend + ?Sized),
    artwork: &mut Artwork,
    max_dimension: u32,
    config: &ReductionConfig,
) -> Result<Dimensions> {
    let mime = writable_mime(backend, artwork)?;
    if max_dimension == 0 {
        return Err(BackendError::ConstraintUnsatisfiable(
            "maximum dimension must be at least 1 pixel".into(),
        ));
    }

    let dims = backend.identify(artwork.image_data())?;
    let target = fit_within(dims, max_dimension);
    if target == dims {
        debug!(%dims, max_dimension, "artwork already within dimension limit");
        return Ok(dims);
    }

    let out = backend.encode(
        &EncodeParams::convert(artwork.image_data(), mime)
            .with_resize(target)
            .with_quality(config.initial_quality),
    )?;
    debug!(from = %dims, to = %target, bytes = out.len(), "resized artwork");
    artwork.replace_image(out, mime, target);
    Ok(target)
}

/// Re-encode the artwork until it is at most `max_bytes` long.
///
/// - JPEG walks the quality ladder from `initial_quality` down to
///   `min_quality` in `quality_step` decrements.
/// - PNG is first re-encoded once at maximum compression.
/// - Lossless formats then halve the longer edge per pass until the result
///   fits or the next pass would go below `min_dimension`.
///
/// Fails with [`BackendError::ConstraintUnsatisfiable`] when the floor is
/// reached; an oversized result is never committed.
pub fn reduce_quality(
    backend: &(impl ImageBackend + ?Sized),
    artwork: &mut Artwork,
    max_bytes: usize,
    config: &ReductionConfig,
) -> Result<Reduction> {
    let mime = writable_mime(backend, artwork)?;
    if artwork.len() <= max_bytes {
        debug!(bytes = artwork.len(), max_bytes, "artwork already within byte limit");
        return Ok(Reduction::AlreadyFits);
    }

    let dims = backend.identify(artwork.image_data())?;
    let mut smallest = artwork.len();

    if mime.is_lossy() {
        for quality in quality_steps(config.initial_quality, config.quality_step, config.min_quality)
        {
            let out = backend.encode(
                &EncodeParams::convert(artwork.image_data(), mime).with_quality(quality),
            )?;
            debug!(quality = quality.value(), bytes = out.len(), max_bytes, "quality step");
            if out.len() <= max_bytes {
                let bytes = out.len();
                artwork.replace_image(out, mime, dims);
                return Ok(Reduction::Reencoded { quality, bytes });
            }
            smallest = smallest.min(out.len());
        }
        return Err(BackendError::ConstraintUnsatisfiable(format!(
            "{mime} is still {smallest} bytes at quality {} (limit {max_bytes})",
            config.min_quality.value()
        )));
    }

    if mime == MimeType::Png {
        let out = backend.encode(
            &EncodeParams::convert(artwork.image_data(), mime).with_compression(Compression::Best),
        )?;
        debug!(bytes = out.len(), max_bytes, "recompressed png");
        if out.len() <= max_bytes {
            let bytes = out.len();
            artwork.replace_image(out, mime, dims);
            return Ok(Reduction::Recompressed { bytes });
        }
        smallest = smallest.min(out.len());
    }

    let mut current = dims;
    while let Some(next) = next_halving(current, config.min_dimension) {
        let out = backend.encode(
            &EncodeParams::convert(artwork.image_data(), mime)
                .with_resize(next)
                .with_compression(Compression::Best),
        )?;
        debug!(dimensions = %next, bytes = out.len(), max_bytes, "dimension step");
        if out.len() <= max_bytes {
            let bytes = out.len();
            artwork.replace_image(out, mime, next);
            return Ok(Reduction::Shrunk {
                dimensions: next,
                bytes,
            });
        }
        smallest = smallest.min(out.len());
        current = next;
    }

    Err(BackendError::ConstraintUnsatisfiable(format!(
        "{mime} is still {smallest} bytes at {current} (limit {max_bytes}, minimum edge {})",
        config.min_dimension
    )))
}

/// List the formats the backend can read, for operators and logs.
pub fn show_read_formats(backend: &(impl ImageBackend + ?Sized)) -> Result<String> {
    show_formats(backend, "read", backend.read_formats())
}

/// List the formats the backend can write, for operators and logs.
pub fn show_write_formats(backend: &(impl ImageBackend + ?Sized)) -> Result<String> {
    show_formats(backend, "write", backend.write_formats())
}

fn show_formats(
    backend: &(impl ImageBackend + ?Sized),
    direction: &str,
    formats: &[MimeType],
) -> Result<String> {
    if formats.is_empty() {
        return Err(BackendError::Unsupported(format!(
            "The {} backend cannot {direction} any image format",
            backend.name()
        )));
    }
    let list: Vec<&str> = formats.iter().map(|m| m.as_str()).collect();
    let line = format!("{direction} formats ({}): {}", backend.name(), list.join(", "));
    info!("{line}");
    Ok(line)
}
