//! Fit artwork to a tag format's limits before embedding.
//!
//! This is the sequence a tag writer runs for every picture it is about to
//! embed: make sure the encoding is one the backend can write, shrink to the
//! pixel limit, then squeeze under the byte limit. Any failure is returned to
//! the caller, who decides whether to drop the artwork or abort the write.
//!
//! ## Batches
//!
//! [`fit_all`] fits independent artworks in parallel using
//! [rayon](https://docs.rs/rayon). Each artwork is touched by exactly one
//! worker; the backend is shared read-only.

use crate::artwork::Artwork;
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, MimeType, Reduction, ReductionConfig, convert_artwork,
    make_smaller, reduce_quality,
};
use rayon::prelude::*;
use tracing::warn;

/// Limits an artwork has to satisfy. Unset fields are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FitConstraints {
    /// Byte ceiling for the encoded image.
    pub max_bytes: Option<usize>,
    /// Ceiling for the longer edge, in pixels.
    pub max_dimension: Option<u32>,
    /// Encoding the artwork must end up in. When unset the artwork keeps its
    /// encoding if the backend can write it, otherwise it becomes PNG.
    pub preferred_mime: Option<MimeType>,
}

impl FitConstraints {
    pub fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = Some(max_dimension);
        self
    }

    pub fn preferred_mime(mut self, mime: MimeType) -> Self {
        self.preferred_mime = Some(mime);
        self
    }
}

/// What [`fit_artwork`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitReport {
    /// Set when the artwork was re-encoded into another format.
    pub converted_to: Option<MimeType>,
    /// Dimensions after the pixel limit was applied.
    pub dimensions: Option<Dimensions>,
    /// Outcome of the byte limit, if one was set.
    pub reduction: Option<Reduction>,
    /// Final encoded length.
    pub bytes: usize,
}

/// Pick the encoding the artwork must be converted to, if any.
fn conversion_target(
    backend: &(impl ImageBackend + ?Sized),
    artwork: &Artwork,
    preferred: Option<MimeType>,
) -> Option<MimeType> {
    let current = artwork.mime();
    match preferred {
        Some(target) if current != Some(target) => Some(target),
        Some(_) => None,
        None => match current {
            Some(mime) if backend.write_formats().contains(&mime) => None,
            _ => Some(MimeType::Png),
        },
    }
}

/// Bring one artwork within `constraints`, mutating it in place.
///
/// On error the artwork may hold the result of an earlier, successful step
/// (for example converted but not yet small enough); it is always a complete
/// image of its declared mime type.
pub fn fit_artwork(
    backend: &(impl ImageBackend + ?Sized),
    artwork: &mut Artwork,
    constraints: &FitConstraints,
    config: &ReductionConfig,
) -> Result<FitReport, BackendError> {
    let converted_to = conversion_target(backend, artwork, constraints.preferred_mime);
    if let Some(target) = converted_to {
        if constraints.preferred_mime.is_none() {
            warn!(
                from = artwork.mime_type(),
                to = %target,
                backend = backend.name(),
                "artwork encoding not writable, converting"
            );
        }
        convert_artwork(backend, artwork, target, config)?;
    }

    let dimensions = match constraints.max_dimension {
        Some(max) => Some(make_smaller(backend, artwork, max, config)?),
        None => None,
    };

    let reduction = match constraints.max_bytes {
        Some(max) => Some(reduce_quality(backend, artwork, max, config)?),
        None => None,
    };

    Ok(FitReport {
        converted_to,
        dimensions: dimensions.or_else(|| artwork.dimensions()),
        reduction,
        bytes: artwork.len(),
    })
}

/// Fit every artwork in parallel. Results are in input order, one per artwork.
pub fn fit_all(
    backend: &(impl ImageBackend + ?Sized),
    artworks: &mut [Artwork],
    constraints: &FitConstraints,
    config: &ReductionConfig,
) -> Vec<Result<FitReport, BackendError>> {
    artworks
        .par_iter_mut()
        .map(|artwork| fit_artwork(backend, artwork, constraints, config))
        .collect()
}
