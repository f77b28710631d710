//! # coverfit
//!
//! Artwork normalization for audio metadata tagging. Given an embedded
//! picture and the limits of the tag format it is going into (byte ceiling,
//! longer-edge ceiling, encoding), coverfit re-encodes it until it fits, or
//! says precisely why it can't.
//!
//! Oversized artwork is one of the most common reasons tag writes fail or
//! produce files other players refuse to read, and codec availability varies
//! between runtimes, so every operation goes through an explicit backend that
//! can answer "can I write this?" before anything is encoded.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`artwork`] | The [`Artwork`] value: bytes, declared mime type, lazily read dimensions |
//! | [`imaging`] | Backends, capability queries, format conversion, quality and dimension reduction |
//! | [`normalize`] | The per-picture fit sequence a tag writer runs, single and batched |
//! | [`config`] | `coverfit.toml` loading, validation and defaults |
//!
//! # Design Decisions
//!
//! ## Backends Are Passed In
//!
//! Every operation takes the backend as an argument. Applications build one
//! at startup with [`imaging::select_backend`] (from a config flag or a
//! runtime probe) and hand it down; tests substitute a mock or the
//! constrained backend the same way. [`imaging::shared_backend`] exists for
//! callers that need a process-wide instance; it is built once, on first
//! access.
//!
//! ## Failing Loudly
//!
//! A runtime without codecs gets [`imaging::ConstrainedBackend`], which
//! answers every codec call with [`imaging::BackendError::Unsupported`]
//! instead of passing bytes through untouched. The tag writer can then drop
//! the artwork rather than embed something that was never checked.
//!
//! ## Never Oversized
//!
//! Reductions commit a new payload only once it meets the budget. If the
//! quality floor or the dimension floor is reached first, the caller gets
//! [`imaging::BackendError::ConstraintUnsatisfiable`] and the artwork is
//! unchanged.
//!
//! ## Pure-Rust Codecs
//!
//! The native backend uses the `image` crate's PNG, JPEG, GIF and BMP codecs,
//! all pure Rust and statically linked, so there is no system library whose
//! presence decides what works.

pub mod artwork;
pub mod config;
pub mod imaging;
pub mod normalize;

pub use artwork::Artwork;
pub use normalize::{FitConstraints, FitReport, fit_all, fit_artwork};

#[cfg(test)]
pub(crate) mod test_helpers;
