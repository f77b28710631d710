//! Backend selection.
//!
//! Applications pick a backend once at startup and pass it to every
//! operation. [`select_backend`] builds one from a [`BackendChoice`];
//! [`BackendChoice::Auto`] probes the compiled-in codec stack at runtime.
//! [`shared_backend`] is the process-wide instance for callers that cannot
//! thread a backend through: built on first access, never rebuilt.

use super::backend::ImageBackend;
use super::constrained_backend::ConstrainedBackend;
use super::mime::MimeType;
use super::rust_backend::RustBackend;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::info;

/// A concrete backend variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Full pure-Rust codec stack.
    Native,
    /// No codecs; every operation reports `Unsupported`.
    Constrained,
}

/// Backend requested by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Use [`probe`] to decide.
    #[default]
    Auto,
    Native,
    Constrained,
}

/// Decide which backend this runtime can support.
///
/// The native stack qualifies only if it can both read and write PNG, the
/// interchange format every conversion path relies on.
pub fn probe() -> BackendKind {
    let native = RustBackend::new();
    if native.read_formats().contains(&MimeType::Png)
        && native.write_formats().contains(&MimeType::Png)
    {
        BackendKind::Native
    } else {
        BackendKind::Constrained
    }
}

impl BackendChoice {
    pub fn resolve(self) -> BackendKind {
        match self {
            Self::Auto => probe(),
            Self::Native => BackendKind::Native,
            Self::Constrained => BackendKind::Constrained,
        }
    }
}

/// Construct the backend for `choice`.
pub fn select_backend(choice: BackendChoice) -> Box<dyn ImageBackend> {
    let kind = choice.resolve();
    let backend: Box<dyn ImageBackend> = match kind {
        BackendKind::Native => Box::new(RustBackend::new()),
        BackendKind::Constrained => Box::new(ConstrainedBackend::new()),
    };
    info!(?choice, backend = backend.name(), "selected image backend");
    backend
}

static SHARED: LazyLock<Box<dyn ImageBackend>> =
    LazyLock::new(|| select_backend(BackendChoice::Auto));

/// The process-wide backend, chosen by [`probe`] on first access.
pub fn shared_backend() -> &'static dyn ImageBackend {
    SHARED.as_ref()
}
