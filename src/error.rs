//! Domain-specific error types for the bundle engine.
//!
//! Core modules return the typed [`BundleError`] while command handlers
//! at the CLI boundary convert it to [`anyhow::Error`] via the standard
//! `?` operator.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving and packaging a bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    /// No declaration exists under the requested bundle name.
    #[error("bundle '{0}' not found")]
    NotFound(String),

    /// Following `extends` references revisited a bundle already in the
    /// current resolution chain.
    #[error("inheritance cycle detected: {chain}")]
    InheritanceCycle {
        /// The offending chain, e.g. `base -> server -> base`.
        chain: String,
    },

    /// A bundle descriptor could not be parsed into the expected shape.
    #[error("malformed declaration for bundle '{bundle}': {message}")]
    Malformed {
        /// Name of the bundle whose descriptor failed to parse.
        bundle: String,
        /// Parser diagnostic.
        message: String,
    },

    /// A file-source root could not be enumerated.
    #[error("source root unavailable: {}", path.display())]
    SourceUnavailable {
        /// The root that failed to enumerate.
        path: PathBuf,
        /// Underlying I/O or walk error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O error while reading a declaration or source file.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
