//! Library-level error types. `main` wraps these with `anyhow::Context` for
//! human-readable top-level reporting; nothing in the library itself reaches
//! for `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest file not found: {0}")]
    NotFound(std::path::PathBuf),
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("failed to write output file {path}: {source}")]
    Output {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
