/// Error types for the parts of the crate that can genuinely fail.
///
/// Scanning never fails as a whole: per-file problems are reported through
/// `ScanProgress::Error` and degrade to `Unknown`/absent fields. The types
/// here cover persistence, export, and configuration, where losing the
/// user's data intent must be surfaced.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading, editing, or saving the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to write catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialise catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to replace catalog {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a catalog entry already exists for {0}")]
    DuplicatePath(PathBuf),

    #[error("no catalog entry for {0}")]
    NotFound(PathBuf),
}

/// Failures while exporting the catalog to CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to open export destination {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures while loading a scan configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
