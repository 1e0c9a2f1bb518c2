use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading raw data. These are loader-side errors; schema
/// inference failures are reported by the normalizer, not here.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse csv {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("parse code list: {0}")]
    Json(#[from] serde_json::Error),
}
