use std::path::PathBuf;

use thiserror::Error;

/// Failures from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize working set: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Failures surfaced by the import pipeline. Nothing is applied to the
/// working set when any of these is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Neither UTF-8 nor GBK gave usable text. Shown to users like `Parse`.
    #[error("file parse failed")]
    Decode,
    #[error("file parse failed")]
    Parse,
    #[error("an import is already running")]
    InProgress,
    #[error("import cancelled")]
    Cancelled,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Persist(#[from] StoreError),
}
