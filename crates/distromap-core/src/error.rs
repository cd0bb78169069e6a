//! Error type shared by loaders, sinks and the pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("cannot read {what} '{}': {source}", path.display())]
    Read {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {what} '{}': {source}", path.display())]
    Json {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialise mapping: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("cannot start resolver thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
