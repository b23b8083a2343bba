use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WordCountError>;

#[derive(Debug, Error)]
pub enum WordCountError {
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single word is wider than the chunk size, so no safe cut exists.
    #[error("no safe chunk boundary at file offset {offset} (max chunk size {max_chunk_size}); a word is longer than the chunk size")]
    ChunkBoundary { offset: u64, max_chunk_size: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to encode result record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("malformed result record in {} line {line}: {source}", path.display())]
    Decode {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} channel closed unexpectedly")]
    ChannelClosed(&'static str),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl WordCountError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WordCountError::Io {
            path: path.into(),
            source,
        }
    }
}
