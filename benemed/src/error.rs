use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("could not determine data directory")]
    NoDataDir,
    #[error("failed to create data directory: {0}")]
    DataDir(#[source] io::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("client i/o: {0}")]
    Io(#[from] io::Error),
    #[error("encoding response: {0}")]
    Encode(#[from] serde_json::Error),
}
