use std::io;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SidecarError>;

#[derive(Error, Debug)]
pub enum SidecarError {
    #[error("error resolving {name}: {source}")]
    Resolution {
        name: String,
        source: io::Error,
    },

    #[error("resolving {name} timed out after {timeout:?}")]
    ResolutionTimeout {
        name: String,
        timeout: Duration,
    },

    #[error("error serializing config: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("error writing {path}: {source}")]
    Persistence {
        path: String,
        source: io::Error,
    },
}
