use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    /// stdout is not attached to a terminal, so there is nothing to draw on
    #[error("no terminal to mount the arcade on")]
    MountUnavailable,

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
