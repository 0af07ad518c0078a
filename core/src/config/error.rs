//! Error types for configuration and layout loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading contract configuration or report layouts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML in {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse TOML")]
    Parse(#[from] toml::de::Error),
}
