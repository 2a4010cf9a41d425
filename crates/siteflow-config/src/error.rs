//! Configuration error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the user config directory")]
    ConfigDirNotFound,

    #[error("No site.kdl found (set SITEFLOW_CONFIG_PATH or create site.kdl)")]
    SiteFileNotFound,

    #[error("Missing required config value: {0}")]
    MissingValue(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("KDL parse error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
