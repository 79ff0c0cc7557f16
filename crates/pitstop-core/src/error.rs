use thiserror::Error;

/// Errors raised while loading application configuration or the season catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seasons file {path}: {source}")]
    SeasonsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seasons file: {0}")]
    SeasonsFileParse(#[from] serde_yaml::Error),

    #[error("season catalog validation failed: {0}")]
    Validation(String),
}
