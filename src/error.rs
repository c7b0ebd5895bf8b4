/// Errors that can occur when building a game configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown variant '{0}' (expected one of a, b, c, d)")]
    UnknownVariant(String),

    #[error("config validation error: {0}")]
    Validation(String),
}
