//! Error types for the WebUI core
//!
//! Only recoverable conditions live here. Contract violations by callers
//! (double registration of an observer, removing an observer that was never
//! registered) are programming errors and panic at the call site instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebUiError>;

#[derive(Error, Debug)]
pub enum WebUiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("An instance of {0} is already installed for this thread")]
    AlreadyInstalled(&'static str),
}

impl WebUiError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            WebUiError::InvalidInput(_) => 3,
            WebUiError::InvalidUrl(_) => 3,
            WebUiError::Config(_) => 1,
            WebUiError::AlreadyInstalled(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}
