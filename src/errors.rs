// src/errors.rs

use thiserror::Error;

pub type NoesisResult<T> = Result<T, NoesisError>;

/// Error taxonomy for the client. Network and backend failures collapse
/// into `Api`; call sites turn them into one generic user-facing string
/// per feature rather than surfacing the details.
#[derive(Debug, Error)]
pub enum NoesisError {
    #[error("API error: {message}")]
    Api { message: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl NoesisError {
    pub fn api_error(message: impl Into<String>) -> Self {
        NoesisError::Api {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        NoesisError::Config {
            message: message.into(),
        }
    }
}
