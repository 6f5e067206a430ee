use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScaffoldError>;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Test-case block missing or not valid JSON. Fatal to a whole test run.
    #[error("parse error: {0}")]
    Parse(String),

    /// A single call to the translation server failed.
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("storage error during {operation}: {message}")]
    Storage { operation: String, message: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ScaffoldError {
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn storage_error(operation: &str, message: impl Into<String>) -> Self {
        Self::Storage {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// True for failures where the server was never reached or never answered usefully.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/* reqwest errors only ever come from talking to the translation server */
impl From<reqwest::Error> for ScaffoldError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScaffoldError::Network(format!("request timed out: {e}"))
        } else {
            ScaffoldError::Network(e.to_string())
        }
    }
}
