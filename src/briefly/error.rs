use crate::form::FieldErrors;
use thiserror::Error;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again later.";
pub const AUTH_REQUIRED_MESSAGE: &str = "User not authenticated. Please log in.";

#[derive(Error, Debug)]
pub enum BrieflyError {
    /// One or more fields failed local validation. Never reaches the network.
    #[error("{0}")]
    Validation(FieldErrors),

    /// The backend answered with a non-success status.
    #[error("Error {status}: {}", server_message(.message))]
    Request {
        status: u16,
        message: Option<String>,
    },

    /// No response at all (connection refused, DNS, TLS, ...).
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(String),

    #[error("{}", AUTH_REQUIRED_MESSAGE)]
    AuthRequired,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(String),
}

impl BrieflyError {
    /// Fills in `default` as the server message when the backend gave none.
    pub fn with_default_message(self, default: &str) -> Self {
        match self {
            BrieflyError::Request {
                status,
                message: None,
            } => BrieflyError::Request {
                status,
                message: Some(default.to_string()),
            },
            other => other,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BrieflyError::Validation(_))
    }
}

impl From<reqwest::Error> for BrieflyError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => BrieflyError::Request {
                status: status.as_u16(),
                message: None,
            },
            None => BrieflyError::Network(err.to_string()),
        }
    }
}

fn server_message(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("Request failed")
}

pub type Result<T> = std::result::Result<T, BrieflyError>;
