use thiserror::Error;

pub type Result<T> = std::result::Result<T, WhatsAppError>;

#[derive(Debug, Error)]
pub enum WhatsAppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for WhatsAppError {
    fn from(err: reqwest::Error) -> Self {
        WhatsAppError::Network(err.to_string())
    }
}
