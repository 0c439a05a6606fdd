// Relay error taxonomy

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to read token store: {0}")]
    StorageRead(String),

    #[error("Failed to write token store: {0}")]
    StorageWrite(String),

    #[error("Push transport failed: {0}")]
    Transport(String),

    #[error("No push tokens registered for {0}")]
    NoTokens(String),

    #[error("Invalid push credentials: {0}")]
    Credentials(String),
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        RelayError::Validation(message.into())
    }

    /// Whether the failure was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::Validation(_) | RelayError::NoTokens(_))
    }
}

pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RelayError::validation("token too short");
        assert_eq!(err.to_string(), "Validation failed: token too short");

        let err = RelayError::NoTokens("a@b.com".to_string());
        assert_eq!(err.to_string(), "No push tokens registered for a@b.com");
    }

    #[test]
    fn test_client_errors() {
        assert!(RelayError::validation("x").is_client_error());
        assert!(RelayError::NoTokens("a@b.com".into()).is_client_error());
        assert!(!RelayError::Transport("down".into()).is_client_error());
        assert!(!RelayError::StorageWrite("disk full".into()).is_client_error());
    }
}
