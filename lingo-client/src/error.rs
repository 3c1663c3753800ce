use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Maps a non-2xx response onto the taxonomy.
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::CONFLICT => ClientError::Conflict(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Rejected { status: status.as_u16(), message },
        }
    }

    /// Worth offering the user a retry button for.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::NetworkFailure(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if err.is_builder() {
            ClientError::Config(err.to_string())
        } else {
            ClientError::NetworkFailure(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_taxonomy() {
        assert_eq!(ClientError::from_status(StatusCode::UNAUTHORIZED, "x".into()), ClientError::Unauthorized);
        assert_eq!(
            ClientError::from_status(StatusCode::CONFLICT, "Friend request already exists".into()),
            ClientError::Conflict("Friend request already exists".into())
        );
        assert_eq!(
            ClientError::from_status(StatusCode::NOT_FOUND, "gone".into()),
            ClientError::NotFound("gone".into())
        );
        assert_eq!(
            ClientError::from_status(StatusCode::BAD_REQUEST, "self".into()),
            ClientError::Rejected { status: 400, message: "self".into() }
        );
    }

    #[test]
    fn only_network_failures_are_retryable() {
        assert!(ClientError::NetworkFailure("reset".into()).is_retryable());
        assert!(!ClientError::Conflict("dup".into()).is_retryable());
        assert!(!ClientError::Unauthorized.is_retryable());
    }
}
