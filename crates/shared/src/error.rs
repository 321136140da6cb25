use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when a failed response carries neither `detail` nor a status reason.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Transport,
    Server,
    Decode,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::Transport => "Transport",
            Self::Server => "Server",
            Self::Decode => "Decode",
        }
    }
}

/// A failed prediction interaction. `Display` is the bare user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PredictError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PredictError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// Builds the server error for a non-success reply.
    ///
    /// A non-empty `detail` wins. Otherwise the status reason phrase is used,
    /// and if that is unknown too, [`GENERIC_SERVER_ERROR`].
    pub fn from_failed_response(detail: Option<&str>, status_text: Option<&str>) -> Self {
        let message = detail
            .map(str::trim)
            .filter(|detail| !detail.is_empty())
            .or_else(|| status_text.map(str::trim).filter(|text| !text.is_empty()))
            .unwrap_or(GENERIC_SERVER_ERROR);
        Self::server(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = PredictError::server("file too large");
        assert_eq!(err.to_string(), "file too large");
    }

    #[test]
    fn failed_response_prefers_detail_then_status_text() {
        assert_eq!(
            PredictError::from_failed_response(Some("file too large"), Some("Payload Too Large"))
                .message,
            "file too large"
        );
        assert_eq!(
            PredictError::from_failed_response(Some(""), Some("Payload Too Large")).message,
            "Payload Too Large"
        );
        assert_eq!(
            PredictError::from_failed_response(None, Some("Internal Server Error")).message,
            "Internal Server Error"
        );
        assert_eq!(
            PredictError::from_failed_response(None, None).message,
            GENERIC_SERVER_ERROR
        );
    }
}
