//! Error taxonomy of the appointments client.
//!
//! Every variant is recovered by the controller and shown as a notification;
//! none of them ends the session.

use shared::FormError;
use thiserror::Error;

/// A request that never produced an HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Failure of a single [`Transport::send`](crate::transport::Transport::send)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// No response arrived; the request may be repeated elsewhere
    #[error(transparent)]
    Unreachable(#[from] TransportError),

    /// The server answered but the body could not be read
    #[error("status {status}: {error}")]
    UnreadableBody { status: u16, error: TransportError },
}

/// Unified error type for appointment operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Neither the primary nor the fallback endpoint answered
    #[error("Network error (primary: {primary}; fallback: {fallback})")]
    Transport {
        primary: TransportError,
        fallback: TransportError,
    },

    /// An endpoint answered but its body was cut off or unreadable.
    /// The request may have taken effect, so it is never repeated.
    #[error("Failed to read response (status {status}): {error}")]
    UnreadableBody { status: u16, error: TransportError },

    /// An endpoint answered with a non-2xx status
    #[error("HTTP error! status: {status}{}", detail_suffix(.message))]
    HttpStatus { status: u16, message: Option<String> },

    /// The server answered `success: false`
    #[error("{0}")]
    Application(String),

    /// The form was rejected before any request was made
    #[error(transparent)]
    Validation(#[from] FormError),

    /// The response body was not the expected JSON envelope
    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

/// Result type alias for appointment operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_display_includes_server_message() {
        let err = ClientError::HttpStatus {
            status: 409,
            message: Some("Time slot already booked".into()),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error! status: 409 (Time slot already booked)"
        );

        let bare = ClientError::HttpStatus {
            status: 500,
            message: None,
        };
        assert_eq!(bare.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn transport_display_names_both_endpoints() {
        let err = ClientError::Transport {
            primary: TransportError::new("connection refused"),
            fallback: TransportError::new("timed out"),
        };
        assert!(err.is_transport());
        assert_eq!(
            err.to_string(),
            "Network error (primary: connection refused; fallback: timed out)"
        );
    }

    #[test]
    fn unreadable_body_is_not_a_transport_failure() {
        let err = ClientError::UnreadableBody {
            status: 200,
            error: TransportError::new("unexpected end of body"),
        };
        assert!(!err.is_transport());
        assert_eq!(
            err.to_string(),
            "Failed to read response (status 200): unexpected end of body"
        );
    }

    #[test]
    fn validation_is_transparent() {
        let err = ClientError::from(FormError::MissingRequired(vec!["time"]));
        assert_eq!(err.to_string(), "Please fill in all required fields");
    }
}
