/// Message shown to the user for any transport level failure
pub const LOOKUP_FAILED: &str = "Failed to look up word";
/// Message shown to the user when the `result` event cannot be parsed
pub const PARSE_FAILED: &str = "Failed to parse result";

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The lookup was superseded or cleared. Never reported to the user.
    #[error("Lookup cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("no response body")]
    NoBody,

    #[error("Malformed result: {0}")]
    MalformedResult(String),
}

impl LookupError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, LookupError::Cancelled)
    }

    /// Short message for notifications, `None` for cancellations
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            LookupError::Cancelled => None,
            LookupError::MalformedResult(_) => Some(PARSE_FAILED),
            LookupError::Network(_) | LookupError::Status { .. } | LookupError::NoBody => {
                Some(LOOKUP_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_follow_failure_kind() {
        assert_eq!(LookupError::Cancelled.user_message(), None);
        assert_eq!(LookupError::NoBody.user_message(), Some(LOOKUP_FAILED));
        assert_eq!(
            LookupError::Status {
                status: 502,
                message: "bad gateway".to_string()
            }
            .user_message(),
            Some(LOOKUP_FAILED)
        );
        assert_eq!(
            LookupError::MalformedResult("eof".to_string()).user_message(),
            Some(PARSE_FAILED)
        );
    }

    #[test]
    fn status_error_keeps_body_text() {
        let err = LookupError::Status {
            status: 401,
            message: "token expired".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 401: token expired");
        assert!(!err.is_cancellation());
    }
}
