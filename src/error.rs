use thiserror::Error;

/// Shown for an empty or unparsable success body.
pub const NOT_FOUND_MESSAGE: &str =
    "Failed to find service with this name. Please try rephrasing your query or check the spelling.";

/// Shown when the transport fails without any usable detail.
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "Failed to assess product. Please try again.";

/// Every way an assessment request can fail.
///
/// The `Display` text of each variant is the message shown to the user; none
/// of these are fatal, the caller can always retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Please enter a product name or URL.")]
    EmptyQuery,

    /// Connection, DNS, TLS or body-read failure. The detail is kept for
    /// logs; the user only sees the retry prompt.
    #[error("{}", TRANSPORT_FALLBACK_MESSAGE)]
    Transport(String),

    /// Non-2xx response.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body was empty or not usable JSON.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound { status: u16 },
}

impl ApiError {
    pub fn transport(detail: impl Into<String>) -> Self {
        ApiError::Transport(detail.into())
    }

    /// Underlying transport error text, for logging.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Transport(detail) if !detail.trim().is_empty() => Some(detail),
            _ => None,
        }
    }

    /// Builds the error for a non-2xx response, preferring the server's own
    /// `message` field.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.trim().is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("API request failed with status {}", status));

        ApiError::Status { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::NotFound { status } => Some(*status),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ApiError::NotFound { status: 200 };
        assert_eq!(
            err.user_message(),
            "Failed to find service with this name. Please try rephrasing your query or check the spelling."
        );
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn test_status_uses_server_message() {
        let err = ApiError::from_status(429, r#"{"message":"Rate limit exceeded"}"#);
        assert_eq!(err.user_message(), "Rate limit exceeded");
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn test_status_synthesizes_message() {
        let err = ApiError::from_status(500, "<html>Internal Server Error</html>");
        assert_eq!(err.user_message(), "API request failed with status 500");

        let err = ApiError::from_status(404, r#"{"message":""}"#);
        assert_eq!(err.user_message(), "API request failed with status 404");

        let err = ApiError::from_status(502, "");
        assert_eq!(err.user_message(), "API request failed with status 502");
    }

    #[test]
    fn test_transport_fallback() {
        assert_eq!(
            ApiError::transport("").user_message(),
            "Failed to assess product. Please try again."
        );
        let err = ApiError::transport("error sending request for url (http://127.0.0.1:1/)");
        assert_eq!(err.user_message(), TRANSPORT_FALLBACK_MESSAGE);
        assert_eq!(
            err.detail(),
            Some("error sending request for url (http://127.0.0.1:1/)")
        );
        assert_eq!(ApiError::transport("  ").detail(), None);
        assert_eq!(ApiError::transport("x").status(), None);
    }
}
