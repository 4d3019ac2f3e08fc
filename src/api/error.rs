/// Failure of a call made on behalf of the user.
///
/// `Display` is the message rendered inline on the page, so every variant
/// formats to something a person can read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Form input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The API answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request never produced a response.
    #[error("Unable to reach the server. Please try again.")]
    Network(String),

    #[error("{0}")]
    Unexpected(String),
}

impl ClientError {
    /// Builds the error for a non-2xx response, preferring the body's
    /// `message` field over a status-derived fallback.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));

        ClientError::Http { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
