use thiserror::Error;

/// Typed error for calls to the counting worker.
///
/// The player treats every variant the same way (log, then fall back), but
/// keeping them apart makes the logs useful.
#[derive(Error, Debug, Clone)]
pub enum WorkerApiError {
    /// The configured base URL can't be parsed
    #[error("Invalid worker URL: {0}")]
    InvalidUrl(String),

    /// Network/connection errors (timeout, connection refused, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("Worker returned {status}: {message}")]
    Http { status: u16, message: String },

    /// Body was not JSON or lacked an expected field
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Worker API error: {0}")]
    Other(String),
}

impl WorkerApiError {
    /// Check if retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            WorkerApiError::Network(_) => true,
            WorkerApiError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            WorkerApiError::Network(format!("Request timeout: {}", error))
        } else if error.is_connect() {
            WorkerApiError::Network(format!("Connection failed: {}", error))
        } else if error.is_request() {
            WorkerApiError::Network(format!("Request error: {}", error))
        } else if error.is_decode() {
            WorkerApiError::ParseError(error.to_string())
        } else {
            WorkerApiError::Other(error.to_string())
        }
    }

    pub fn from_status(status: u16, body: String) -> Self {
        WorkerApiError::Http {
            status,
            message: body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(WorkerApiError::Network("refused".into()).is_transient());
        assert!(WorkerApiError::from_status(503, String::new()).is_transient());
        assert!(WorkerApiError::from_status(429, String::new()).is_transient());
        assert!(!WorkerApiError::from_status(404, "not found".into()).is_transient());
        assert!(!WorkerApiError::ParseError("missing field `views`".into()).is_transient());
    }

    #[test]
    fn test_display() {
        let error = WorkerApiError::from_status(500, "boom".into());
        assert_eq!(error.to_string(), "Worker returned 500: boom");
    }
}
