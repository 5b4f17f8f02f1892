//! Client error types.

use thiserror::Error;

use crate::types::TaskStatus;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied input was rejected before any request was made.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Server returned a non-success status code.
    #[error("API error: status {status}")]
    Api {
        /// HTTP status code.
        status: u16,
    },

    /// Response body or stream frame could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The task reached the failed state.
    #[error("task failed: {message}")]
    TaskFailed {
        /// The task's `error` field, or a generic message when it was absent.
        message: String,
        /// The failed status as last fetched.
        status: Box<TaskStatus>,
    },

    /// Polling attempts were exhausted without a terminal status.
    #[error("task timed out")]
    Timeout,

    /// The governing cancellation token fired.
    #[error("operation cancelled")]
    Cancelled {
        /// Last status observed before cancellation, if any.
        last: Option<Box<TaskStatus>>,
    },

    /// The stream was exhausted with no further events. A termination
    /// signal, not a fault.
    #[error("end of stream")]
    EndOfStream,

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn cancelled() -> Self {
        Error::Cancelled { last: None }
    }

    /// The best-known task status at the point the operation failed, if one
    /// was observed. Lets callers inspect warnings and partial state even on
    /// a failed or cancelled poll.
    pub fn last_status(&self) -> Option<&TaskStatus> {
        match self {
            Error::TaskFailed { status, .. } => Some(status),
            Error::Cancelled { last, .. } => last.as_deref(),
            _ => None,
        }
    }

    /// Check if this is the normal end-of-stream signal.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::EndOfStream)
    }

    /// Check if this is a caller-initiated cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }

    /// Check if this is a poll timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskState;

    fn failed_status() -> TaskStatus {
        TaskStatus {
            task_id: "t1".to_string(),
            status: TaskState::Failed,
            result: None,
            error: Some("boom".to_string()),
            warnings: vec!["slow".to_string()],
            metadata: Default::default(),
        }
    }

    #[test]
    fn test_task_failed_carries_status() {
        let err = Error::TaskFailed {
            message: "boom".to_string(),
            status: Box::new(failed_status()),
        };
        assert!(err.to_string().contains("boom"));
        let status = err.last_status().unwrap();
        assert_eq!(status.task_id, "t1");
        assert_eq!(status.warnings, vec!["slow".to_string()]);
    }

    #[test]
    fn test_cancelled_last_status() {
        let err = Error::Cancelled {
            last: Some(Box::new(failed_status())),
        };
        assert!(err.is_cancelled());
        assert!(err.last_status().is_some());

        let err = Error::cancelled();
        assert!(err.is_cancelled());
        assert!(err.last_status().is_none());
    }

    #[test]
    fn test_end_of_stream_is_not_other_kinds() {
        let err = Error::EndOfStream;
        assert!(err.is_end_of_stream());
        assert!(!err.is_cancelled());
        assert!(!err.is_timeout());
        assert!(err.last_status().is_none());
    }
}
