//! Request and response types for the TaskForce AI API.
//!
//! These types mirror the server's API contract. Task endpoints use
//! camelCase field names on the wire; thread and file endpoints use
//! snake_case.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// Task lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle state reported by the server.
///
/// Status strings this client version does not recognize are preserved
/// verbatim as [`TaskState::Other`] and treated as still in flight, so new
/// server-side states never break older clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    /// Task is being worked on.
    Processing,
    /// Task finished successfully.
    Completed,
    /// Task finished with an error.
    Failed,
    /// A status string introduced after this client version.
    Other(String),
}

impl TaskState {
    /// True only for the completed and failed states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }

    /// The wire representation of the state.
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Processing => "processing",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Other(value) => value,
        }
    }
}

impl From<String> for TaskState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "processing" => TaskState::Processing,
            "completed" => TaskState::Completed,
            "failed" => TaskState::Failed,
            _ => TaskState::Other(value),
        }
    }
}

impl From<TaskState> for String {
    fn from(value: TaskState) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Task ID.
    #[serde(rename = "taskId")]
    pub task_id: String,
    /// Lifecycle state.
    pub status: TaskState,
    /// Final output; set only once the task completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Failure detail; set only when the task failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Non-fatal notices, in the order the server produced them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Arbitrary metadata attached by the server.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Parameters accepted when submitting a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmissionOptions {
    /// Model to run the prompt against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Suppress server-side progress notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Run against the mock execution backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock: Option<bool>,
    /// Provider key forwarded with the submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_key: Option<String>,
    /// Arbitrary metadata stored with the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl TaskSubmissionOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model.
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Response from task submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTaskResponse {
    /// Identifier of the newly created task.
    #[serde(rename = "taskId")]
    pub task_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Threads
// ─────────────────────────────────────────────────────────────────────────────

/// A conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Thread ID.
    pub id: i64,
    /// Thread title.
    pub title: String,
    /// Creation time (ISO 8601).
    pub created_at: String,
    /// Last update time (ISO 8601).
    pub updated_at: String,
}

/// A message within a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// Message ID.
    pub id: i64,
    /// Owning thread.
    pub thread_id: i64,
    /// Role of the sender (user, assistant).
    pub role: String,
    /// Message content.
    pub content: String,
    /// Creation time.
    pub created_at: String,
}

/// Request to create a thread.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateThreadOptions {
    /// Optional title for the thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Seed messages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ThreadMessage>,
    /// Metadata to attach to the thread.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Response for list threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadListResponse {
    /// List of threads.
    pub threads: Vec<Thread>,
    /// Total count.
    pub total: usize,
}

/// Response for thread messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessagesResponse {
    /// Messages in the thread.
    pub messages: Vec<ThreadMessage>,
    /// Total count.
    pub total: usize,
}

/// Request to run a prompt within a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRunOptions {
    /// The prompt to run.
    pub prompt: String,
    /// Model override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Submission options forwarded to the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<HashMap<String, serde_json::Value>>,
}

impl ThreadRunOptions {
    /// Create run options with just a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: None,
            options: None,
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }
}

/// Result of running a prompt in a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRunResponse {
    /// Identifier of the spawned task.
    pub task_id: String,
    /// Owning thread.
    pub thread_id: i64,
    /// Message recorded for the prompt.
    pub message_id: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Files
// ─────────────────────────────────────────────────────────────────────────────

/// An uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    /// File ID.
    pub id: String,
    /// Original filename.
    pub filename: String,
    /// Declared purpose (assistants, fine-tune, ...).
    pub purpose: String,
    /// Size in bytes.
    pub bytes: i64,
    /// Creation time.
    pub created_at: String,
    /// MIME type, when the server detected one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Options for uploading a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileUploadOptions {
    /// Declared purpose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// MIME type override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Response for list files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    /// List of files.
    pub files: Vec<File>,
    /// Total count.
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_state_round_trip() {
        let state: TaskState = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(state, TaskState::Processing);
        assert!(!state.is_terminal());

        let state: TaskState = serde_json::from_str("\"completed\"").unwrap();
        assert!(state.is_terminal());
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"completed\"");
    }

    #[test]
    fn test_unknown_status_preserved_and_non_terminal() {
        let state: TaskState = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(state, TaskState::Other("paused".to_string()));
        assert!(!state.is_terminal());
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"paused\"");
        assert_eq!(state.to_string(), "paused");
    }

    #[test]
    fn test_task_status_minimal_payload() {
        let status: TaskStatus =
            serde_json::from_str(r#"{"taskId":"t1","status":"processing"}"#).unwrap();
        assert_eq!(status.task_id, "t1");
        assert_eq!(status.status, TaskState::Processing);
        assert!(status.result.is_none());
        assert!(status.error.is_none());
        assert!(status.warnings.is_empty());
        assert!(status.metadata.is_empty());
    }

    #[test]
    fn test_task_status_ignores_unknown_fields() {
        let status: TaskStatus = serde_json::from_str(
            r#"{"taskId":"t1","status":"completed","result":"done","progress":42,"phase":"x"}"#,
        )
        .unwrap();
        assert_eq!(status.result.as_deref(), Some("done"));
    }

    #[test]
    fn test_task_status_warnings_order() {
        let status: TaskStatus = serde_json::from_str(
            r#"{"taskId":"t1","status":"processing","warnings":["first","second"]}"#,
        )
        .unwrap();
        assert_eq!(status.warnings, vec!["first", "second"]);
    }

    #[test]
    fn test_submission_options_skip_unset_fields() {
        let options = TaskSubmissionOptions::new();
        assert_eq!(serde_json::to_string(&options).unwrap(), "{}");

        let options = TaskSubmissionOptions::new().with_model("gpt-x");
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json, serde_json::json!({"modelId": "gpt-x"}));
    }

    #[test]
    fn test_submission_options_camel_case_keys() {
        let options = TaskSubmissionOptions {
            extra_key: Some("k".to_string()),
            mock: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json, serde_json::json!({"mock": true, "extraKey": "k"}));
    }

    #[test]
    fn test_create_thread_options_skip_empty() {
        let options = CreateThreadOptions::default();
        assert_eq!(serde_json::to_string(&options).unwrap(), "{}");
    }

    #[test]
    fn test_thread_run_response_snake_case() {
        let response: ThreadRunResponse =
            serde_json::from_str(r#"{"task_id":"t1","thread_id":7,"message_id":9}"#).unwrap();
        assert_eq!(response.task_id, "t1");
        assert_eq!(response.thread_id, 7);
    }
}
