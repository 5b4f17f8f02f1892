//! Task lifecycle API: submission, polling, and streaming.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::TaskForceClient;
use crate::error::{Error, Result};
use crate::stream::SseTaskStream;
use crate::types::{SubmitTaskResponse, TaskState, TaskStatus, TaskSubmissionOptions};

/// Default delay between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of polls before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Knobs for [`TasksApi::wait_for_completion`].
#[derive(Debug, Clone, Default)]
pub struct PollOptions {
    /// Delay between polls; zero selects the 1 second default.
    pub interval: Duration,
    /// Poll budget; zero selects the default of 60.
    pub max_attempts: u32,
    /// Token governing the poll session. Cancelling it interrupts the
    /// inter-poll wait; an in-flight fetch is never preempted.
    pub cancel: CancellationToken,
}

impl PollOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay between polls.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the poll budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the governing cancellation token.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

#[derive(serde::Serialize)]
struct SubmitBody<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a TaskSubmissionOptions>,
}

/// Task lifecycle API client.
pub struct TasksApi {
    client: TaskForceClient,
}

impl TasksApi {
    pub(crate) fn new(client: TaskForceClient) -> Self {
        Self { client }
    }

    /// Submit a prompt for execution, returning the new task's identifier.
    ///
    /// Submission is not idempotent: calling twice creates two tasks.
    pub async fn submit(
        &self,
        prompt: &str,
        options: Option<TaskSubmissionOptions>,
    ) -> Result<String> {
        if prompt.is_empty() {
            return Err(Error::InvalidArgument("prompt is required".to_string()));
        }

        let mut options = options;
        if self.client.mock_mode() {
            let opts = options.get_or_insert_with(TaskSubmissionOptions::default);
            if opts.mock.is_none() {
                opts.mock = Some(true);
            }
        }

        let body = SubmitBody {
            prompt,
            options: options.as_ref(),
        };
        let response = self.client.post_response("run", &body).await?;
        let status = response.status().as_u16();
        if status != 200 && status != 202 {
            return Err(Error::Api { status });
        }

        let submitted: SubmitTaskResponse = self.client.decode(response).await?;
        debug!(task_id = %submitted.task_id, "task submitted");
        Ok(submitted.task_id)
    }

    /// Fetch the current status of a task.
    pub async fn status(&self, task_id: &str) -> Result<TaskStatus> {
        self.client.get(&format!("status/{}", task_id)).await
    }

    /// Poll a task at a fixed interval until it reaches a terminal state.
    ///
    /// Returns the completed status on success. A failed task surfaces as
    /// [`Error::TaskFailed`] carrying the last fetched status; exhausting the
    /// poll budget surfaces as [`Error::Timeout`]; cancelling the token in
    /// `options` surfaces as [`Error::Cancelled`] carrying the last observed
    /// status. A status fetch error is fatal to the poll and propagates
    /// unchanged.
    pub async fn wait_for_completion(
        &self,
        task_id: &str,
        options: PollOptions,
    ) -> Result<TaskStatus> {
        self.poll(task_id, options, None).await
    }

    /// Like [`TasksApi::wait_for_completion`], invoking `on_update` with
    /// every status fetched, in order, before terminal conditions are
    /// evaluated.
    pub async fn wait_with_updates<F>(
        &self,
        task_id: &str,
        options: PollOptions,
        mut on_update: F,
    ) -> Result<TaskStatus>
    where
        F: FnMut(&TaskStatus) + Send,
    {
        self.poll(task_id, options, Some(&mut on_update)).await
    }

    async fn poll(
        &self,
        task_id: &str,
        options: PollOptions,
        mut on_update: Option<&mut (dyn FnMut(&TaskStatus) + Send)>,
    ) -> Result<TaskStatus> {
        let interval = if options.interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            options.interval
        };
        let max_attempts = if options.max_attempts == 0 {
            DEFAULT_MAX_ATTEMPTS
        } else {
            options.max_attempts
        };
        let cancel = options.cancel;

        for _ in 0..max_attempts {
            let status = self.status(task_id).await?;

            if let Some(on_update) = on_update.as_deref_mut() {
                on_update(&status);
            }

            match status.status {
                TaskState::Completed => return Ok(status),
                TaskState::Failed => {
                    let message = status
                        .error
                        .clone()
                        .unwrap_or_else(|| "task failed".to_string());
                    return Err(Error::TaskFailed {
                        message,
                        status: Box::new(status),
                    });
                }
                // Unknown states are in flight; keep polling.
                _ => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(Error::Cancelled {
                        last: Some(Box::new(status)),
                    });
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }

        Err(Error::Timeout)
    }

    /// Open a server-push status stream for a task.
    ///
    /// The stream owns its own session token; use
    /// [`TasksApi::stream_with_cancel`] to tie it to a caller-held token.
    pub async fn stream(&self, task_id: &str) -> Result<SseTaskStream> {
        self.stream_with_cancel(task_id, CancellationToken::new())
            .await
    }

    /// Open a status stream whose session token is a child of `cancel`.
    pub async fn stream_with_cancel(
        &self,
        task_id: &str,
        cancel: CancellationToken,
    ) -> Result<SseTaskStream> {
        let session = cancel.child_token();
        if session.is_cancelled() {
            return Err(Error::cancelled());
        }

        let response = self.client.get_stream(&format!("stream/{}", task_id)).await?;
        debug!(task_id, "status stream opened");
        Ok(SseTaskStream::new(
            task_id,
            session,
            Box::pin(response.bytes_stream()),
        ))
    }

    /// Submit a prompt and poll the resulting task to completion.
    pub async fn run(
        &self,
        prompt: &str,
        options: Option<TaskSubmissionOptions>,
        poll: PollOptions,
    ) -> Result<TaskStatus> {
        let task_id = self.submit(prompt, options).await?;
        self.wait_for_completion(&task_id, poll).await
    }

    /// Submit a prompt and open a status stream for the resulting task.
    pub async fn run_stream(
        &self,
        prompt: &str,
        options: Option<TaskSubmissionOptions>,
    ) -> Result<SseTaskStream> {
        let task_id = self.submit(prompt, options).await?;
        self.stream(&task_id).await
    }
}
