//! Threads API.

use crate::api::Page;
use crate::client::TaskForceClient;
use crate::error::{Error, Result};
use crate::types::{
    CreateThreadOptions, Thread, ThreadListResponse, ThreadMessagesResponse, ThreadRunOptions,
    ThreadRunResponse,
};

/// Threads API client.
pub struct ThreadsApi {
    client: TaskForceClient,
}

impl ThreadsApi {
    pub(crate) fn new(client: TaskForceClient) -> Self {
        Self { client }
    }

    /// Create a new conversation thread.
    pub async fn create(&self, options: CreateThreadOptions) -> Result<Thread> {
        self.client.post("threads", &options).await
    }

    /// List threads.
    pub async fn list(&self, page: Page) -> Result<ThreadListResponse> {
        self.client.get_with_query("threads", &page).await
    }

    /// Get a thread by ID.
    pub async fn get(&self, thread_id: i64) -> Result<Thread> {
        self.client.get(&format!("threads/{}", thread_id)).await
    }

    /// Delete a thread by ID.
    pub async fn delete(&self, thread_id: i64) -> Result<()> {
        self.client.delete(&format!("threads/{}", thread_id)).await
    }

    /// Get messages from a thread.
    pub async fn messages(&self, thread_id: i64, page: Page) -> Result<ThreadMessagesResponse> {
        self.client
            .get_with_query(&format!("threads/{}/messages", thread_id), &page)
            .await
    }

    /// Submit a prompt within a thread, spawning a task tied to it.
    pub async fn run(
        &self,
        thread_id: i64,
        options: ThreadRunOptions,
    ) -> Result<ThreadRunResponse> {
        if options.prompt.is_empty() {
            return Err(Error::InvalidArgument("prompt is required".to_string()));
        }
        self.client
            .post(&format!("threads/{}/runs", thread_id), &options)
            .await
    }
}
