//! API endpoint implementations.

mod files;
mod tasks;
mod threads;

pub use files::FilesApi;
pub use tasks::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, PollOptions, TasksApi};
pub use threads::ThreadsApi;

use serde::Serialize;

/// Pagination window for list endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Page {
    /// Maximum number of items to return.
    pub limit: usize,
    /// Number of items to skip.
    pub offset: usize,
}

impl Page {
    /// Create a page with the given window.
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}
