//! HTTP client SDK for the TaskForce AI task orchestration API.
//!
//! Submit a natural-language prompt, receive a task identifier, then observe
//! the task's lifecycle either by fixed-interval polling or by consuming the
//! server-push status stream.
//!
//! # Example
//!
//! ```no_run
//! use taskforce_client::{PollOptions, TaskForceClient, TaskStatusStream};
//!
//! # async fn example() -> taskforce_client::Result<()> {
//! let client = TaskForceClient::builder()
//!     .api_key("secret")
//!     .build()?;
//!
//! // Submit and poll to completion, watching progress.
//! let task_id = client.tasks().submit("index the design docs", None).await?;
//! let status = client
//!     .tasks()
//!     .wait_with_updates(&task_id, PollOptions::default(), |status| {
//!         println!("status: {}", status.status);
//!     })
//!     .await?;
//! println!("result: {:?}", status.result);
//!
//! // Or consume the server-push stream instead.
//! let mut stream = client.tasks().run_stream("summarize the backlog", None).await?;
//! loop {
//!     match stream.next().await {
//!         Ok(status) => println!("status: {}", status.status),
//!         Err(e) if e.is_end_of_stream() => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! stream.close();
//! # Ok(())
//! # }
//! ```
//!
//! # API coverage
//!
//! - **Tasks**: submit, fetch status, poll to completion, stream status
//!   updates
//! - **Threads**: create, list, delete, messages, run-in-thread
//! - **Files**: upload, list, delete, download

pub mod api;
pub mod client;
pub mod error;
pub mod stream;
pub mod types;

pub use client::{ClientBuilder, ResponseHook, TaskForceClient};
pub use error::{Error, Result};
pub use stream::{SseTaskStream, TaskStatusStream};
pub use types::*;

// Re-export API types that are commonly passed to client methods
pub use api::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, Page, PollOptions};
