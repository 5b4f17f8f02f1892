//! Server-push task status streaming.
//!
//! The server emits newline-delimited `data: <json>` frames over a long-lived
//! HTTP response. [`SseTaskStream`] buffers the raw bytes, splits them on line
//! boundaries, and decodes one [`TaskStatus`] per frame on demand.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::types::TaskStatus;

/// Raw bytes feeding the decoder; reqwest's body stream in production.
pub(crate) type ByteSource = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// Pull-based consumer of task status events.
///
/// The concrete implementation reads from the network; tests can substitute
/// any other implementor (or build an [`SseTaskStream`] over a canned byte
/// source) without I/O.
#[async_trait]
pub trait TaskStatusStream: Send {
    /// The task this stream is observing.
    fn task_id(&self) -> &str;

    /// Block until the next status update is available.
    ///
    /// Returns [`Error::EndOfStream`] when the connection is exhausted,
    /// [`Error::Cancelled`] once the session token has fired, and
    /// [`Error::Decode`] for a malformed frame payload. A decode failure
    /// consumes the offending frame; later calls continue with the rest of
    /// the stream.
    async fn next(&mut self) -> Result<TaskStatus>;

    /// Cancel the session and release the connection.
    ///
    /// Safe to call repeatedly, and safe when no connection was ever
    /// established.
    fn close(&mut self);
}

/// Status stream decoding newline-delimited `data:` frames from a server-push
/// connection.
pub struct SseTaskStream {
    task_id: String,
    cancel: CancellationToken,
    source: Option<ByteSource>,
    buffer: String,
}

impl std::fmt::Debug for SseTaskStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseTaskStream")
            .field("task_id", &self.task_id)
            .field("cancel", &self.cancel)
            .field("source", &self.source.is_some())
            .field("buffer", &self.buffer)
            .finish()
    }
}

impl SseTaskStream {
    pub(crate) fn new(
        task_id: impl Into<String>,
        cancel: CancellationToken,
        source: ByteSource,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            cancel,
            source: Some(source),
            buffer: String::new(),
        }
    }

    /// The token governing this session; cancelling it interrupts `next()`.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Pop the next complete line off the buffer, trimmed.
    fn next_buffered_line(&mut self) -> Option<String> {
        let end = self.buffer.find('\n')?;
        let line: String = self.buffer.drain(..=end).collect();
        Some(line.trim().to_string())
    }
}

#[async_trait]
impl TaskStatusStream for SseTaskStream {
    fn task_id(&self) -> &str {
        &self.task_id
    }

    async fn next(&mut self) -> Result<TaskStatus> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::cancelled());
            }

            // Drain complete lines before touching the connection.
            while let Some(line) = self.next_buffered_line() {
                if line.is_empty() || line.starts_with(':') {
                    continue;
                }
                if let Some(data) = line.strip_prefix("data:") {
                    return match serde_json::from_str(data.trim()) {
                        Ok(status) => Ok(status),
                        Err(e) => {
                            tracing::warn!(task_id = %self.task_id, error = %e,
                                "failed to decode status frame");
                            Err(Error::Decode(e))
                        }
                    };
                }
                // Other event fields (event:, id:, retry:) carry no status.
            }

            let Some(source) = self.source.as_mut() else {
                return Err(Error::EndOfStream);
            };

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(Error::cancelled()),
                chunk = source.next() => match chunk {
                    Some(Ok(bytes)) => self.buffer.push_str(&String::from_utf8_lossy(&bytes)),
                    Some(Err(e)) => return Err(Error::Http(e)),
                    None => {
                        // An unterminated trailing line never became a frame.
                        self.source = None;
                        return Err(Error::EndOfStream);
                    }
                },
            }
        }
    }

    fn close(&mut self) {
        self.cancel.cancel();
        self.source = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskState;

    fn stream_from_chunks(chunks: &[&str]) -> SseTaskStream {
        let items: Vec<reqwest::Result<Bytes>> = chunks
            .iter()
            .map(|chunk| Ok(Bytes::from(chunk.to_string())))
            .collect();
        SseTaskStream::new(
            "t1",
            CancellationToken::new(),
            Box::pin(futures::stream::iter(items)),
        )
    }

    #[tokio::test]
    async fn test_decodes_frames_in_order() {
        let mut stream = stream_from_chunks(&[
            "data: {\"taskId\":\"t1\",\"status\":\"processing\"}\n\n",
            "data: {\"taskId\":\"t1\",\"status\":\"completed\",\"result\":\"done\"}\n\n",
        ]);

        let first = stream.next().await.unwrap();
        assert_eq!(first.status, TaskState::Processing);

        let second = stream.next().await.unwrap();
        assert_eq!(second.status, TaskState::Completed);
        assert_eq!(second.result.as_deref(), Some("done"));

        assert!(matches!(stream.next().await, Err(Error::EndOfStream)));
        // Termination is repeatable.
        assert!(matches!(stream.next().await, Err(Error::EndOfStream)));
    }

    #[tokio::test]
    async fn test_reassembles_frames_split_across_chunks() {
        let mut stream = stream_from_chunks(&[
            "data: {\"taskId\":\"t1\",",
            "\"status\":\"proc",
            "essing\"}\n",
        ]);

        let status = stream.next().await.unwrap();
        assert_eq!(status.status, TaskState::Processing);
    }

    #[tokio::test]
    async fn test_skips_comments_blanks_and_foreign_fields() {
        let mut stream = stream_from_chunks(&[
            ": keep-alive\n\nevent: status\nretry: 500\ndata: {\"taskId\":\"t1\",\"status\":\"completed\"}\n",
        ]);

        let status = stream.next().await.unwrap();
        assert_eq!(status.status, TaskState::Completed);
    }

    #[tokio::test]
    async fn test_malformed_frame_does_not_poison_stream() {
        let mut stream = stream_from_chunks(&[
            "data: {malformed}\n",
            "data: {\"taskId\":\"t1\",\"status\":\"completed\"}\n",
        ]);

        assert!(matches!(stream.next().await, Err(Error::Decode(_))));

        let status = stream.next().await.unwrap();
        assert_eq!(status.status, TaskState::Completed);
    }

    #[tokio::test]
    async fn test_unterminated_trailing_line_is_discarded() {
        let mut stream =
            stream_from_chunks(&["data: {\"taskId\":\"t1\",\"status\":\"processing\"}"]);
        assert!(matches!(stream.next().await, Err(Error::EndOfStream)));
    }

    #[tokio::test]
    async fn test_precancelled_token_fails_before_reading() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut stream = SseTaskStream::new(
            "t1",
            cancel,
            Box::pin(futures::stream::iter(vec![Ok(Bytes::from_static(
                b"data: {\"taskId\":\"t1\",\"status\":\"completed\"}\n",
            ))])),
        );

        assert!(matches!(
            stream.next().await,
            Err(Error::Cancelled { last: None })
        ));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let mut stream = stream_from_chunks(&[
            "data: {\"taskId\":\"t1\",\"status\":\"processing\"}\n",
        ]);
        stream.close();
        stream.close();
        assert!(matches!(stream.next().await, Err(Error::Cancelled { .. })));
        assert_eq!(stream.task_id(), "t1");
    }

    #[tokio::test]
    async fn test_cancel_interrupts_blocked_read() {
        // A source that never yields keeps next() suspended at the read.
        let mut stream = SseTaskStream::new(
            "t1",
            CancellationToken::new(),
            Box::pin(futures::stream::pending()),
        );
        let cancel = stream.cancellation_token().clone();

        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            cancel.cancel();
        });

        let result = tokio::time::timeout(std::time::Duration::from_secs(2), stream.next()).await;
        assert!(matches!(result, Ok(Err(Error::Cancelled { .. }))));
    }
}
