//! Streaming body aggregation.
//!
//! The aggregator drains a chunked byte stream into a text body. Demand
//! policy is deliberately eager: the loop polls continuously and never
//! throttles the producer. Response bodies for this workload are bounded
//! JSON payloads, not unbounded streams, so flow control buys nothing here;
//! the assumption is documented rather than silently dropped.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use thiserror::Error;

/// Stream-level failure while receiving body chunks.
///
/// `Unknown` covers producers that fail without a usable cause; it is
/// distinguished from `Transport` in logging only, and control flow treats
/// both identically.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    /// The transport reported a cause
    #[error("{message}")]
    Transport {
        /// Underlying transport message
        message: String,
    },
    /// The producer failed without a usable cause
    #[error("unknown stream failure")]
    Unknown,
}

/// Outcome of draining one response stream.
///
/// `body` holds everything aggregated before the stream ended. When a chunk
/// error ended aggregation, that is the partial body; it is never discarded.
#[derive(Debug)]
pub struct Aggregation {
    /// Aggregated (possibly partial) response body
    pub body: String,
    /// The chunk error that ended aggregation, if any
    pub error: Option<StreamError>,
}

/// Accumulates a response body from a chunked byte stream in producer order.
#[derive(Debug, Default)]
pub struct StreamAggregator {
    body: String,
}

impl StreamAggregator {
    /// Create an aggregator with an empty body buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            body: String::new(),
        }
    }

    /// Drain `stream` to its end or first error.
    ///
    /// Each chunk is decoded as UTF-8 (lossily) and appended in producer
    /// order. Normal end-of-stream and chunk error converge on the same
    /// [`Aggregation`] outcome.
    pub async fn run<S>(mut self, stream: S) -> Aggregation
    where
        S: Stream<Item = Result<Bytes, StreamError>> + Send,
    {
        let mut stream = std::pin::pin!(stream);
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => self.body.push_str(&String::from_utf8_lossy(&bytes)),
                Err(error) => {
                    match &error {
                        StreamError::Unknown => {
                            tracing::error!(
                                "error receiving response body from remote: unknown failure"
                            );
                        }
                        StreamError::Transport { message } => {
                            tracing::error!(%message, "error receiving response body from remote");
                        }
                    }
                    return Aggregation {
                        body: self.body,
                        error: Some(error),
                    };
                }
            }
        }
        Aggregation {
            body: self.body,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(parts: &[&str]) -> Vec<Result<Bytes, StreamError>> {
        parts
            .iter()
            .map(|part| Ok(Bytes::copy_from_slice(part.as_bytes())))
            .collect()
    }

    #[tokio::test]
    async fn test_aggregates_chunks_in_order() {
        let aggregation = StreamAggregator::new()
            .run(stream::iter(chunks(&["{\"a\":", " 1", "}"])))
            .await;
        assert_eq!(aggregation.body, "{\"a\": 1}");
        assert_eq!(aggregation.error, None);
    }

    #[tokio::test]
    async fn test_empty_stream_yields_empty_body() {
        let aggregation = StreamAggregator::new()
            .run(stream::iter(chunks(&[])))
            .await;
        assert_eq!(aggregation.body, "");
        assert_eq!(aggregation.error, None);
    }

    #[tokio::test]
    async fn test_error_preserves_partial_body() {
        let mut items = chunks(&["partial", " body"]);
        items.push(Err(StreamError::Transport {
            message: "connection reset".to_string(),
        }));
        items.push(Ok(Bytes::from_static(b"never seen")));

        let aggregation = StreamAggregator::new().run(stream::iter(items)).await;
        assert_eq!(aggregation.body, "partial body");
        assert!(matches!(
            aggregation.error,
            Some(StreamError::Transport { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_error_treated_like_transport_error() {
        let items = vec![
            Ok(Bytes::from_static(b"some")),
            Err(StreamError::Unknown),
        ];
        let aggregation = StreamAggregator::new().run(stream::iter(items)).await;
        assert_eq!(aggregation.body, "some");
        assert_eq!(aggregation.error, Some(StreamError::Unknown));
    }

    #[tokio::test]
    async fn test_invalid_utf8_decoded_lossily() {
        let items = vec![Ok(Bytes::from_static(&[0xff, 0xfe, b'o', b'k']))];
        let aggregation = StreamAggregator::new().run(stream::iter(items)).await;
        assert!(aggregation.body.ends_with("ok"));
    }
}
