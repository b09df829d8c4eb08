//! Per-request response handling state machine.

use crate::aggregator::{Aggregation, StreamAggregator, StreamError};
use crate::classifier::classify_throttling;
use bytes::Bytes;
use futures::Stream;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use tensorgate_core::{
    Connector, ContentGuard, ExecutionContext, OutputProcessor, RemoteError, ResponseListener,
    SequencedTensors,
};

/// The top-level state machine for one remote inference response.
///
/// The transport layer drives a handler through its lifecycle callbacks
/// [`on_headers`](Self::on_headers), [`on_stream`](Self::on_stream), and
/// [`on_error`](Self::on_error), possibly from different worker tasks; no
/// callback may block. On stream termination (success or error) the handler
/// resolves exactly one terminal outcome and delivers it to the caller's
/// listener.
///
/// Three detection paths can race to record a failure: the header scan, the
/// stream error path, and the processing path. The failure slot is a
/// first-write-wins compare-and-set, so the earliest classification is the
/// one delivered. The listener sits behind a take-once slot; late resolutions
/// find it empty and are dropped.
pub struct ResponseHandler {
    context: ExecutionContext,
    connector: Arc<Connector>,
    processor: Arc<dyn OutputProcessor>,
    guard: Option<Arc<dyn ContentGuard>>,
    parameters: HashMap<String, String>,
    listener: Mutex<Option<ResponseListener>>,
    // 0 encodes "no status recorded yet"; real HTTP statuses are >= 100.
    status_code: AtomicU16,
    failure: OnceLock<RemoteError>,
}

impl fmt::Debug for ResponseHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseHandler")
            .field("sequence", &self.context.sequence())
            .field("connector", &self.connector.name)
            .field("status_code", &self.recorded_status())
            .finish_non_exhaustive()
    }
}

impl ResponseHandler {
    /// Create a handler for one request.
    #[must_use]
    pub fn new(
        context: ExecutionContext,
        connector: Arc<Connector>,
        processor: Arc<dyn OutputProcessor>,
        listener: ResponseListener,
    ) -> Self {
        Self {
            context,
            connector,
            processor,
            guard: None,
            parameters: HashMap::new(),
            listener: Mutex::new(Some(listener)),
            status_code: AtomicU16::new(0),
            failure: OnceLock::new(),
        }
    }

    /// Builder: attach a content guard applied to the processed result.
    #[must_use]
    pub fn with_guard(mut self, guard: Arc<dyn ContentGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Builder: attach the request parameters handed to the processor.
    #[must_use]
    pub fn with_parameters(mut self, parameters: HashMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Record the response status and scan headers for vendor error signals.
    ///
    /// Producers may omit this callback entirely; resolution then runs with
    /// no recorded status.
    pub fn on_headers(&self, headers: &HeaderMap, status: StatusCode) {
        tracing::debug!(status = status.as_u16(), "received response headers");
        self.status_code.store(status.as_u16(), Ordering::Release);
        if !status.is_success() {
            if let Some(throttling) = classify_throttling(headers, status) {
                tracing::error!(
                    status = status.as_u16(),
                    "remote server signaled throttling in response headers"
                );
                self.record_failure(throttling);
            }
            // Further header-borne vendor signals would be classified here.
        }
    }

    /// Attach to the response byte stream and resolve on its termination.
    ///
    /// Aggregation happens chunk by chunk as the producer delivers them; a
    /// mid-stream error resolves with the partial body aggregated so far.
    pub async fn on_stream<S>(&self, stream: S)
    where
        S: Stream<Item = Result<Bytes, StreamError>> + Send,
    {
        let aggregation = StreamAggregator::new().run(stream).await;
        self.resolve(aggregation);
    }

    /// Transport-level failure before or without a clean stream termination.
    ///
    /// Does not depend on body aggregation. Reports the recorded status, or
    /// 500 when none ever arrived.
    pub fn on_error<E: fmt::Display>(&self, error: E) {
        let status = self.recorded_status().unwrap_or(500);
        tracing::error!(status, error = %error, "error communicating with remote model");
        self.record_failure(RemoteError::Transport {
            status,
            message: error.to_string(),
        });
        self.deliver_failure();
    }

    /// The status recorded by [`on_headers`](Self::on_headers), if any.
    #[must_use]
    pub fn recorded_status(&self) -> Option<u16> {
        match self.status_code.load(Ordering::Acquire) {
            0 => None,
            status => Some(status),
        }
    }

    /// Terminal resolution: body → outcome, delivered at most once.
    fn resolve(&self, aggregation: Aggregation) {
        let body = aggregation.body;
        if body.trim().is_empty() {
            tracing::error!("remote model response body is empty");
            self.record_failure(RemoteError::EmptyBody);
        } else {
            match self.recorded_status() {
                Some(status) if !(200..300).contains(&status) => {
                    tracing::error!(status, "remote server returned error code");
                    self.record_failure(RemoteError::non_success(status, &body));
                }
                recorded => {
                    match self.processor.process(
                        &body,
                        &self.connector,
                        &self.parameters,
                        self.guard.as_deref(),
                    ) {
                        Ok(mut tensors) => {
                            if let Some(status) = recorded {
                                tensors.set_status_code(status);
                            }
                            let sequence = self.context.sequence();
                            if let Some(listener) = self.take_listener() {
                                tracing::debug!(sequence, "delivering processed response");
                                listener.on_response(SequencedTensors { sequence, tensors });
                            } else {
                                tracing::debug!(
                                    sequence,
                                    "terminal outcome already delivered, dropping late response"
                                );
                            }
                            return;
                        }
                        Err(error) => {
                            tracing::error!(error = %error, "failed to process response body");
                            self.record_failure(RemoteError::Processing {
                                message: error.to_string(),
                            });
                        }
                    }
                }
            }
        }
        self.deliver_failure();
    }

    /// First writer wins; racing detection paths drop theirs.
    fn record_failure(&self, error: RemoteError) {
        if self.failure.set(error).is_err() {
            tracing::debug!("failure already recorded, keeping the first one");
        }
    }

    /// Deliver the recorded failure, unless an outcome already went out.
    fn deliver_failure(&self) {
        if let Some(listener) = self.take_listener() {
            let error = match self.failure.get() {
                Some(error) => error.clone(),
                // Unreachable by construction: every caller records first.
                None => RemoteError::Transport {
                    status: 500,
                    message: "terminal resolution reached without a recorded failure".to_string(),
                },
            };
            listener.on_failure(error);
        } else {
            tracing::debug!("terminal outcome already delivered, dropping late failure");
        }
    }

    /// Take the listener out of its slot; the lock guards a single `take`.
    fn take_listener(&self) -> Option<ResponseListener> {
        match self.listener.lock() {
            Ok(mut slot) => slot.take(),
            // A poisoned lock still holds the slot.
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tensorgate_core::JsonOutputProcessor;

    fn make_handler()
    -> (ResponseHandler, tokio::sync::oneshot::Receiver<tensorgate_core::InferenceResult>) {
        let (listener, rx) = ResponseListener::channel();
        let handler = ResponseHandler::new(
            ExecutionContext::new(0),
            Arc::new(Connector::new("test", "https://models.example.com/invoke")),
            Arc::new(JsonOutputProcessor),
            listener,
        );
        (handler, rx)
    }

    #[test]
    fn test_records_status_from_headers() {
        let (handler, _rx) = make_handler();
        assert_eq!(handler.recorded_status(), None);
        handler.on_headers(&HeaderMap::new(), StatusCode::OK);
        assert_eq!(handler.recorded_status(), Some(200));
    }

    #[test]
    fn test_success_status_skips_classifier() {
        let mut headers = HeaderMap::new();
        headers.insert(
            crate::classifier::AMZN_ERROR_HEADER,
            reqwest::header::HeaderValue::from_static("ThrottlingException"),
        );
        let (handler, _rx) = make_handler();
        // In the success range the header scan must not run at all.
        handler.on_headers(&headers, StatusCode::OK);
        assert!(handler.failure.get().is_none());
    }

    #[tokio::test]
    async fn test_on_error_defaults_to_internal_server_error() {
        let (handler, rx) = make_handler();
        handler.on_error("connection reset by peer");

        let Ok(Err(error)) = rx.await else {
            unreachable!()
        };
        assert_eq!(error.status_code(), 500);
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn test_on_error_uses_recorded_status() {
        let (handler, rx) = make_handler();
        handler.on_headers(&HeaderMap::new(), StatusCode::BAD_GATEWAY);
        handler.on_error("broken pipe");

        let Ok(Err(RemoteError::Transport { status, message })) = rx.await else {
            unreachable!()
        };
        assert_eq!(status, 502);
        assert!(message.contains("broken pipe"));
    }

    #[tokio::test]
    async fn test_second_resolution_is_dropped() {
        let (handler, rx) = make_handler();
        handler.on_error("first");
        // A racing stream termination after the transport error must be a no-op.
        handler
            .on_stream(stream::iter(vec![Ok(Bytes::from_static(b"{}"))]))
            .await;

        let Ok(Err(RemoteError::Transport { message, .. })) = rx.await else {
            unreachable!()
        };
        assert!(message.contains("first"));
    }
}
