//! # Tensorgate Testing
//!
//! Testing utilities and mocks for the tensorgate pipeline.
//!
//! This crate provides:
//! - Chunk-stream builders simulating producer byte streams, with or without
//!   mid-stream errors
//! - Stub output processors with fixed success or failure behavior
//! - Guards that reject everything or redact matched text
//!
//! ## Example
//!
//! ```
//! use tensorgate_testing::mocks::chunk_stream;
//! use tensorgate_engine::StreamAggregator;
//!
//! # async fn example() {
//! let aggregation = StreamAggregator::new()
//!     .run(chunk_stream(&["{\"result\":", " [1, 2]}"]))
//!     .await;
//! assert_eq!(aggregation.body, "{\"result\": [1, 2]}");
//! # }
//! ```

/// Mock implementations of the pipeline's producer and capability seams.
pub mod mocks {
    use bytes::Bytes;
    use futures::Stream;
    use std::collections::HashMap;
    use tensorgate_core::{
        Connector, ContentGuard, GuardRejection, ModelTensors, OutputProcessor, ProcessingError,
    };
    use tensorgate_engine::StreamError;

    /// A producer stream delivering `parts` as separate chunks.
    ///
    /// Each chunk is yielded after a task yield, so consumers observe real
    /// suspension points between chunks.
    pub fn chunk_stream(
        parts: &[&str],
    ) -> impl Stream<Item = Result<Bytes, StreamError>> + Send + use<> {
        let parts: Vec<Bytes> = parts
            .iter()
            .map(|part| Bytes::copy_from_slice(part.as_bytes()))
            .collect();
        async_stream::stream! {
            for part in parts {
                tokio::task::yield_now().await;
                yield Ok(part);
            }
        }
    }

    /// A producer stream delivering `parts`, then failing with `error`.
    pub fn failing_chunk_stream(
        parts: &[&str],
        error: StreamError,
    ) -> impl Stream<Item = Result<Bytes, StreamError>> + Send + use<> {
        let parts: Vec<Bytes> = parts
            .iter()
            .map(|part| Bytes::copy_from_slice(part.as_bytes()))
            .collect();
        async_stream::stream! {
            for part in parts {
                tokio::task::yield_now().await;
                yield Ok(part);
            }
            yield Err(error);
        }
    }

    /// Processor returning a fixed result regardless of the body.
    #[derive(Clone, Debug)]
    pub struct StaticProcessor {
        /// The result every `process` call returns
        pub tensors: ModelTensors,
    }

    impl OutputProcessor for StaticProcessor {
        fn process(
            &self,
            _body: &str,
            _connector: &Connector,
            _parameters: &HashMap<String, String>,
            guard: Option<&dyn ContentGuard>,
        ) -> Result<ModelTensors, ProcessingError> {
            let tensors = self.tensors.clone();
            match guard {
                Some(guard) => Ok(guard.apply(tensors)?),
                None => Ok(tensors),
            }
        }
    }

    /// Processor failing every call with a malformed-body error.
    #[derive(Clone, Debug)]
    pub struct FailingProcessor {
        /// Message carried by the processing error
        pub message: String,
    }

    impl OutputProcessor for FailingProcessor {
        fn process(
            &self,
            _body: &str,
            _connector: &Connector,
            _parameters: &HashMap<String, String>,
            _guard: Option<&dyn ContentGuard>,
        ) -> Result<ModelTensors, ProcessingError> {
            Err(ProcessingError::MalformedBody(self.message.clone()))
        }
    }

    /// Guard vetoing every result.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct RejectAllGuard;

    impl ContentGuard for RejectAllGuard {
        fn apply(&self, _tensors: ModelTensors) -> Result<ModelTensors, GuardRejection> {
            Err(GuardRejection::new("rejected by policy"))
        }
    }

    /// Guard replacing `needle` with `replacement` across the result.
    ///
    /// Exercises the transform half of the guard contract: the result is
    /// redacted, not vetoed.
    #[derive(Clone, Debug)]
    pub struct RedactingGuard {
        /// Text to redact
        pub needle: String,
        /// Replacement text
        pub replacement: String,
    }

    impl ContentGuard for RedactingGuard {
        fn apply(&self, tensors: ModelTensors) -> Result<ModelTensors, GuardRejection> {
            let rendered = serde_json::to_string(&tensors)
                .map_err(|e| GuardRejection::new(format!("unrenderable result: {e}")))?;
            let redacted = rendered.replace(self.needle.as_str(), self.replacement.as_str());
            serde_json::from_str(&redacted)
                .map_err(|e| GuardRejection::new(format!("redaction broke the result: {e}")))
        }
    }
}
