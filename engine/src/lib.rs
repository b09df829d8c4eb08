//! # Tensorgate Engine
//!
//! The asynchronous response pipeline for remote model inference.
//!
//! The engine sits between a fire-and-forget async HTTP client and an
//! application-level completion listener. For each request it:
//!
//! 1. records response headers and scans them for vendor failure signals that
//!    a plain status-code check would miss ([`classifier`]),
//! 2. drains the chunked byte stream into an aggregated body under an
//!    explicit, deliberately eager demand policy ([`aggregator`]),
//! 3. resolves exactly one terminal outcome, either a processed and guarded
//!    tensor result or a classified failure, and delivers it to the caller's
//!    single-shot listener ([`handler`]).
//!
//! ## Core Components
//!
//! - **`ResponseHandler`**: the per-request state machine driven by the
//!   transport callbacks `on_headers` / `on_stream` / `on_error`
//! - **`StreamAggregator`**: the pull loop accumulating the body, preserving
//!   partial bodies on mid-stream errors
//! - **`classify_throttling`**: header scan for the vendor throttling signal
//! - **`dispatch`**: thin reqwest glue feeding a handler from a live response
//!
//! ## Example
//!
//! ```
//! use tensorgate_core::{
//!     Connector, ExecutionContext, JsonOutputProcessor, ResponseListener,
//! };
//! use tensorgate_engine::ResponseHandler;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let (listener, receiver) = ResponseListener::channel();
//! let handler = ResponseHandler::new(
//!     ExecutionContext::new(0),
//!     Arc::new(Connector::new("echo", "https://models.example.com/invoke")),
//!     Arc::new(JsonOutputProcessor),
//!     listener,
//! );
//!
//! // The transport layer drives on_headers / on_stream / on_error; the
//! // terminal outcome arrives on `receiver` exactly once.
//! # let _ = (handler, receiver);
//! # }
//! ```

pub mod aggregator;
pub mod classifier;
pub mod handler;
pub mod transport;

pub use aggregator::{Aggregation, StreamAggregator, StreamError};
pub use classifier::{classify_throttling, AMZN_ERROR_HEADER};
pub use handler::ResponseHandler;
pub use transport::dispatch;
