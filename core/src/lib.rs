//! # Tensorgate Core
//!
//! Core types and capability traits for the tensorgate remote inference
//! pipeline.
//!
//! This crate defines the data model shared between the response engine and
//! its callers:
//!
//! - **`ExecutionContext`**: per-request correlation token (a sequence number)
//! - **`ModelTensors`**: the structured result materialized from a raw
//!   response body
//! - **`Connector`**: descriptor of a remote model endpoint and how to pick
//!   the result out of its response shape
//! - **`RemoteError`**: the five-kind failure taxonomy, each kind carrying an
//!   HTTP-style status and a retryability marker
//! - **`OutputProcessor`** / **`ContentGuard`**: the capabilities the engine
//!   consumes to turn an aggregated body into a guarded result
//! - **`ResponseListener`**: the single-shot completion listener; exactly one
//!   of `on_response` / `on_failure` fires per request
//!
//! ## Example
//!
//! ```
//! use tensorgate_core::{Connector, ExecutionContext, JsonOutputProcessor, OutputProcessor};
//! use std::collections::HashMap;
//!
//! let connector = Connector::new("echo", "https://models.example.com/invoke")
//!     .with_result_pointer("/result");
//!
//! let context = ExecutionContext::new(7);
//! let processor = JsonOutputProcessor;
//! let tensors = processor
//!     .process(r#"{"result": [1.0, 2.0, 3.0]}"#, &connector, &HashMap::new(), None)
//!     .ok();
//!
//! assert!(tensors.is_some());
//! assert_eq!(context.sequence(), 7);
//! ```

pub mod connector;
pub mod context;
pub mod error;
pub mod guard;
pub mod listener;
pub mod processor;
pub mod tensor;

pub use connector::Connector;
pub use context::ExecutionContext;
pub use error::RemoteError;
pub use guard::{ContentGuard, DenyListGuard, GuardRejection};
pub use listener::{InferenceResult, ResponseListener};
pub use processor::{JsonOutputProcessor, OutputProcessor, ProcessingError};
pub use tensor::{ModelTensor, ModelTensors, SequencedTensors};
