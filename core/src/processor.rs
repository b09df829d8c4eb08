//! Output processing: raw body → structured tensors.

use crate::connector::Connector;
use crate::guard::{ContentGuard, GuardRejection};
use crate::tensor::{ModelTensor, ModelTensors};
use std::collections::HashMap;
use thiserror::Error;

/// Request parameter overriding the connector's result pointer.
pub const RESPONSE_FILTER_PARAMETER: &str = "response_filter";

/// Failure while materializing a response body into tensors.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Body was not parseable as the expected shape
    #[error("malformed response body: {0}")]
    MalformedBody(String),

    /// The configured result field was absent from the response
    #[error("result field {pointer:?} missing from response")]
    MissingField {
        /// JSON pointer that failed to resolve
        pointer: String,
    },

    /// The content guard vetoed the result
    #[error(transparent)]
    Rejected(#[from] GuardRejection),
}

/// Turns an aggregated response body into a structured, guarded result.
///
/// Implementations own the vendor-specific parsing rules described by a
/// [`Connector`]. The guard, when present, is applied to the parsed result
/// before it is returned; a veto surfaces as a processing failure.
pub trait OutputProcessor: Send + Sync {
    /// Materialize `body` into tensors according to `connector`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError`] on a malformed or unexpected body shape,
    /// or when the guard rejects the parsed result.
    fn process(
        &self,
        body: &str,
        connector: &Connector,
        parameters: &HashMap<String, String>,
        guard: Option<&dyn ContentGuard>,
    ) -> Result<ModelTensors, ProcessingError>;
}

/// Default processor for JSON response bodies.
///
/// Resolves the result field named by the `response_filter` request parameter
/// (falling back to the connector's pointer, then to the whole body), then
/// materializes a flat numeric array into a `data`/`shape` tensor and any
/// other JSON value into a raw-map tensor named `response`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonOutputProcessor;

impl OutputProcessor for JsonOutputProcessor {
    fn process(
        &self,
        body: &str,
        connector: &Connector,
        parameters: &HashMap<String, String>,
        guard: Option<&dyn ContentGuard>,
    ) -> Result<ModelTensors, ProcessingError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ProcessingError::MalformedBody(e.to_string()))?;

        let pointer = parameters
            .get(RESPONSE_FILTER_PARAMETER)
            .map(String::as_str)
            .or(connector.result_pointer.as_deref());

        let selected = match pointer {
            Some(pointer) => value
                .pointer(pointer)
                .ok_or_else(|| ProcessingError::MissingField {
                    pointer: pointer.to_string(),
                })?
                .clone(),
            None => value,
        };

        let tensors = ModelTensors::new(vec![tensor_from_value(selected)]);
        match guard {
            Some(guard) => Ok(guard.apply(tensors)?),
            None => Ok(tensors),
        }
    }
}

/// Flat numeric arrays become `data` tensors; everything else stays raw JSON.
fn tensor_from_value(value: serde_json::Value) -> ModelTensor {
    if let serde_json::Value::Array(items) = &value {
        let numbers: Option<Vec<f64>> = items.iter().map(serde_json::Value::as_f64).collect();
        if let Some(data) = numbers {
            return ModelTensor::numeric("response", data);
        }
    }
    ModelTensor::from_value("response", value)
}
