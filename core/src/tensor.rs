//! Structured inference results.
//!
//! A remote model's raw response body is materialized into [`ModelTensors`]
//! by an [`crate::OutputProcessor`]. Successful results are delivered as
//! [`SequencedTensors`], pairing the tensors with the originating request's
//! sequence number.

use serde::{Deserialize, Serialize};

/// A single named tensor in a model response.
///
/// Numeric vendor payloads populate `data`/`shape`; anything else is kept as
/// raw JSON in `data_as_map` so callers can apply their own interpretation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ModelTensor {
    /// Tensor name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Flat numeric data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<f64>>,
    /// Shape of `data`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<usize>>,
    /// Raw JSON payload for non-numeric responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_as_map: Option<serde_json::Value>,
}

impl ModelTensor {
    /// Create a tensor from a flat numeric vector.
    #[must_use]
    pub fn numeric(name: impl Into<String>, data: Vec<f64>) -> Self {
        let shape = vec![data.len()];
        Self {
            name: Some(name.into()),
            data: Some(data),
            shape: Some(shape),
            data_as_map: None,
        }
    }

    /// Create a tensor wrapping a raw JSON value.
    #[must_use]
    pub fn from_value(name: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            name: Some(name.into()),
            data: None,
            shape: None,
            data_as_map: Some(value),
        }
    }
}

/// The structured result of one remote inference call.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelTensors {
    /// Tensors parsed out of the response body
    pub tensors: Vec<ModelTensor>,
    /// HTTP status the response arrived with, stamped at terminal resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ModelTensors {
    /// Create a result from parsed tensors.
    #[must_use]
    pub const fn new(tensors: Vec<ModelTensor>) -> Self {
        Self {
            tensors,
            status_code: None,
        }
    }

    /// Stamp the HTTP status this result arrived with.
    pub const fn set_status_code(&mut self, status_code: u16) {
        self.status_code = Some(status_code);
    }
}

/// A successful result paired with its request's sequence number.
///
/// The sequence is the one supplied via [`crate::ExecutionContext`] at
/// submission time, unmodified, so a fan-out caller can sort or index
/// completions deterministically regardless of completion order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SequencedTensors {
    /// Position of the originating request
    pub sequence: u64,
    /// The processed result
    pub tensors: ModelTensors,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_tensor_derives_shape() {
        let tensor = ModelTensor::numeric("response", vec![1.0, 2.0, 3.0]);
        assert_eq!(tensor.shape, Some(vec![3]));
        assert_eq!(tensor.data, Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(tensor.data_as_map, None);
    }

    #[test]
    fn test_value_tensor_keeps_raw_json() {
        let tensor = ModelTensor::from_value("response", json!({"text": "hello"}));
        assert_eq!(tensor.data, None);
        assert_eq!(tensor.data_as_map, Some(json!({"text": "hello"})));
    }

    #[test]
    fn test_status_code_stamp() {
        let mut tensors = ModelTensors::new(vec![]);
        assert_eq!(tensors.status_code, None);
        tensors.set_status_code(200);
        assert_eq!(tensors.status_code, Some(200));
    }

    #[test]
    #[allow(clippy::expect_used)] // Panics: Test will fail if serialization fails
    fn test_tensors_serialize_without_empty_fields() {
        let tensors = ModelTensors::new(vec![ModelTensor::numeric("response", vec![1.0])]);
        let json = serde_json::to_string(&tensors).expect("serializes");
        assert!(!json.contains("data_as_map"));
        assert!(!json.contains("status_code"));
    }
}
