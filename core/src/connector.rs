//! Remote model endpoint descriptors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptor of a remote model endpoint and how to read its response.
///
/// A connector names the vendor endpoint, the static headers its requests
/// carry, and optionally a JSON pointer selecting the result field out of the
/// vendor's response shape. Durable storage of connectors is a concern of the
/// surrounding system, not of this pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Connector {
    /// Connector name (used in logs and error messages)
    pub name: String,
    /// Endpoint URL requests are sent to
    pub endpoint: String,
    /// Static headers attached to every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// JSON pointer selecting the result field of the response body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_pointer: Option<String>,
}

impl Connector {
    /// Create a connector for `endpoint`.
    #[must_use]
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            headers: HashMap::new(),
            result_pointer: None,
        }
    }

    /// Builder: attach a static header to every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Builder: select the result field via a JSON pointer (e.g. `/result`).
    #[must_use]
    pub fn with_result_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.result_pointer = Some(pointer.into());
        self
    }
}
