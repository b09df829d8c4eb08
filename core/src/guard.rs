//! Content-safety guard capability.

use crate::tensor::ModelTensors;
use thiserror::Error;

/// A guard vetoed a structured result.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("content guard rejected the response: {reason}")]
pub struct GuardRejection {
    /// Why the result was vetoed
    pub reason: String,
}

impl GuardRejection {
    /// Create a rejection with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Content-safety policy applied to a structured result before delivery.
///
/// A guard may veto a result (return an error) or transform it (redact and
/// return the modified tensors). Guard internals such as policies, word lists,
/// or model-backed moderation belong to the surrounding system; the pipeline
/// consumes the capability only.
pub trait ContentGuard: Send + Sync {
    /// Inspect `tensors`, returning them (possibly transformed) or a veto.
    ///
    /// # Errors
    ///
    /// Returns [`GuardRejection`] when the result violates the guard's policy.
    fn apply(&self, tensors: ModelTensors) -> Result<ModelTensors, GuardRejection>;
}

/// Guard vetoing results whose JSON rendering contains a denied term.
#[derive(Clone, Debug, Default)]
pub struct DenyListGuard {
    terms: Vec<String>,
}

impl DenyListGuard {
    /// Create a guard from the denied terms.
    #[must_use]
    pub fn new(terms: Vec<String>) -> Self {
        Self { terms }
    }
}

impl ContentGuard for DenyListGuard {
    fn apply(&self, tensors: ModelTensors) -> Result<ModelTensors, GuardRejection> {
        let rendered = serde_json::to_string(&tensors)
            .map_err(|e| GuardRejection::new(format!("unrenderable result: {e}")))?;
        for term in &self.terms {
            if rendered.contains(term.as_str()) {
                return Err(GuardRejection::new(format!("denied term {term:?}")));
            }
        }
        Ok(tensors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::ModelTensor;
    use serde_json::json;

    fn text_result(text: &str) -> ModelTensors {
        ModelTensors::new(vec![ModelTensor::from_value(
            "response",
            json!({ "text": text }),
        )])
    }

    #[test]
    fn test_deny_list_passes_clean_result() {
        let guard = DenyListGuard::new(vec!["secret".to_string()]);
        assert!(guard.apply(text_result("all fine here")).is_ok());
    }

    #[test]
    fn test_deny_list_vetoes_matching_result() {
        let guard = DenyListGuard::new(vec!["secret".to_string()]);
        let rejection = guard.apply(text_result("the secret plans"));
        assert!(matches!(rejection, Err(GuardRejection { .. })));
    }

    #[test]
    fn test_empty_deny_list_passes_everything() {
        let guard = DenyListGuard::default();
        assert!(guard.apply(text_result("anything")).is_ok());
    }
}
