//! Failure taxonomy for remote inference calls.
//!
//! Every failed request surfaces to the caller as exactly one [`RemoteError`].
//! The pipeline never retries internally; it classifies precisely enough for
//! an external retry policy to decide. [`RemoteError::is_retryable`] marks the
//! kinds such a policy is expected to retry.

use thiserror::Error;

/// Longest slice of a raw response body embedded into an error message.
///
/// Bodies are bounded JSON payloads in the common case, but an error message
/// must not grow without bound with a misbehaving vendor.
pub const MAX_EMBEDDED_BODY: usize = 8 * 1024;

/// A classified terminal failure of one remote inference call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// Vendor signaled rate limiting through its error-type header.
    #[error("request was denied due to remote server throttling (status {status})")]
    Throttling {
        /// Status code the throttled response arrived with
        status: u16,
    },

    /// Stream completed with nothing to parse.
    #[error("no response from model")]
    EmptyBody,

    /// Status outside the success range, with a body present.
    #[error("error from remote service (status {status}): {body}")]
    NonSuccessStatus {
        /// Status code of the failed response
        status: u16,
        /// Raw response body, capped at [`MAX_EMBEDDED_BODY`]
        body: String,
    },

    /// Body present and status successful, but processing or the guard failed.
    #[error("failed to process model response: {message}")]
    Processing {
        /// What went wrong while materializing the result
        message: String,
    },

    /// Connection-level failure before a usable response existed.
    #[error("error communicating with remote model: {message}")]
    Transport {
        /// Recorded status, or 500 when none ever arrived
        status: u16,
        /// Underlying transport error
        message: String,
    },
}

impl RemoteError {
    /// Build a `NonSuccessStatus` error, capping the embedded body.
    #[must_use]
    pub fn non_success(status: u16, body: &str) -> Self {
        Self::NonSuccessStatus {
            status,
            body: cap_body(body),
        }
    }

    /// HTTP-style status for this failure.
    ///
    /// Kinds without a transport-recorded status report their conventional
    /// equivalent: 400 for an empty body, 500 for a processing failure.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Throttling { status }
            | Self::NonSuccessStatus { status, .. }
            | Self::Transport { status, .. } => *status,
            Self::EmptyBody => 400,
            Self::Processing { .. } => 500,
        }
    }

    /// Whether an external retry policy is expected to retry this failure.
    ///
    /// Throttling and transport failures are transient by nature; the other
    /// kinds reflect the request or the response body itself.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttling { .. } | Self::Transport { .. })
    }
}

/// Truncate `body` to [`MAX_EMBEDDED_BODY`] bytes on a char boundary.
fn cap_body(body: &str) -> String {
    if body.len() <= MAX_EMBEDDED_BODY {
        return body.to_string();
    }
    let mut end = MAX_EMBEDDED_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    let truncated = body.len() - end;
    format!("{} ... ({truncated} bytes truncated)", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(RemoteError::Throttling { status: 429 }.is_retryable());
        assert!(
            RemoteError::Transport {
                status: 500,
                message: "connection reset".to_string(),
            }
            .is_retryable()
        );
        assert!(!RemoteError::EmptyBody.is_retryable());
        assert!(!RemoteError::non_success(503, "overloaded").is_retryable());
        assert!(
            !RemoteError::Processing {
                message: "bad json".to_string(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(RemoteError::Throttling { status: 429 }.status_code(), 429);
        assert_eq!(RemoteError::EmptyBody.status_code(), 400);
        assert_eq!(RemoteError::non_success(503, "x").status_code(), 503);
        assert_eq!(
            RemoteError::Processing {
                message: String::new(),
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_non_success_keeps_short_body_verbatim() {
        let error = RemoteError::non_success(503, r#"{"error":"overloaded"}"#);
        assert!(error.to_string().contains("overloaded"));
        assert!(!error.to_string().contains("truncated"));
    }

    #[test]
    fn test_non_success_caps_long_body() {
        let body = "x".repeat(MAX_EMBEDDED_BODY + 100);
        let error = RemoteError::non_success(500, &body);
        let RemoteError::NonSuccessStatus { body: embedded, .. } = error else {
            unreachable!()
        };
        assert!(embedded.len() < body.len());
        assert!(embedded.contains("(100 bytes truncated)"));
    }

    proptest! {
        #[test]
        fn prop_capped_body_is_bounded(body in ".{0,20000}") {
            let capped = cap_body(&body);
            // Cap plus the truncation marker, never the raw length.
            prop_assert!(capped.len() <= MAX_EMBEDDED_BODY + 64);
        }

        #[test]
        fn prop_cap_respects_char_boundaries(body in "\\PC{0,12000}") {
            // Must not panic slicing multi-byte text.
            let _ = cap_body(&body);
        }
    }
}
