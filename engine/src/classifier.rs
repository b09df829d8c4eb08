//! Header-level failure classification.
//!
//! Some vendors report rate limiting through an error-type response header,
//! even when no body has arrived yet or alongside a generic 5xx status.
//! Scanning the headers lets the pipeline emit a distinct, retryable
//! throttling error instead of a generic one.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tensorgate_core::RemoteError;

/// Vendor error-type header carrying throttling signals.
pub const AMZN_ERROR_HEADER: &str = "x-amzn-ErrorType";

/// Prefix identifying the throttling exception family.
const THROTTLING_SIGNATURE: &str = "ThrottlingException";

/// Scan `headers` for the vendor throttling signature.
///
/// Returns a [`RemoteError::Throttling`] carrying `status` when any value of
/// the error-type header starts with the throttling signature. A missing
/// header, unreadable header bytes, or a non-matching value is a no-op:
/// classification annotates state, it never errors itself.
#[must_use]
pub fn classify_throttling(headers: &HeaderMap, status: StatusCode) -> Option<RemoteError> {
    let throttled = headers
        .get_all(AMZN_ERROR_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(THROTTLING_SIGNATURE));

    throttled.then(|| RemoteError::Throttling {
        status: status.as_u16(),
    })
}
