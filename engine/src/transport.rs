//! Thin reqwest glue between a live HTTP call and a [`ResponseHandler`].
//!
//! Everything upstream of the response (connection pooling, TLS, timeouts,
//! authentication) belongs to the caller's `reqwest::Client` configuration.
//! A timeout enforced there surfaces as a send error and takes the
//! `on_error` path like any other transport failure.

use crate::aggregator::StreamError;
use crate::handler::ResponseHandler;
use futures::TryStreamExt;
use reqwest::Client;
use tensorgate_core::Connector;

impl From<reqwest::Error> for StreamError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport {
            message: error.to_string(),
        }
    }
}

/// POST `payload` to the connector's endpoint and drive `handler` with the
/// outcome.
///
/// On a successful send the handler sees `on_headers` followed by
/// `on_stream`; a send failure goes straight to `on_error`. Either way the
/// handler delivers exactly one terminal outcome, which callers await on the
/// receiver paired with the handler's listener.
pub async fn dispatch(
    client: &Client,
    connector: &Connector,
    payload: &serde_json::Value,
    handler: &ResponseHandler,
) {
    let mut request = client.post(&connector.endpoint).json(payload);
    for (name, value) in &connector.headers {
        request = request.header(name, value);
    }

    match request.send().await {
        Ok(response) => {
            handler.on_headers(response.headers(), response.status());
            handler
                .on_stream(response.bytes_stream().map_err(StreamError::from))
                .await;
        }
        Err(error) => handler.on_error(error),
    }
}
