//! Single-shot completion listener.

use crate::error::RemoteError;
use crate::tensor::SequencedTensors;
use tokio::sync::oneshot;

/// Terminal outcome of one remote inference call.
pub type InferenceResult = Result<SequencedTensors, RemoteError>;

/// The caller's completion listener for one request.
///
/// Exactly one of [`on_response`](Self::on_response) /
/// [`on_failure`](Self::on_failure) fires per request. Both consume the
/// listener by value, so a second delivery is unrepresentable; the engine
/// additionally holds the listener behind a take-once slot so racing
/// resolution paths cannot both reach it.
#[derive(Debug)]
pub struct ResponseListener {
    tx: oneshot::Sender<InferenceResult>,
}

impl ResponseListener {
    /// Create a listener and the receiver its outcome arrives on.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<InferenceResult>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Deliver the successful result.
    pub fn on_response(self, result: SequencedTensors) {
        // A caller that gave up and dropped the receiver is not an error here.
        let _ = self.tx.send(Ok(result));
    }

    /// Deliver the classified failure.
    pub fn on_failure(self, error: RemoteError) {
        let _ = self.tx.send(Err(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::ModelTensors;

    #[tokio::test]
    async fn test_on_response_reaches_receiver() {
        let (listener, rx) = ResponseListener::channel();
        listener.on_response(SequencedTensors {
            sequence: 3,
            tensors: ModelTensors::new(vec![]),
        });

        let Ok(Ok(result)) = rx.await else {
            unreachable!()
        };
        assert_eq!(result.sequence, 3);
    }

    #[tokio::test]
    async fn test_on_failure_reaches_receiver() {
        let (listener, rx) = ResponseListener::channel();
        listener.on_failure(RemoteError::EmptyBody);

        let Ok(Err(error)) = rx.await else {
            unreachable!()
        };
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn test_delivery_to_dropped_receiver_is_silent() {
        let (listener, rx) = ResponseListener::channel();
        drop(rx);
        listener.on_failure(RemoteError::EmptyBody);
    }
}
