use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, oneshot};

use crate::publish::{
    dependencies::PublishDependencies,
    pipeline::{PublishRequest, perform_publish},
    types::{PublishError, PublishOutcome, PublishStatus, PublishTarget},
};

/// Runs uploads and record inserts on a background task.
///
/// Requests are processed one at a time in submission order, so saves from
/// the same manager never overlap. Nothing is retried; a failed request
/// reports its error and the caller decides whether to save again.
#[derive(Clone)]
pub struct PublishManager {
    /// Channel for sending publish requests.
    request_tx: mpsc::UnboundedSender<PublishRequest>,
    /// Shared status of the current request.
    status: Arc<Mutex<PublishStatus>>,
    /// Outcome of the last finished request (if not yet taken).
    last_result: Arc<Mutex<Option<PublishOutcome>>>,
}

impl PublishManager {
    /// Create a manager backed by the default local store and record file.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning the worker task
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        Self::with_dependencies(runtime_handle, PublishDependencies::default())
    }

    /// Create a manager with custom collaborators.
    pub fn with_dependencies(
        runtime_handle: &tokio::runtime::Handle,
        dependencies: PublishDependencies,
    ) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<PublishRequest>();
        let status = Arc::new(Mutex::new(PublishStatus::Idle));
        let last_result = Arc::new(Mutex::new(None));
        let dependencies = Arc::new(dependencies);

        let status_clone = status.clone();
        let result_clone = last_result.clone();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Processing publish request: {:?}", request);
                let PublishRequest { png, target, reply } = request;

                let outcome =
                    match perform_publish(png, &target, dependencies.clone(), &status_clone).await
                    {
                        Ok(result) => {
                            log::info!("Publish successful: {}", result.image_url);
                            *status_clone.lock().await = PublishStatus::Success;
                            PublishOutcome::Success(result)
                        }
                        Err(e) => {
                            let error_message = e.to_string();
                            log::error!("Publish failed: {}", error_message);
                            *status_clone.lock().await =
                                PublishStatus::Failed(error_message.clone());
                            PublishOutcome::Failed(error_message)
                        }
                    };

                *result_clone.lock().await = Some(outcome.clone());
                if let Some(reply) = reply {
                    // The requester may have stopped waiting.
                    let _ = reply.send(outcome);
                }
            }
        });

        Self {
            request_tx,
            status,
            last_result,
        }
    }

    /// Queue an encoded PNG for upload and record insertion.
    ///
    /// Returns immediately. The receiver resolves with the outcome once the
    /// worker has processed the request.
    pub fn request_publish(
        &self,
        png: Vec<u8>,
        target: PublishTarget,
    ) -> Result<oneshot::Receiver<PublishOutcome>, PublishError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = PublishRequest {
            png,
            target,
            reply: Some(reply_tx),
        };

        self.request_tx
            .send(request)
            .map_err(|_| PublishError::ManagerStopped)?;

        Ok(reply_rx)
    }

    /// Get the current status.
    pub async fn get_status(&self) -> PublishStatus {
        self.status.lock().await.clone()
    }

    /// Get the outcome of the last request and clear it.
    pub async fn take_result(&self) -> Option<PublishOutcome> {
        self.last_result.lock().await.take()
    }

    /// Try to get the outcome without waiting (non-blocking).
    pub fn try_take_result(&self) -> Option<PublishOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }

    /// Reset status to idle.
    pub async fn reset(&self) {
        *self.status.lock().await = PublishStatus::Idle;
    }
}

#[cfg(test)]
impl PublishManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<PublishRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            status: Arc::new(Mutex::new(PublishStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
        }
    }
}
