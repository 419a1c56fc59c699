use serde_json::Value;
use shared::{ClientMessage, MessageError};
use tracing::{debug, info};

use crate::{
    errors::{ResultContext, WorkerError},
    platform::WorkerScope,
    version_watcher::VersionCheck,
    worker::Worker,
};

/// What the message hook did with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// `None` if the version check was abandoned
    CheckedVersion(Option<VersionCheck>),
    SkippedWaiting,
    Ignored,
}

impl<S: WorkerScope> Worker<S> {
    /// Message hook for anything a page posts to the worker.
    ///
    /// Unrecognised messages are logged and ignored.
    pub async fn handle_message(&self, data: Value) -> Result<MessageOutcome, WorkerError> {
        let message = match ClientMessage::try_from(data.clone()) {
            Ok(message) => message,
            Err(MessageError::Empty) => {
                debug!("worker_message got a message without data");
                return Ok(MessageOutcome::Ignored);
            }
            Err(e) => {
                debug!("worker_message got unexpected message: {data} ({e})");
                return Ok(MessageOutcome::Ignored);
            }
        };

        match message {
            ClientMessage::CheckVersion => {
                debug!("worker_message got CHECK_VERSION");
                Ok(MessageOutcome::CheckedVersion(self.check_version().await))
            }
            ClientMessage::SkipWaiting => {
                info!("worker_message got SKIP_WAITING");
                self.scope.skip_waiting().context("sw::skip_waiting")?;
                Ok(MessageOutcome::SkippedWaiting)
            }
        }
    }
}
