use shared::WorkerMessage;
use tracing::{debug, info, trace, warn};

use crate::{
    errors::{ResultContext, WorkerError},
    platform::{WorkerClient, WorkerScope},
    worker::Worker,
};

/// Result of comparing the deployed version with the running one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    /// Same version, or the oracle had no recognisable version marker
    Current,
    UpdateAvailable { version: String },
}

impl<S: WorkerScope> Worker<S> {
    /// Compares the oracle document's version marker with the running version.
    ///
    /// A document without a marker counts as the running version.
    pub fn compare(&self, document: &str) -> VersionCheck {
        match self.config.oracle.pattern.extract(document) {
            Some(remote) if remote != self.config.version => VersionCheck::UpdateAvailable {
                version: remote.to_string(),
            },
            Some(_) => VersionCheck::Current,
            None => {
                debug!(pattern = %self.config.oracle.pattern, "No version marker in oracle document");
                VersionCheck::Current
            }
        }
    }

    /// Looks for a new deployment and tells every connected page if there is one.
    ///
    /// Never fails: if the oracle can't be fetched the check is abandoned and
    /// `None` is returned. Nothing is retried.
    pub async fn check_version(&self) -> Option<VersionCheck> {
        match self.try_check_version().await {
            Ok(check) => Some(check),
            Err(e) => {
                warn!("Version check failed: {e}");
                None
            }
        }
    }

    async fn try_check_version(&self) -> Result<VersionCheck, WorkerError> {
        let url = &self.config.oracle.url;
        trace!(version = %self.config.version, oracle = %url, "check_version");

        let document = self
            .scope
            .fetch_text_no_store(url)
            .await
            .with_context(|| format!("fetch:: {url}"))?;

        let check = self.compare(&document);
        if let VersionCheck::UpdateAvailable { version } = &check {
            info!(running = %self.config.version, deployed = %version, "Update available");
            let message = WorkerMessage::UpdateAvailable {
                version: version.clone(),
            };
            self.notify_clients(&message).await?;
        }

        Ok(check)
    }

    /// Posts `message` to every client, returns how many received it.
    ///
    /// A client that can't be reached (e.g. closed mid broadcast) doesn't stop
    /// the others from being notified.
    pub async fn notify_clients(&self, message: &WorkerMessage) -> Result<usize, WorkerError> {
        let clients = self
            .scope
            .match_all_clients()
            .await
            .context("sw::clients::match_all")?;

        let mut notified = 0;
        for client in clients.iter() {
            match client.post_message(message) {
                Ok(()) => notified += 1,
                Err(e) => warn!(client = %client.id(), "post_message failed: {e}"),
            }
        }

        debug!(notified, total = clients.len(), "Notified clients");
        Ok(notified)
    }
}
