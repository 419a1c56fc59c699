use shared::CacheName;
use tracing::{debug, info, trace, warn};

use crate::{
    errors::{ResultContext, WorkerError},
    platform::{CacheStorage, WorkerScope},
    worker::Worker,
};

/// What activation did to the origin's cache storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivateReport {
    pub deleted: Vec<String>,
    /// Stale buckets that could not be deleted. They are retried on the next activation
    pub failed: Vec<String>,
}

impl<S: WorkerScope> Worker<S> {
    /// Install hook: populates this version's bucket with every asset in the manifest.
    ///
    /// Fails if any asset can't be fetched, in which case this version never
    /// becomes eligible for activation.
    pub async fn install(&self) -> Result<(), WorkerError> {
        trace!(version = %self.config.version, cache = %self.cache_name, "install");
        let caches = self.scope.caches().context("caches")?;

        caches
            .add_all(self.cache_name.as_str(), &self.config.assets)
            .await
            .with_context(|| format!("cache::add_all:: {}", self.cache_name))?;

        for path in self.config.assets.iter() {
            trace!(file = %path, "Cached");
        }

        // Don't wait for pages using the previous version to close
        if let Err(e) = self.scope.skip_waiting() {
            warn!("skip_waiting failed, will activate once old clients close: {e}");
        }

        info!(version = %self.config.version, assets = self.config.assets.len(), "Install successful");
        Ok(())
    }

    /// Activate hook: deletes every bucket except the current one, then claims
    /// already open pages.
    ///
    /// Deleting is best effort, a bucket that fails to delete is logged and the
    /// rest are still deleted and clients still claimed.
    pub async fn activate(&self) -> Result<ActivateReport, WorkerError> {
        trace!(version = %self.config.version, "activate");
        let caches = self.scope.caches().context("caches")?;
        let mut report = ActivateReport::default();

        let keys = caches.keys().await.context("caches::keys")?;

        for key in keys.into_iter().filter(|k| k.as_str() != self.cache_name.as_str()) {
            match caches.delete(&key).await {
                Ok(_) => {
                    match CacheName::version_of(&key, &self.config.cache_prefix) {
                        Some(version) => debug!(cache = %key, "Deleted stale generation {version}"),
                        None => debug!(cache = %key, "Deleted foreign cache"),
                    }
                    report.deleted.push(key);
                }
                Err(e) => {
                    warn!(cache = %key, "Failed to delete stale cache: {e}");
                    report.failed.push(key);
                }
            }
        }

        // Claim the clients so requests from already open pages come through this
        // version without a reload
        self.scope.claim_clients().await.context("sw::clients::claim")?;

        info!(
            version = %self.config.version,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "Activate successful"
        );
        Ok(report)
    }
}
