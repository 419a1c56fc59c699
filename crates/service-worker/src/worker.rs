use shared::{CacheName, WorkerConfig};

use crate::{errors::WorkerError, platform::WorkerScope};

/// One running instance of the offline worker.
///
/// Holds the immutable deployment config and the runtime scope. Event hooks are
/// implemented in the `lifecycle`, `intercept`, `version_watcher` and `message`
/// modules. Nothing is mutated after construction, so any number of hook futures
/// can be in flight at once.
#[derive(Debug)]
pub struct Worker<S> {
    pub(crate) config: WorkerConfig,
    pub(crate) cache_name: CacheName,
    pub(crate) scope: S,
}

impl<S: WorkerScope> Worker<S> {
    pub fn new(config: WorkerConfig, scope: S) -> Result<Self, WorkerError> {
        config.validate()?;
        let cache_name = config.cache_name();

        Ok(Self {
            config,
            cache_name,
            scope,
        })
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// The bucket this version installs into
    pub fn cache_name(&self) -> &CacheName {
        &self.cache_name
    }

    pub fn scope(&self) -> &S {
        &self.scope
    }
}
