use std::rc::Rc;

use futures::{future::LocalBoxFuture, FutureExt};
use http::Method;
use tracing::{debug, warn};

use crate::{
    errors::{ResultContext, WorkerError},
    platform::{CacheStorage, FetchRequest, WorkerScope},
    version_watcher::VersionCheck,
    worker::Worker,
};

/// The work a fetch event starts. Each future owns a handle to the worker so it
/// can outlive the event dispatch.
pub struct FetchHandling<R> {
    /// Goes to `waitUntil`, `None` unless the request is a navigation
    pub version_check: Option<LocalBoxFuture<'static, Option<VersionCheck>>>,
    /// Goes to `respondWith`, `None` lets the request through untouched
    pub response: Option<LocalBoxFuture<'static, Result<R, WorkerError>>>,
}

impl<S: WorkerScope> Worker<S> {
    /// Only GETs are answered by the worker, everything else goes to the network
    /// as if the worker wasn't there
    pub fn intercepts(&self, request: &S::Request) -> bool {
        request.method() == Method::GET
    }

    /// A top level navigation is a good moment to look for a new deployment
    pub fn triggers_version_check(&self, request: &S::Request) -> bool {
        request.is_navigation()
    }

    /// Fetch hook: decides which of the version check and the cached response a
    /// request starts. Both may run at once for a navigation.
    pub fn on_fetch(self: &Rc<Self>, request: S::Request) -> FetchHandling<S::Response>
    where
        S: 'static,
        S::Request: 'static,
    {
        let version_check = self.triggers_version_check(&request).then(|| {
            let worker = Rc::clone(self);
            async move { worker.check_version().await }.boxed_local()
        });

        let response = self.intercepts(&request).then(|| {
            let worker = Rc::clone(self);
            async move { worker.respond(&request).await }.boxed_local()
        });

        FetchHandling {
            version_check,
            response,
        }
    }

    /// Answers an intercepted request: cache first, then network.
    ///
    /// Cached responses are returned as is with no revalidation. Network responses
    /// are never written to the cache so its contents always equal the manifest.
    /// A network failure with nothing cached is returned as an error.
    pub async fn respond(&self, request: &S::Request) -> Result<S::Response, WorkerError> {
        let url = request.url();

        match self.lookup(request).await {
            Ok(Some(cached)) => {
                debug!("HIT: {url}");
                return Ok(cached);
            }
            Ok(None) => debug!("MISS: {url}"),
            // A broken cache shouldn't stop the page from loading while online
            Err(e) => warn!("Cache lookup failed for {url}, trying the network: {e}"),
        }

        self.scope
            .fetch(request)
            .await
            .with_context(|| format!("fetch:: {url}"))
    }

    async fn lookup(&self, request: &S::Request) -> Result<Option<S::Response>, WorkerError> {
        let caches = self.scope.caches().context("caches")?;
        Ok(caches.match_request(request).await.context("caches::match")?)
    }
}
