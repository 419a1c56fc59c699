//! The parts of the service worker runtime the worker depends on.
//!
//! Everything here runs on the worker's single thread, so futures are
//! `LocalBoxFuture` and nothing needs to be `Send`.

use futures::future::LocalBoxFuture;
use http::Method;
use shared::WorkerMessage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("cache storage: {0}")]
    Cache(String),
    #[error("network: {0}")]
    Network(String),
    #[error("client: {0}")]
    Client(String),
    #[error("lifecycle: {0}")]
    Lifecycle(String),
    #[error("{0}")]
    UnexpectedValue(String),
}

/// A request handed to the fetch hook
pub trait FetchRequest {
    fn method(&self) -> Method;
    fn url(&self) -> String;
    /// True for a top level navigation (address bar load, link click), false for
    /// sub-resource fetches
    fn is_navigation(&self) -> bool;
}

/// A page controlled (or matchable) by this worker
pub trait WorkerClient {
    fn id(&self) -> String;
    fn post_message(&self, message: &WorkerMessage) -> Result<(), PlatformError>;
}

/// The origin's named cache buckets
pub trait CacheStorage {
    type Request: FetchRequest;
    type Response;

    /// Names of every bucket in the origin
    fn keys(&self) -> LocalBoxFuture<'_, Result<Vec<String>, PlatformError>>;

    /// Deletes a whole bucket. Resolves to false if it didn't exist
    fn delete<'a>(&'a self, name: &'a str) -> LocalBoxFuture<'a, Result<bool, PlatformError>>;

    /// Opens (creating if absent) the bucket `name` and stores the network
    /// response of every path under that path.
    ///
    /// All or nothing: if one fetch fails no entry is written.
    fn add_all<'a>(
        &'a self,
        name: &'a str,
        paths: &'a [String],
    ) -> LocalBoxFuture<'a, Result<(), PlatformError>>;

    /// Looks the request up across every bucket
    fn match_request<'a>(
        &'a self,
        request: &'a Self::Request,
    ) -> LocalBoxFuture<'a, Result<Option<Self::Response>, PlatformError>>;
}

/// The global scope of a running service worker
pub trait WorkerScope {
    type Request: FetchRequest;
    type Response;
    type Client: WorkerClient;
    type Caches: CacheStorage<Request = Self::Request, Response = Self::Response>;

    fn caches(&self) -> Result<Self::Caches, PlatformError>;

    /// Forwards the request to the network untouched
    fn fetch<'a>(
        &'a self,
        request: &'a Self::Request,
    ) -> LocalBoxFuture<'a, Result<Self::Response, PlatformError>>;

    /// GETs `url` bypassing every cache layer and returns the body as text
    fn fetch_text_no_store<'a>(
        &'a self,
        url: &'a str,
    ) -> LocalBoxFuture<'a, Result<String, PlatformError>>;

    fn match_all_clients(&self) -> LocalBoxFuture<'_, Result<Vec<Self::Client>, PlatformError>>;

    /// Takes control of already open pages without a reload
    fn claim_clients(&self) -> LocalBoxFuture<'_, Result<(), PlatformError>>;

    /// Activates as soon as install finishes instead of waiting for old pages to close
    fn skip_waiting(&self) -> Result<(), PlatformError>;
}
