//! In-memory stand-ins for the service worker runtime

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

use futures::{future::LocalBoxFuture, FutureExt};
use http::Method;
use shared::WorkerMessage;

use crate::platform::{CacheStorage, FetchRequest, PlatformError, WorkerClient, WorkerScope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeResponse {
    pub status: u16,
    pub body: String,
}

impl FakeResponse {
    pub fn ok<S: Into<String>>(body: S) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: "Not Found".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeRequest {
    pub method: Method,
    pub url: String,
    pub navigate: bool,
}

impl FakeRequest {
    pub fn get(url: &str) -> Self {
        Self {
            method: Method::GET,
            url: url.to_string(),
            navigate: false,
        }
    }

    pub fn post(url: &str) -> Self {
        Self {
            method: Method::POST,
            ..Self::get(url)
        }
    }

    pub fn navigate(url: &str) -> Self {
        Self {
            navigate: true,
            ..Self::get(url)
        }
    }
}

impl FetchRequest for FakeRequest {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn is_navigation(&self) -> bool {
        self.navigate
    }
}

#[derive(Debug, Clone)]
pub struct FakeClient {
    id: String,
    inbox: Rc<RefCell<Vec<WorkerMessage>>>,
    closed: bool,
}

impl FakeClient {
    pub fn inbox(&self) -> Vec<WorkerMessage> {
        self.inbox.borrow().clone()
    }
}

impl WorkerClient for FakeClient {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn post_message(&self, message: &WorkerMessage) -> Result<(), PlatformError> {
        if self.closed {
            return Err(PlatformError::Client(format!("{} is closed", self.id)));
        }
        self.inbox.borrow_mut().push(message.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct State {
    online: bool,
    network: BTreeMap<String, FakeResponse>,
    network_requests: Vec<String>,
    no_store_requests: Vec<String>,
    caches: BTreeMap<String, BTreeMap<String, FakeResponse>>,
    fail_delete: BTreeSet<String>,
    fail_skip_waiting: bool,
    skipped_waiting: bool,
    claimed: bool,
    clients: Vec<FakeClient>,
}

/// Shared handle to a fake runtime. Clones see the same state
#[derive(Debug, Clone, Default)]
pub struct FakeScope(Rc<RefCell<State>>);

impl FakeScope {
    pub fn online() -> Self {
        let scope = Self::default();
        scope.0.borrow_mut().online = true;
        scope
    }

    pub fn offline() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, response: FakeResponse) {
        self.0.borrow_mut().network.insert(url.to_string(), response);
    }

    pub fn seed_cache(&self, name: &str, entries: &[(&str, FakeResponse)]) {
        let mut state = self.0.borrow_mut();
        let cache = state.caches.entry(name.to_string()).or_default();
        for (key, response) in entries {
            cache.insert(key.to_string(), response.clone());
        }
    }

    pub fn fail_delete(&self, name: &str) {
        self.0.borrow_mut().fail_delete.insert(name.to_string());
    }

    pub fn fail_skip_waiting(&self) {
        self.0.borrow_mut().fail_skip_waiting = true;
    }

    pub fn add_client(&self, id: &str) -> FakeClient {
        self.push_client(id, false)
    }

    /// A client that rejects every message
    pub fn add_closed_client(&self, id: &str) -> FakeClient {
        self.push_client(id, true)
    }

    fn push_client(&self, id: &str, closed: bool) -> FakeClient {
        let client = FakeClient {
            id: id.to_string(),
            inbox: Rc::default(),
            closed,
        };
        self.0.borrow_mut().clients.push(client.clone());
        client
    }

    pub fn cache_names(&self) -> Vec<String> {
        self.0.borrow().caches.keys().cloned().collect()
    }

    pub fn cached(&self, name: &str, key: &str) -> Option<FakeResponse> {
        self.0.borrow().caches.get(name).and_then(|c| c.get(key)).cloned()
    }

    pub fn cache_len(&self, name: &str) -> usize {
        self.0.borrow().caches.get(name).map_or(0, |c| c.len())
    }

    pub fn network_requests(&self) -> Vec<String> {
        self.0.borrow().network_requests.clone()
    }

    /// Requests that bypassed every cache layer
    pub fn no_store_requests(&self) -> Vec<String> {
        self.0.borrow().no_store_requests.clone()
    }

    pub fn skipped_waiting(&self) -> bool {
        self.0.borrow().skipped_waiting
    }

    pub fn claimed(&self) -> bool {
        self.0.borrow().claimed
    }

    fn network_fetch(&self, url: &str) -> Result<FakeResponse, PlatformError> {
        let mut state = self.0.borrow_mut();
        state.network_requests.push(url.to_string());

        if !state.online {
            return Err(PlatformError::Network(format!("TypeError: Failed to fetch {url}")));
        }
        Ok(state.network.get(url).cloned().unwrap_or_else(FakeResponse::not_found))
    }
}

impl CacheStorage for FakeScope {
    type Request = FakeRequest;
    type Response = FakeResponse;

    fn keys(&self) -> LocalBoxFuture<'_, Result<Vec<String>, PlatformError>> {
        let keys = self.cache_names();
        async move { Ok(keys) }.boxed_local()
    }

    fn delete<'a>(&'a self, name: &'a str) -> LocalBoxFuture<'a, Result<bool, PlatformError>> {
        async move {
            let mut state = self.0.borrow_mut();
            if state.fail_delete.contains(name) {
                return Err(PlatformError::Cache(format!("QuotaExceededError deleting {name}")));
            }
            Ok(state.caches.remove(name).is_some())
        }
        .boxed_local()
    }

    fn add_all<'a>(
        &'a self,
        name: &'a str,
        paths: &'a [String],
    ) -> LocalBoxFuture<'a, Result<(), PlatformError>> {
        async move {
            // Opening creates the bucket even if populating it fails
            self.0.borrow_mut().caches.entry(name.to_string()).or_default();

            let mut responses = Vec::with_capacity(paths.len());
            for path in paths {
                let response = self.network_fetch(path)?;
                if !(200..300).contains(&response.status) {
                    return Err(PlatformError::Network(format!(
                        "{path} responded with {}",
                        response.status
                    )));
                }
                responses.push((path.clone(), response));
            }

            let mut state = self.0.borrow_mut();
            let cache = state.caches.entry(name.to_string()).or_default();
            cache.extend(responses);
            Ok(())
        }
        .boxed_local()
    }

    fn match_request<'a>(
        &'a self,
        request: &'a FakeRequest,
    ) -> LocalBoxFuture<'a, Result<Option<FakeResponse>, PlatformError>> {
        async move {
            if request.method != Method::GET {
                return Ok(None);
            }
            let state = self.0.borrow();
            Ok(state.caches.values().find_map(|c| c.get(&request.url)).cloned())
        }
        .boxed_local()
    }
}

impl WorkerScope for FakeScope {
    type Request = FakeRequest;
    type Response = FakeResponse;
    type Client = FakeClient;
    type Caches = FakeScope;

    fn caches(&self) -> Result<FakeScope, PlatformError> {
        Ok(self.clone())
    }

    fn fetch<'a>(
        &'a self,
        request: &'a FakeRequest,
    ) -> LocalBoxFuture<'a, Result<FakeResponse, PlatformError>> {
        async move { self.network_fetch(&request.url) }.boxed_local()
    }

    fn fetch_text_no_store<'a>(
        &'a self,
        url: &'a str,
    ) -> LocalBoxFuture<'a, Result<String, PlatformError>> {
        async move {
            self.0.borrow_mut().no_store_requests.push(url.to_string());
            self.network_fetch(url).map(|r| r.body)
        }
        .boxed_local()
    }

    fn match_all_clients(&self) -> LocalBoxFuture<'_, Result<Vec<FakeClient>, PlatformError>> {
        async move { Ok(self.0.borrow().clients.clone()) }.boxed_local()
    }

    fn claim_clients(&self) -> LocalBoxFuture<'_, Result<(), PlatformError>> {
        async move {
            self.0.borrow_mut().claimed = true;
            Ok(())
        }
        .boxed_local()
    }

    fn skip_waiting(&self) -> Result<(), PlatformError> {
        let mut state = self.0.borrow_mut();
        if state.fail_skip_waiting {
            return Err(PlatformError::Lifecycle("skipWaiting rejected".to_string()));
        }
        state.skipped_waiting = true;
        Ok(())
    }
}
