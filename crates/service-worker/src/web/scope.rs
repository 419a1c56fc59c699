use futures::{future::LocalBoxFuture, FutureExt};
use gloo::utils::format::JsValueSerdeExt;
use http::Method;
use shared::{error::describe_js_error, WorkerMessage};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    js_sys::Array, Cache, CacheStorage as JsCacheStorage, Client, Request, RequestCache,
    RequestInit, RequestMode, Response, ServiceWorkerGlobalScope,
};

use crate::platform::{CacheStorage, FetchRequest, PlatformError, WorkerClient, WorkerScope};

fn js_err(kind: fn(String) -> PlatformError) -> impl Fn(JsValue) -> PlatformError {
    move |e| kind(describe_js_error(&e))
}

fn expect_response(value: JsValue) -> Result<Response, PlatformError> {
    value.dyn_into::<Response>().map_err(|v| {
        PlatformError::UnexpectedValue(format!(
            "Fetch returned something other than a Response: {v:?}"
        ))
    })
}

#[derive(Debug, Clone)]
pub struct WebRequest(pub Request);

impl From<Request> for WebRequest {
    fn from(request: Request) -> Self {
        Self(request)
    }
}

impl FetchRequest for WebRequest {
    fn method(&self) -> Method {
        // Request.method is always a valid token, CONNECT is never intercepted
        Method::from_bytes(self.0.method().as_bytes()).unwrap_or(Method::CONNECT)
    }

    fn url(&self) -> String {
        self.0.url()
    }

    fn is_navigation(&self) -> bool {
        self.0.mode() == RequestMode::Navigate
    }
}

#[derive(Debug, Clone)]
pub struct WebClient(pub Client);

impl WorkerClient for WebClient {
    fn id(&self) -> String {
        self.0.id()
    }

    fn post_message(&self, message: &WorkerMessage) -> Result<(), PlatformError> {
        let value = <JsValue as JsValueSerdeExt>::from_serde(message)
            .map_err(|e| PlatformError::Client(format!("serialize {message:?}: {e}")))?;
        self.0.post_message(&value).map_err(js_err(PlatformError::Client))
    }
}

#[derive(Debug, Clone)]
pub struct WebCaches(pub JsCacheStorage);

impl WebCaches {
    async fn open(&self, name: &str) -> Result<Cache, PlatformError> {
        let cache: Cache = JsFuture::from(self.0.open(name))
            .await
            .map_err(js_err(PlatformError::Cache))?
            .into();
        Ok(cache)
    }
}

impl CacheStorage for WebCaches {
    type Request = WebRequest;
    type Response = Response;

    fn keys(&self) -> LocalBoxFuture<'_, Result<Vec<String>, PlatformError>> {
        async move {
            let keys: Array = JsFuture::from(self.0.keys())
                .await
                .map_err(js_err(PlatformError::Cache))?
                .into();
            Ok(keys.iter().filter_map(|k| k.as_string()).collect())
        }
        .boxed_local()
    }

    fn delete<'a>(&'a self, name: &'a str) -> LocalBoxFuture<'a, Result<bool, PlatformError>> {
        async move {
            let deleted = JsFuture::from(self.0.delete(name))
                .await
                .map_err(js_err(PlatformError::Cache))?;
            Ok(deleted.as_bool().unwrap_or(false))
        }
        .boxed_local()
    }

    fn add_all<'a>(
        &'a self,
        name: &'a str,
        paths: &'a [String],
    ) -> LocalBoxFuture<'a, Result<(), PlatformError>> {
        async move {
            let cache = self.open(name).await?;
            let requests = paths.iter().map(|p| JsValue::from_str(p)).collect::<Array>();

            // Cache.addAll is atomic, it rejects without storing anything if any
            // response isn't ok
            JsFuture::from(cache.add_all_with_str_sequence(&JsValue::from(requests)))
                .await
                .map_err(js_err(PlatformError::Network))?;
            Ok(())
        }
        .boxed_local()
    }

    fn match_request<'a>(
        &'a self,
        request: &'a WebRequest,
    ) -> LocalBoxFuture<'a, Result<Option<Response>, PlatformError>> {
        async move {
            let cached = JsFuture::from(self.0.match_with_request(&request.0))
                .await
                .map_err(js_err(PlatformError::Cache))?;

            if cached.is_instance_of::<Response>() {
                Ok(Some(cached.into()))
            } else if cached.is_undefined() {
                Ok(None)
            } else {
                Err(PlatformError::UnexpectedValue(format!(
                    "match_with_request returned something other than Response or undefined!: {cached:?}"
                )))
            }
        }
        .boxed_local()
    }
}

#[derive(Debug, Clone)]
pub struct WebScope(pub ServiceWorkerGlobalScope);

impl WorkerScope for WebScope {
    type Request = WebRequest;
    type Response = Response;
    type Client = WebClient;
    type Caches = WebCaches;

    fn caches(&self) -> Result<WebCaches, PlatformError> {
        self.0.caches().map(WebCaches).map_err(js_err(PlatformError::Cache))
    }

    fn fetch<'a>(
        &'a self,
        request: &'a WebRequest,
    ) -> LocalBoxFuture<'a, Result<Response, PlatformError>> {
        async move {
            let response = JsFuture::from(self.0.fetch_with_request(&request.0))
                .await
                .map_err(js_err(PlatformError::Network))?;
            expect_response(response)
        }
        .boxed_local()
    }

    fn fetch_text_no_store<'a>(
        &'a self,
        url: &'a str,
    ) -> LocalBoxFuture<'a, Result<String, PlatformError>> {
        async move {
            // Make sure we get the live file
            let mut init = RequestInit::new();
            init.method("GET").cache(RequestCache::NoStore);

            let response = JsFuture::from(self.0.fetch_with_str_and_init(url, &init))
                .await
                .map_err(js_err(PlatformError::Network))?;
            let response = expect_response(response)?;

            let text = JsFuture::from(response.text().map_err(js_err(PlatformError::Network))?)
                .await
                .map_err(js_err(PlatformError::Network))?;
            text.as_string().ok_or_else(|| {
                PlatformError::UnexpectedValue(format!("Response::text resolved to {text:?}"))
            })
        }
        .boxed_local()
    }

    fn match_all_clients(&self) -> LocalBoxFuture<'_, Result<Vec<WebClient>, PlatformError>> {
        async move {
            let clients: Array = JsFuture::from(self.0.clients().match_all())
                .await
                .map_err(js_err(PlatformError::Client))?
                .into();
            Ok(clients.iter().map(|c| WebClient(c.unchecked_into())).collect())
        }
        .boxed_local()
    }

    fn claim_clients(&self) -> LocalBoxFuture<'_, Result<(), PlatformError>> {
        async move {
            JsFuture::from(self.0.clients().claim())
                .await
                .map_err(js_err(PlatformError::Client))?;
            Ok(())
        }
        .boxed_local()
    }

    fn skip_waiting(&self) -> Result<(), PlatformError> {
        // MDN states the promise returned can be safely ignored
        let _ = self.0.skip_waiting().map_err(js_err(PlatformError::Lifecycle))?;
        Ok(())
    }
}
