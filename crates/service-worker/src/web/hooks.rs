//! Entry points registered by the worker script's event listeners:
//!
//! ```js
//! self.addEventListener('install', e => e.waitUntil(worker_install(self, CONFIG)));
//! self.addEventListener('activate', e => e.waitUntil(worker_activate(self, CONFIG)));
//! self.addEventListener('fetch', e => worker_fetch(self, CONFIG, e));
//! self.addEventListener('message', e => worker_message(self, CONFIG, e));
//! ```
//!
//! `CONFIG` is the json `WorkerConfig` stamped in by the build, or `undefined`
//! for the defaults.

use std::rc::Rc;

use console_error_panic_hook::set_once as set_panic_hook;
use gloo::utils::format::JsValueSerdeExt;
use serde_json::Value;
use shared::{utils::tracing::configure_tracing_once as configure_tracing, WorkerConfig};
use tracing::error;
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};
use wasm_bindgen_futures::future_to_promise;
use web_sys::{
    js_sys::{Error as JsErrorObject, Promise},
    ExtendableMessageEvent, FetchEvent, ServiceWorkerGlobalScope,
};

use crate::{
    errors::{ResultContext, WorkerError},
    web::{WebRequest, WebScope},
    worker::Worker,
};

fn init() {
    set_panic_hook();
    configure_tracing();
}

/// Logs the error and turns it into a JS `Error` so the runtime sees a rejection
fn log_error(e: WorkerError) -> JsValue {
    error!("{e}");
    JsErrorObject::new(&e.to_string()).into()
}

fn load_worker(sw: ServiceWorkerGlobalScope, config: JsValue) -> Result<Worker<WebScope>, JsValue> {
    let config = WorkerConfig::from_js(&config)
        .context("worker config")
        .map_err(log_error)?;
    Worker::new(config, WebScope(sw)).map_err(log_error)
}

#[wasm_bindgen]
pub fn worker_install(sw: ServiceWorkerGlobalScope, config: JsValue) -> Result<Promise, JsValue> {
    init();
    let worker = load_worker(sw, config)?;

    Ok(future_to_promise(async move {
        worker.install().await.map_err(log_error)?;
        Ok(JsValue::undefined())
    }))
}

#[wasm_bindgen]
pub fn worker_activate(sw: ServiceWorkerGlobalScope, config: JsValue) -> Result<Promise, JsValue> {
    init();
    let worker = load_worker(sw, config)?;

    Ok(future_to_promise(async move {
        worker.activate().await.map_err(log_error)?;
        Ok(JsValue::undefined())
    }))
}

/// Not calling `respondWith` leaves the request to the browser, which is how
/// non GET requests pass through untouched
#[wasm_bindgen]
pub fn worker_fetch(
    sw: ServiceWorkerGlobalScope,
    config: JsValue,
    event: FetchEvent,
) -> Result<(), JsValue> {
    init();
    let worker = Rc::new(load_worker(sw, config)?);
    let handling = worker.on_fetch(WebRequest::from(event.request()));

    if let Some(version_check) = handling.version_check {
        event.wait_until(&future_to_promise(async move {
            version_check.await;
            Ok(JsValue::undefined())
        }))?;
    }

    if let Some(response) = handling.response {
        event.respond_with(&future_to_promise(async move {
            let response = response.await.map_err(log_error)?;
            Ok(JsValue::from(response))
        }))?;
    }

    Ok(())
}

#[wasm_bindgen]
pub fn worker_message(
    sw: ServiceWorkerGlobalScope,
    config: JsValue,
    event: ExtendableMessageEvent,
) -> Result<Promise, JsValue> {
    init();
    let worker = load_worker(sw, config)?;
    let data: Value = JsValueSerdeExt::into_serde(&event.data()).unwrap_or(Value::Null);

    let promise = future_to_promise(async move {
        worker.handle_message(data).await.map_err(log_error)?;
        Ok(JsValue::undefined())
    });
    event.wait_until(&promise)?;

    Ok(promise)
}
