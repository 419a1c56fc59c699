#[cfg(feature = "wasm")]
pub use wasm::*;

#[cfg(feature = "wasm")]
mod wasm {
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::js_sys::Error as JsErrorObject;

    /// Readable text for a thrown `JsValue`.
    ///
    /// `Error`s become `name: message` (fetch rejects with `TypeError: Failed to
    /// fetch` when offline), strings are used as is, anything else is debug printed.
    pub fn describe_js_error(value: &JsValue) -> String {
        if let Some(error) = value.dyn_ref::<JsErrorObject>() {
            let name = String::from(error.name());
            let message = String::from(error.message());
            return format!("{name}: {message}");
        }

        value.as_string().unwrap_or_else(|| format!("{value:?}"))
    }
}
