//! Bindings to the browser's service worker runtime

mod hooks;
pub use hooks::*;

mod scope;
pub use scope::*;
