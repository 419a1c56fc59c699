//! Types shared between the offline worker and the page that hosts it: the
//! build-stamped worker configuration, the cache naming convention and the
//! message protocol spoken over `postMessage`.

pub mod error;
pub mod model;
pub mod types;
pub mod utils;

pub use model::*;
pub use types::message::*;
