use serde::{Deserialize, Serialize};

/// Messages the worker posts to every connected page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// A different version has been deployed, the page should offer a reload
    UpdateAvailable { version: String },
}
