#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("message has no data")]
    Empty,
    #[error("de/serialize error: {0}")]
    Json(#[from] serde_json::Error),
}
