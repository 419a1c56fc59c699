use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::message::{MessageError, MESSAGE_TAG, MESSAGE_TAG_ALIAS};

/// Messages a page posts to the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Ask the worker to compare the deployed version with the running one
    CheckVersion,
    /// Ask a waiting worker to activate immediately
    SkipWaiting,
}

impl TryFrom<Value> for ClientMessage {
    type Error = MessageError;

    /// Accepts the structured form (`{ "type": "CHECK_VERSION" }`, or `kind` in
    /// place of `type`) and the bare discriminator (`"CHECK_VERSION"`)
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Err(MessageError::Empty),
            Value::String(kind) => {
                let mut map = Map::with_capacity(1);
                map.insert(MESSAGE_TAG.to_string(), Value::String(kind));
                Ok(serde_json::from_value(Value::Object(map))?)
            }
            Value::Object(mut map) => {
                if !map.contains_key(MESSAGE_TAG) {
                    if let Some(kind) = map.remove(MESSAGE_TAG_ALIAS) {
                        map.insert(MESSAGE_TAG.to_string(), kind);
                    }
                }
                Ok(serde_json::from_value(Value::Object(map))?)
            }
            other => Ok(serde_json::from_value(other)?),
        }
    }
}
