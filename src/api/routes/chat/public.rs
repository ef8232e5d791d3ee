//! Public types for the chat relay API

use serde::Deserialize;
use serde_json::Value;

/// Inbound relay request. The message list is kept as raw JSON so it can be
/// forwarded to the provider verbatim.
#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Option<Value>,
}
