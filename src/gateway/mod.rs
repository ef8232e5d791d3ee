use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Error, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::transcript::{Speaker, Turn};

/// Reply text when the relay can't be reached or returns garbage. Failures
/// never halt the conversation, they land as this assistant turn.
pub const ERROR_REPLY: &str = "Error: unable to process your request.";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

impl From<&Speaker> for Role {
    fn from(speaker: &Speaker) -> Self {
        match speaker {
            Speaker::User => Role::User,
            Speaker::Assistant => Role::Assistant,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for WireMessage {
    fn from(turn: &Turn) -> Self {
        WireMessage {
            role: Role::from(&turn.sender),
            content: turn.text.clone(),
        }
    }
}

/// Seam between the controller and the network so tests can drive the
/// controller with a canned gateway.
#[async_trait]
pub trait CompletionGateway {
    async fn complete(&self, transcript: &[Turn]) -> Turn;
}

/// Client for the relay's chat endpoint. Translates the transcript into the
/// wire schema, issues one request, and maps the reply (or any failure) back
/// into an assistant turn.
pub struct GatewayClient {
    api_url: String,
    loading: AtomicBool,
}

impl GatewayClient {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            loading: AtomicBool::new(false),
        }
    }

    /// True while a request is in flight, for disabling the send control
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    async fn request(&self, transcript: &[Turn]) -> Result<String, Error> {
        if transcript.is_empty() {
            bail!("Transcript must not be empty");
        }

        let messages: Vec<WireMessage> = transcript
            .iter()
            .filter(|turn| !turn.is_placeholder())
            .map(WireMessage::from)
            .collect();

        let url = format!("{}/api/chat", self.api_url);
        let response: Value = reqwest::Client::new()
            .post(url)
            .header("Content-Type", "application/json")
            .json(&json!({ "messages": messages }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .get("content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Completion reply missing content field: {}", response))
    }
}

#[async_trait]
impl CompletionGateway for GatewayClient {
    async fn complete(&self, transcript: &[Turn]) -> Turn {
        self.loading.store(true, Ordering::SeqCst);
        let result = self.request(transcript).await;
        self.loading.store(false, Ordering::SeqCst);

        match result {
            Ok(content) => Turn::assistant(&content),
            Err(e) => {
                tracing::error!("Error communicating with the relay: {}", e);
                Turn::assistant(ERROR_REPLY)
            }
        }
    }
}
