use serde::{Deserialize, Serialize};

mod store;
pub use store::TranscriptStore;

/// Seed turn shown at the start of every fresh conversation
pub const GREETING: &str = "Hello! How can I help you today?";

/// Sentinel text for the transient assistant turn while a request is in
/// flight. Always replaced before the send cycle completes.
pub const TYPING_INDICATOR: &str = "AI is typing...";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Speaker {
    #[serde(rename = "You")]
    User,
    #[serde(rename = "AI")]
    Assistant,
}

/// One message unit in the transcript, attributed to the user or the
/// assistant. The `sender` naming matches the persisted mirror format.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Turn {
    pub sender: Speaker,
    pub text: String,
}

impl Turn {
    pub fn user(text: &str) -> Self {
        Turn {
            sender: Speaker::User,
            text: text.to_string(),
        }
    }

    pub fn assistant(text: &str) -> Self {
        Turn {
            sender: Speaker::Assistant,
            text: text.to_string(),
        }
    }

    /// An assistant turn still waiting on its reply
    pub fn is_placeholder(&self) -> bool {
        self.sender == Speaker::Assistant && self.text == TYPING_INDICATOR
    }
}

/// The one-element transcript every conversation starts from
pub fn seed_transcript() -> Vec<Turn> {
    vec![Turn::assistant(GREETING)]
}
