use anyhow::{Error, Result};

use crate::gateway::CompletionGateway;
use crate::transcript::{TYPING_INDICATOR, TranscriptStore, Turn, seed_transcript};

/// Handle for one accepted send. The epoch ties a pending placeholder to the
/// reply that is allowed to fill it, so a reply that arrives after a reset is
/// discarded instead of landing in a fresh transcript.
#[derive(Debug)]
pub struct SendToken {
    epoch: u64,
}

#[derive(Debug)]
pub enum Submission {
    Accepted(SendToken),
    /// Input was empty or whitespace-only, nothing changed
    EmptyInput,
    /// A send is already pending, one request in flight at a time
    Busy,
}

/// Owns the transcript and drives the send cycle:
/// append user turn -> append placeholder -> await gateway -> replace
/// placeholder with the reply. The mirror is saved after every mutation.
pub struct Controller {
    transcript: Vec<Turn>,
    store: TranscriptStore,
    pending: Option<u64>,
    epoch: u64,
}

impl Controller {
    /// Rehydrates the transcript from the store, seeding a greeting when
    /// nothing usable is persisted
    pub fn new(store: TranscriptStore) -> Self {
        let transcript = store.load();
        Self {
            transcript,
            store,
            pending: None,
            epoch: 0,
        }
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Accepts a user message and appends it along with the typing
    /// placeholder. Whitespace-only input and a second send while one is
    /// pending are rejected with zero mutations.
    pub fn submit(&mut self, input: &str) -> Result<Submission, Error> {
        if input.trim().is_empty() {
            return Ok(Submission::EmptyInput);
        }
        if self.pending.is_some() {
            return Ok(Submission::Busy);
        }

        self.transcript.push(Turn::user(input));
        self.transcript.push(Turn::assistant(TYPING_INDICATOR));
        self.store.save(&self.transcript)?;

        self.epoch += 1;
        self.pending = Some(self.epoch);
        Ok(Submission::Accepted(SendToken { epoch: self.epoch }))
    }

    /// Snapshot sent to the gateway: the transcript minus the trailing
    /// placeholder
    pub fn outbound(&self) -> Vec<Turn> {
        self.transcript
            .iter()
            .filter(|turn| !turn.is_placeholder())
            .cloned()
            .collect()
    }

    /// Replaces the pending placeholder in place with the gateway's reply.
    /// Returns false when the token was superseded by a reset, in which case
    /// the stale reply is dropped.
    pub fn resolve(&mut self, token: SendToken, reply: Turn) -> Result<bool, Error> {
        if self.pending != Some(token.epoch) {
            tracing::debug!("Discarding reply for a superseded request");
            return Ok(false);
        }
        self.pending = None;

        if let Some(last) = self.transcript.last_mut() {
            *last = reply;
        }
        self.store.save(&self.transcript)?;
        Ok(true)
    }

    /// Reseeds the transcript and purges the mirror. Callable from any
    /// state; a pending send is invalidated so its late reply is discarded.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.pending = None;
        self.transcript = seed_transcript();
        self.store.clear()
    }

    /// The composed send cycle. Returns true when the reply landed in the
    /// transcript.
    pub async fn send<G>(&mut self, gateway: &G, input: &str) -> Result<bool, Error>
    where
        G: CompletionGateway + ?Sized,
    {
        let token = match self.submit(input)? {
            Submission::Accepted(token) => token,
            Submission::EmptyInput | Submission::Busy => return Ok(false),
        };
        let reply = gateway.complete(&self.outbound()).await;
        self.resolve(token, reply)
    }
}
