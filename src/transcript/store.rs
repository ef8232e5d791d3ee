use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Error, Result};

use super::{Turn, seed_transcript};

/// Durable local mirror of the transcript. One named slot holding the
/// serialized array of turns, overwritten after every mutation.
pub struct TranscriptStore {
    path: PathBuf,
}

impl TranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the persisted transcript, falling back to the seed greeting
    /// when no mirror exists, it fails to parse, or it is empty. Parse
    /// failures are non-fatal and logged only.
    pub fn load(&self) -> Vec<Turn> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return seed_transcript(),
        };

        match serde_json::from_str::<Vec<Turn>>(&raw) {
            Ok(transcript) if !transcript.is_empty() => transcript,
            Ok(_) => seed_transcript(),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse stored transcript at {}, starting fresh: {}",
                    self.path.display(),
                    e
                );
                seed_transcript()
            }
        }
    }

    /// Overwrites the mirror with the current transcript
    pub fn save(&self, transcript: &[Turn]) -> Result<(), Error> {
        let data = serde_json::to_string(transcript)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    /// Erases the mirror. Missing file is not an error.
    pub fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
