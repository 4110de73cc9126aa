//! Deterministic mock implementation of the shared `chat_stream` transport contract.
//!
//! This crate contains no network logic and is intended for local development and
//! contract-level integration testing. On every resume it publishes a scripted list of
//! data parts into the caller's stream, synchronously and in script order.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use chat_stream::{
    ChatMessage, DataPart, DataStream, ResumeRequest, ResumeTransport, TransportError,
};
use thiserror::Error;

/// Stable transport identifier used for explicit startup selection.
pub const MOCK_TRANSPORT_ID: &str = "mock";

#[derive(Debug, Error)]
pub enum ReplayScriptError {
    #[error("I/O error while reading replay script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse data part at {path}:{line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Scripted transport used by session tests and the CLI.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Vec<DataPart>,
    failure: Option<TransportError>,
    resume_calls: AtomicUsize,
    requests: Mutex<Vec<ResumeRequest>>,
}

impl MockTransport {
    /// Creates a transport that replays `script` on every resume.
    #[must_use]
    pub fn new(script: Vec<DataPart>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    /// Creates a transport whose resume replays a single finished assistant message.
    pub fn replaying(message: &ChatMessage) -> Result<Self, serde_json::Error> {
        Ok(Self::new(vec![DataPart::append_message(message)?]))
    }

    /// Creates a transport that fails every resume with `error`.
    #[must_use]
    pub fn failing(error: TransportError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Loads a replay script with one JSON data part per line. Blank lines are skipped.
    pub fn from_script_file(path: &Path) -> Result<Self, ReplayScriptError> {
        let raw = fs::read_to_string(path).map_err(|source| ReplayScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut script = Vec::new();
        for (line_index, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let part = serde_json::from_str::<DataPart>(line).map_err(|source| {
                ReplayScriptError::Parse {
                    path: path.to_path_buf(),
                    line: line_index + 1,
                    source,
                }
            })?;
            script.push(part);
        }

        Ok(Self::new(script))
    }

    #[must_use]
    pub fn script(&self) -> &[DataPart] {
        &self.script
    }

    /// Number of resume calls observed, including failed ones.
    #[must_use]
    pub fn resume_calls(&self) -> usize {
        self.resume_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn requests(&self) -> Vec<ResumeRequest> {
        lock_unpoisoned(&self.requests).clone()
    }
}

impl ResumeTransport for MockTransport {
    fn transport_id(&self) -> &str {
        MOCK_TRANSPORT_ID
    }

    fn resume(&self, req: &ResumeRequest, stream: &DataStream) -> Result<(), TransportError> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        lock_unpoisoned(&self.requests).push(req.clone());

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        tracing::debug!(
            chat_id = %req.chat_id,
            parts = self.script.len(),
            "mock transport replaying script"
        );
        for part in &self.script {
            stream.push(part.clone());
        }

        Ok(())
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
