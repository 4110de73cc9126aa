//! Headless driver that reattaches a persisted chat session to its response stream.
//!
//! ## Session selection
//!
//! - `CHAT_RESUME_SESSION=<path>` opens that session file.
//! - Otherwise the newest session under `<cwd>/.chat/sessions` is opened, and a new
//!   one is created when none exists.
//!
//! ## Transport
//!
//! The driver uses the deterministic mock transport. `CHAT_RESUME_REPLAY=<path>` points
//! at a JSONL file with one data part per line, published on resume:
//!
//! ```json
//! {"type": "append-message", "data": "{\"id\":\"a-1\",\"role\":\"assistant\",\"content\":\"done\"}"}
//! ```
//!
//! Messages appended by reconciliation are persisted back to the session file, and the
//! final history is written to the output as JSON lines.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chat_resume::config::EnvConfig;
use chat_resume::{ChatSession, SessionOptions};
use chat_stream::{DataStream, ResumeTransport};
use chat_stream_mock::{MockTransport, ReplayScriptError};
use session_store::{SessionStore, SessionStoreError};
use thiserror::Error;

pub const SESSION_PATH_ENV: &str = "CHAT_RESUME_SESSION";
pub const REPLAY_PATH_ENV: &str = "CHAT_RESUME_REPLAY";

/// Upper bound on host re-evaluations before the driver stops waiting for quiet.
pub const MAX_TICKS: usize = 64;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),

    #[error(transparent)]
    Replay(#[from] ReplayScriptError),

    #[error("failed to encode message for output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub env: EnvConfig,
    pub session_path: Option<PathBuf>,
    pub replay_path: Option<PathBuf>,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            env: EnvConfig::from_env(),
            session_path: env_path_opt(SESSION_PATH_ENV),
            replay_path: env_path_opt(REPLAY_PATH_ENV),
        }
    }
}

/// Outcome of one driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub chat_id: String,
    pub session_path: PathBuf,
    pub resumed: bool,
    pub persisted: usize,
    pub history_len: usize,
}

pub fn run(config: &CliConfig, cwd: &Path, out: &mut dyn Write) -> Result<RunSummary, CliError> {
    let mut store = open_store(config, cwd)?;
    let transport = Arc::new(match &config.replay_path {
        Some(path) => MockTransport::from_script_file(path)?,
        None => MockTransport::new(Vec::new()),
    });

    let options = SessionOptions::new(store.chat_id(), store.messages().to_vec())
        .with_config(&config.env);
    let mut session = ChatSession::mount(
        options,
        Arc::clone(&transport) as Arc<dyn ResumeTransport>,
        DataStream::new(),
    );
    if session.run_until_idle(MAX_TICKS).is_none() {
        tracing::warn!(
            chat_id = %session.chat_id(),
            max_ticks = MAX_TICKS,
            "session did not settle"
        );
    }

    let history = session.unmount();
    let persisted = store.sync_history(&history)?;

    for message in history.iter() {
        serde_json::to_writer(&mut *out, message)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(RunSummary {
        chat_id: store.chat_id().to_string(),
        session_path: store.path().to_path_buf(),
        resumed: transport.resume_calls() > 0,
        persisted,
        history_len: history.len(),
    })
}

fn open_store(config: &CliConfig, cwd: &Path) -> Result<SessionStore, SessionStoreError> {
    if let Some(path) = &config.session_path {
        return SessionStore::open(path);
    }

    match SessionStore::open_latest(cwd) {
        Ok(store) => Ok(store),
        Err(SessionStoreError::NoSessionsFound { .. }) => SessionStore::create_new(cwd),
        Err(error) => Err(error),
    }
}

fn env_path_opt(key: &str) -> Option<PathBuf> {
    env::var_os(key).and_then(|value| {
        if value.is_empty() {
            None
        } else {
            Some(PathBuf::from(value))
        }
    })
}
