use chat_stream::ChatMessage;
use serde::{Deserialize, Serialize};

pub const SESSION_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionHeader {
    pub version: u32,
    pub chat_id: String,
    pub created_at: String,
    pub cwd: String,
}

impl SessionHeader {
    #[must_use]
    pub fn v1(
        chat_id: impl Into<String>,
        created_at: impl Into<String>,
        cwd: impl Into<String>,
    ) -> Self {
        Self {
            version: SESSION_VERSION,
            chat_id: chat_id.into(),
            created_at: created_at.into(),
            cwd: cwd.into(),
        }
    }
}

/// One persisted message with the time it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionEntry {
    pub ts: String,
    pub message: ChatMessage,
}

impl SessionEntry {
    #[must_use]
    pub fn new(ts: impl Into<String>, message: ChatMessage) -> Self {
        Self {
            ts: ts.into(),
            message,
        }
    }
}

/// Line shape of a session file; the `type` tag selects the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionLine {
    Session(SessionHeader),
    Entry(SessionEntry),
}
