//! Append-only JSONL persistence for chat message history.
//!
//! A session file starts with one header record and continues with one entry record per
//! message, in conversation order. Loading a file seeds a chat session's history.

mod error;
mod paths;
mod schema;
mod store;
mod sync;

pub use error::SessionStoreError;
pub use paths::{session_file_name, session_root};
pub use schema::{SessionEntry, SessionHeader, SessionLine, SESSION_VERSION};
pub use store::SessionStore;
