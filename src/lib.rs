//! Resumable chat-stream reconciliation.
//!
//! A mounted [`ChatSession`] reattaches to an interrupted response stream at most once
//! and splices messages replayed through the out-of-band data-part stream into its
//! history.
//!
//! # Public API Overview
//! - [`gate::evaluate`] decides whether to resume; a [`ResumeGuard`] bounds it to one
//!   attempt per mount.
//! - [`reconciler::on_data_parts_changed`] appends the message carried by the head
//!   `append-message` data part.
//! - [`AutoResume`] wires both to change detection; [`ChatSession`] hosts it together
//!   with the history, the transport, and the [`DataStream`].
//! - [`config::EnvConfig`] and [`logging::init_logging`] cover environment setup.

pub mod config;
pub mod logging;

pub mod auto_resume;
pub mod gate;
pub mod guard;
pub mod history;
pub mod reconciler;
pub mod session;

pub use crate::auto_resume::AutoResume;
pub use crate::gate::ResumeDecision;
pub use crate::guard::ResumeGuard;
pub use crate::history::MessageHistory;
pub use crate::reconciler::ReconcileOutcome;
pub use crate::session::{ChatSession, SessionOptions, TickReport};

pub use chat_stream::{
    ChatMessage, DataPart, DataParts, DataStream, ResumeRequest, ResumeTransport, Role,
    TransportError, APPEND_MESSAGE,
};
