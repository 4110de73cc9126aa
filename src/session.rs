//! Session host that drives the resume gate and the reconciler for one mounted chat.

use std::sync::Arc;

use chat_stream::{ChatMessage, DataStream, ResumeRequest, ResumeTransport};

use crate::auto_resume::AutoResume;
use crate::config::EnvConfig;
use crate::gate::ResumeDecision;
use crate::history::MessageHistory;
use crate::reconciler::ReconcileOutcome;

/// Inputs for mounting one chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub chat_id: String,
    pub auto_resume: bool,
    pub initial_messages: Vec<ChatMessage>,
}

impl SessionOptions {
    #[must_use]
    pub fn new(chat_id: impl Into<String>, initial_messages: Vec<ChatMessage>) -> Self {
        Self {
            chat_id: chat_id.into(),
            auto_resume: true,
            initial_messages,
        }
    }

    #[must_use]
    pub fn with_auto_resume(mut self, auto_resume: bool) -> Self {
        self.auto_resume = auto_resume;
        self
    }

    #[must_use]
    pub fn with_config(self, config: &EnvConfig) -> Self {
        self.with_auto_resume(config.auto_resume)
    }
}

/// Observers that ran during one [`ChatSession::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub resume: Option<ResumeDecision>,
    pub reconcile: Option<ReconcileOutcome>,
}

impl TickReport {
    /// True when neither observer saw changed inputs.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.resume.is_none() && self.reconcile.is_none()
    }
}

/// A mounted chat session: owns the history, the resume guard, and the observers.
///
/// Evaluation is single-threaded; the host drives it by calling [`ChatSession::tick`]
/// after anything that may have changed the inputs. Transports may feed the
/// [`DataStream`] from other threads.
pub struct ChatSession {
    chat_id: String,
    auto_resume: bool,
    history: MessageHistory,
    transport: Arc<dyn ResumeTransport>,
    stream: DataStream,
    hooks: AutoResume,
}

impl ChatSession {
    /// Mounts a session and runs the first evaluation of both observers.
    pub fn mount(
        options: SessionOptions,
        transport: Arc<dyn ResumeTransport>,
        stream: DataStream,
    ) -> Self {
        let mut session = Self {
            chat_id: options.chat_id,
            auto_resume: options.auto_resume,
            history: MessageHistory::new(options.initial_messages),
            transport,
            stream,
            hooks: AutoResume::mount(),
        };

        tracing::debug!(
            chat_id = %session.chat_id,
            transport = session.transport.transport_id(),
            history_len = session.history.len(),
            auto_resume = session.auto_resume,
            "mounting chat session"
        );
        session.tick();
        session
    }

    /// Re-evaluates the resume gate, then the reconciler, against current inputs.
    pub fn tick(&mut self) -> TickReport {
        let transport = &self.transport;
        let stream = &self.stream;
        let chat_id = &self.chat_id;
        let mut resume = || dispatch_resume(transport.as_ref(), chat_id, stream);
        let resume_decision =
            self.hooks
                .evaluate_resume(self.auto_resume, &self.history, &mut resume);

        let parts = self.stream.snapshot();
        let current = self.history.clone();
        let history = &mut self.history;
        let reconcile = self
            .hooks
            .reconcile(&parts, &current, &mut |next| *history = next);

        TickReport {
            resume: resume_decision,
            reconcile,
        }
    }

    /// Ticks until a tick finds no changed inputs, at most `max_ticks` times.
    ///
    /// Returns the number of ticks run, including the idle one, or `None` when no tick
    /// within the limit was idle.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> Option<usize> {
        (1..=max_ticks).find(|_| self.tick().is_idle())
    }

    /// Replaces the history through the session setter.
    pub fn set_messages(&mut self, messages: impl Into<MessageHistory>) {
        self.history = messages.into();
    }

    pub fn set_auto_resume(&mut self, enabled: bool) {
        self.auto_resume = enabled;
    }

    #[must_use]
    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    #[must_use]
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    #[must_use]
    pub fn stream(&self) -> &DataStream {
        &self.stream
    }

    #[must_use]
    pub fn resume_attempted(&self) -> bool {
        self.hooks.resume_attempted()
    }

    /// Unmounts the session, dropping its guard, and hands back the final history.
    #[must_use]
    pub fn unmount(self) -> MessageHistory {
        tracing::debug!(
            chat_id = %self.chat_id,
            history_len = self.history.len(),
            "unmounting chat session"
        );
        self.history
    }
}

fn dispatch_resume(transport: &dyn ResumeTransport, chat_id: &str, stream: &DataStream) {
    tracing::info!(chat_id, transport = transport.transport_id(), "resuming stream");
    if let Err(error) = transport.resume(&ResumeRequest::new(chat_id), stream) {
        tracing::warn!(chat_id, %error, "stream resume failed");
    }
}
