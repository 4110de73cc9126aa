//! Once-per-mount decision whether to reattach to an interrupted response stream.
//!
//! A trailing user message is the only signal for a pending assistant turn. No timestamp
//! or stream status is consulted, so any trailing entry with role `user` triggers a
//! resume.

use chat_stream::{ChatMessage, Role};

use crate::guard::ResumeGuard;

/// What a gate evaluation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeDecision {
    /// The guard was already consumed by an earlier evaluation in this mount.
    AlreadyEvaluated,
    Disabled,
    EmptyHistory,
    LastMessageNotUser(Role),
    Resumed,
}

impl ResumeDecision {
    #[must_use]
    pub fn resumed(&self) -> bool {
        matches!(self, Self::Resumed)
    }
}

/// Evaluates the gate and invokes `resume` at most once per guard.
///
/// The guard is consumed by the first evaluation even when auto-resume is disabled or
/// nothing qualifies. `resume` is fire-and-forget: its outcome is not observed here.
pub fn evaluate(
    auto_resume_enabled: bool,
    history: &[ChatMessage],
    resume: &mut dyn FnMut(),
    guard: &ResumeGuard,
) -> ResumeDecision {
    if !guard.try_consume() {
        return ResumeDecision::AlreadyEvaluated;
    }

    let decision = if !auto_resume_enabled {
        ResumeDecision::Disabled
    } else {
        match history.last() {
            None => ResumeDecision::EmptyHistory,
            Some(last) if last.role != Role::User => ResumeDecision::LastMessageNotUser(last.role),
            Some(_) => ResumeDecision::Resumed,
        }
    };

    tracing::debug!(?decision, history_len = history.len(), "resume gate evaluated");
    if decision.resumed() {
        resume();
    }

    decision
}
