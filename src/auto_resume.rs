//! Per-mount wiring of the resume gate and the data-part reconciler.
//!
//! [`AutoResume`] is created once per mounted session. The host calls
//! [`AutoResume::evaluate_resume`] and [`AutoResume::reconcile`] whenever it re-evaluates;
//! each observer runs only when its inputs changed identity since its last run.

use std::sync::Arc;

use chat_stream::DataParts;

use crate::gate::{self, ResumeDecision};
use crate::guard::ResumeGuard;
use crate::history::MessageHistory;
use crate::reconciler::{self, ReconcileOutcome};

#[derive(Debug, Default)]
pub struct AutoResume {
    guard: ResumeGuard,
    observed_inputs: Option<(bool, MessageHistory)>,
    observed_parts: Option<DataParts>,
}

impl AutoResume {
    #[must_use]
    pub fn mount() -> Self {
        Self::default()
    }

    /// Runs the resume gate when `auto_resume_enabled` or the history identity changed.
    ///
    /// Returns `None` when the inputs are unchanged since the previous call.
    pub fn evaluate_resume(
        &mut self,
        auto_resume_enabled: bool,
        history: &MessageHistory,
        resume: &mut dyn FnMut(),
    ) -> Option<ResumeDecision> {
        let unchanged = self
            .observed_inputs
            .as_ref()
            .is_some_and(|(enabled, seen)| {
                *enabled == auto_resume_enabled && seen.same_ref(history)
            });
        if unchanged {
            return None;
        }

        self.observed_inputs = Some((auto_resume_enabled, history.clone()));
        Some(gate::evaluate(
            auto_resume_enabled,
            history,
            resume,
            &self.guard,
        ))
    }

    /// Runs the reconciler when the data-part snapshot identity changed.
    ///
    /// Returns `None` when `data_parts` is the snapshot seen by the previous call.
    pub fn reconcile(
        &mut self,
        data_parts: &DataParts,
        history: &MessageHistory,
        set_history: &mut dyn FnMut(MessageHistory),
    ) -> Option<ReconcileOutcome> {
        let unchanged = self
            .observed_parts
            .as_ref()
            .is_some_and(|seen| Arc::ptr_eq(seen, data_parts));
        if unchanged {
            return None;
        }

        self.observed_parts = Some(Arc::clone(data_parts));
        Some(reconciler::on_data_parts_changed(
            data_parts,
            history,
            set_history,
        ))
    }

    /// True once the gate has been evaluated in this mount, whether or not it resumed.
    #[must_use]
    pub fn resume_attempted(&self) -> bool {
        self.guard.is_consumed()
    }
}

#[cfg(test)]
mod tests {
    use chat_stream::{ChatMessage, DataPart, DataStream};

    use super::AutoResume;
    use crate::gate::ResumeDecision;
    use crate::history::MessageHistory;
    use crate::reconciler::ReconcileOutcome;

    #[test]
    fn gate_reruns_only_on_input_change_and_resumes_once() {
        let mut hooks = AutoResume::mount();
        let history = MessageHistory::new(vec![ChatMessage::user("u-1", "hi")]);
        let mut calls = 0usize;

        let first = hooks.evaluate_resume(true, &history, &mut || calls += 1);
        let same = hooks.evaluate_resume(true, &history.clone(), &mut || calls += 1);
        let toggled = hooks.evaluate_resume(false, &history, &mut || calls += 1);
        let rebuilt = MessageHistory::new(history.to_vec());
        let new_ref = hooks.evaluate_resume(true, &rebuilt, &mut || calls += 1);

        assert_eq!(first, Some(ResumeDecision::Resumed));
        assert_eq!(same, None);
        assert_eq!(toggled, Some(ResumeDecision::AlreadyEvaluated));
        assert_eq!(new_ref, Some(ResumeDecision::AlreadyEvaluated));
        assert_eq!(calls, 1);
        assert!(hooks.resume_attempted());
    }

    #[test]
    fn reconcile_reruns_only_on_new_snapshot() {
        let mut hooks = AutoResume::mount();
        let stream = DataStream::new();
        let history = MessageHistory::default();
        let mut updates = Vec::new();

        let empty = hooks.reconcile(&stream.snapshot(), &history, &mut |next| updates.push(next));
        assert_eq!(empty, Some(ReconcileOutcome::NoParts));

        stream.push(
            DataPart::append_message(&ChatMessage::assistant("a-1", "resumed"))
                .expect("message should encode"),
        );
        let snapshot = stream.snapshot();
        let appended = hooks.reconcile(&snapshot, &history, &mut |next| updates.push(next));
        let repeat = hooks.reconcile(&snapshot, &history, &mut |next| updates.push(next));

        assert!(appended.is_some_and(|outcome| outcome.appended()));
        assert_eq!(repeat, None);
        assert_eq!(updates.len(), 1);
    }
}
