//! Splices replayed messages from the data-part stream into history.
//!
//! Only the head of the current snapshot is read. The provider is trusted to hold at
//! most one relevant chunk and to never re-emit a consumed one; a head that stays the
//! same across re-evaluations is appended again.

use chat_stream::DataPart;

use crate::history::MessageHistory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    NoParts,
    Appended { message_id: String },
    /// Head chunk is not an append-message chunk; left for other observers.
    Ignored { kind: String },
    /// Head chunk carried a payload that failed to decode.
    Dropped { kind: String },
}

impl ReconcileOutcome {
    #[must_use]
    pub fn appended(&self) -> bool {
        matches!(self, Self::Appended { .. })
    }
}

/// Reconciles the current data-part snapshot against `history`.
///
/// `set_history` is called at most once, with `history` followed by the decoded message.
pub fn on_data_parts_changed(
    data_parts: &[DataPart],
    history: &MessageHistory,
    set_history: &mut dyn FnMut(MessageHistory),
) -> ReconcileOutcome {
    let Some(head) = data_parts.first() else {
        return ReconcileOutcome::NoParts;
    };

    if !head.is_append_message() {
        tracing::trace!(kind = %head.kind, "ignoring data part");
        return ReconcileOutcome::Ignored {
            kind: head.kind.clone(),
        };
    }

    match head.decode_message() {
        Ok(message) => {
            let message_id = message.id.clone();
            tracing::info!(
                message_id = %message_id,
                role = %message.role,
                history_len = history.len(),
                "appending replayed message"
            );
            set_history(history.appended(message));
            ReconcileOutcome::Appended { message_id }
        }
        Err(error) => {
            tracing::warn!(%error, "dropping undecodable data part");
            ReconcileOutcome::Dropped {
                kind: head.kind.clone(),
            }
        }
    }
}
