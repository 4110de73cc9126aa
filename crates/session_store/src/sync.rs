use std::collections::HashSet;

use chat_stream::ChatMessage;

use crate::error::SessionStoreError;
use crate::schema::{SessionEntry, SessionLine};
use crate::store::{now_rfc3339, SessionStore};

impl SessionStore {
    /// Persists the tail of `history` that is not stored yet and returns how many
    /// messages were written.
    ///
    /// History is append-only: the stored messages must be an id-wise prefix of
    /// `history` and the new tail must not repeat an id, otherwise nothing is written.
    pub fn sync_history(&mut self, history: &[ChatMessage]) -> Result<usize, SessionStoreError> {
        let stored = self.messages.len();
        if history.len() < stored {
            return Err(SessionStoreError::HistoryTruncated {
                path: self.path.clone(),
                stored,
                found: history.len(),
            });
        }

        for (index, (stored_message, message)) in self.messages.iter().zip(history).enumerate() {
            if stored_message.id != message.id {
                return Err(SessionStoreError::HistoryDiverged {
                    path: self.path.clone(),
                    index,
                    stored_id: stored_message.id.clone(),
                    found_id: message.id.clone(),
                });
            }
        }

        let tail = &history[stored..];
        let mut tail_ids = HashSet::with_capacity(tail.len());
        for (offset, message) in tail.iter().enumerate() {
            if self.message_ids.contains(&message.id) || !tail_ids.insert(message.id.as_str()) {
                return Err(SessionStoreError::DuplicateMessageId {
                    path: self.path.clone(),
                    line: stored + offset + 2,
                    id: message.id.clone(),
                });
            }
        }

        let ts = now_rfc3339()?;
        let lines: Vec<SessionLine> = tail
            .iter()
            .map(|message| SessionLine::Entry(SessionEntry::new(ts.clone(), message.clone())))
            .collect();
        self.write_lines(&lines)?;

        for message in tail {
            self.message_ids.insert(message.id.clone());
            self.messages.push(message.clone());
        }

        if !tail.is_empty() {
            tracing::debug!(
                path = %self.path.display(),
                written = tail.len(),
                "persisted new history messages"
            );
        }
        Ok(tail.len())
    }
}
