use std::ops::Deref;
use std::sync::Arc;

use chat_stream::ChatMessage;

/// Copy-on-write message history of one chat session.
///
/// Cloning shares storage. [`MessageHistory::appended`] builds a new sequence with a new
/// identity, so observers detect changes with [`MessageHistory::same_ref`] instead of
/// comparing contents. Equality (`==`) compares contents.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    messages: Arc<[ChatMessage]>,
}

impl MessageHistory {
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages: Arc::from(messages),
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns a new history equal to `self` followed by `message`.
    #[must_use]
    pub fn appended(&self, message: ChatMessage) -> Self {
        let mut next = Vec::with_capacity(self.messages.len() + 1);
        next.extend(self.messages.iter().cloned());
        next.push(message);
        Self::new(next)
    }

    /// True when both handles point at the same sequence.
    #[must_use]
    pub fn same_ref(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.messages, &other.messages)
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.to_vec()
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for MessageHistory {
    type Target = [ChatMessage];

    fn deref(&self) -> &Self::Target {
        &self.messages
    }
}

impl PartialEq for MessageHistory {
    fn eq(&self, other: &Self) -> bool {
        self.messages[..] == other.messages[..]
    }
}

impl Eq for MessageHistory {}

impl From<Vec<ChatMessage>> for MessageHistory {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self::new(messages)
    }
}

#[cfg(test)]
mod tests {
    use chat_stream::ChatMessage;

    use super::MessageHistory;

    #[test]
    fn appended_leaves_original_untouched_and_changes_identity() {
        let original = MessageHistory::new(vec![ChatMessage::user("u-1", "hi")]);
        let next = original.appended(ChatMessage::assistant("a-1", "hello"));

        assert_eq!(original.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next[0], original[0]);
        assert_eq!(next.last().map(|m| m.id.as_str()), Some("a-1"));
        assert!(!next.same_ref(&original));
    }

    #[test]
    fn clones_share_identity_and_equal_contents_are_equal() {
        let history = MessageHistory::new(vec![ChatMessage::user("u-1", "hi")]);
        let shared = history.clone();
        let rebuilt = MessageHistory::new(history.to_vec());

        assert!(shared.same_ref(&history));
        assert!(!rebuilt.same_ref(&history));
        assert_eq!(rebuilt, history);
    }

    #[test]
    fn default_history_is_empty_and_derefs_to_slice() {
        let history = MessageHistory::default();

        assert!(history.is_empty());
        assert!(history.last().is_none());
        assert_eq!(history, MessageHistory::from(Vec::new()));
    }
}
