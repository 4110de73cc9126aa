use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Conversation role of a chat message.
///
/// Roles outside the known set deserialize to [`Role::Other`] so that newer servers do
/// not break history loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Tool => "tool",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a chat conversation.
///
/// `content` is opaque to the resume protocol; only `role` and `id` carry meaning here.
/// Fields outside this shape are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ChatMessage {
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role, content: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            created_at: None,
        }
    }

    /// Builds a user message with plain text content.
    #[must_use]
    pub fn user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Role::User, Value::String(text.into()))
    }

    /// Builds an assistant message with plain text content.
    #[must_use]
    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Role::Assistant, Value::String(text.into()))
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ChatMessage, Role};

    #[test]
    fn unknown_role_maps_to_other() {
        let message: ChatMessage = serde_json::from_value(json!({
            "id": "m-1",
            "role": "data",
            "content": "x",
        }))
        .expect("message with unknown role should decode");

        assert_eq!(message.role, Role::Other);
        assert!(!message.is_user());
    }

    #[test]
    fn content_defaults_to_null_and_created_at_is_optional() {
        let message: ChatMessage = serde_json::from_value(json!({
            "id": "m-2",
            "role": "user",
        }))
        .expect("message without content should decode");

        assert_eq!(message.content, serde_json::Value::Null);
        assert!(message.created_at.is_none());
        assert!(message.is_user());

        let encoded = serde_json::to_value(&message).expect("message should encode");
        assert!(encoded.get("created_at").is_none());
    }

    #[test]
    fn role_display_matches_wire_name() {
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(
            serde_json::to_value(Role::Assistant).expect("role should encode"),
            json!("assistant")
        );
    }
}
