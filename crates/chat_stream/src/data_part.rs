use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;
use crate::message::ChatMessage;

/// Discriminant of a data part that carries a message to splice into history.
pub const APPEND_MESSAGE: &str = "append-message";

/// Immutable snapshot of the data parts a provider holds at one point in time.
///
/// Snapshot identity (`Arc::ptr_eq`) is what observers compare to detect new arrivals.
pub type DataParts = Arc<[DataPart]>;

/// Tagged out-of-band chunk pushed alongside a response stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl DataPart {
    #[must_use]
    pub fn new(kind: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }

    /// Builds an `append-message` part whose payload is the JSON-encoded message text.
    ///
    /// Servers ship the message as a string inside `data`; [`DataPart::decode_message`]
    /// accepts both this form and an embedded object.
    pub fn append_message(message: &ChatMessage) -> Result<Self, serde_json::Error> {
        let encoded = serde_json::to_string(message)?;
        Ok(Self::new(APPEND_MESSAGE, Value::String(encoded)))
    }

    #[must_use]
    pub fn is_append_message(&self) -> bool {
        self.kind == APPEND_MESSAGE
    }

    /// Decodes the payload into a chat message.
    pub fn decode_message(&self) -> Result<ChatMessage, DecodeError> {
        let decoded = match &self.data {
            Value::Null => {
                return Err(DecodeError::MissingPayload {
                    kind: self.kind.clone(),
                })
            }
            Value::String(encoded) => serde_json::from_str::<ChatMessage>(encoded),
            other => serde_json::from_value::<ChatMessage>(other.clone()),
        };

        decoded.map_err(|source| DecodeError::MalformedMessage {
            kind: self.kind.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{DataPart, APPEND_MESSAGE};
    use crate::error::DecodeError;
    use crate::message::{ChatMessage, Role};

    #[test]
    fn decodes_string_encoded_payload() {
        let message = ChatMessage::assistant("a-1", "resumed reply");
        let part = DataPart::append_message(&message).expect("message should encode");

        assert_eq!(part.kind, APPEND_MESSAGE);
        assert!(part.data.is_string());
        assert_eq!(part.decode_message().expect("payload should decode"), message);
    }

    #[test]
    fn decodes_embedded_object_payload() {
        let part = DataPart::new(
            APPEND_MESSAGE,
            json!({ "id": "a-2", "role": "assistant", "content": "hi" }),
        );

        let message = part.decode_message().expect("object payload should decode");
        assert_eq!(message.id, "a-2");
        assert_eq!(message.role, Role::Assistant);
    }

    #[test]
    fn missing_payload_is_reported() {
        let part: DataPart =
            serde_json::from_value(json!({ "type": APPEND_MESSAGE })).expect("part should parse");

        let error = part.decode_message().expect_err("null payload must fail");
        assert!(matches!(error, DecodeError::MissingPayload { .. }));
    }

    #[test]
    fn malformed_payload_is_reported_with_kind() {
        let part = DataPart::new(APPEND_MESSAGE, "{ not json");

        let error = part.decode_message().expect_err("bad payload must fail");
        assert!(matches!(
            error,
            DecodeError::MalformedMessage { ref kind, .. } if kind == APPEND_MESSAGE
        ));
        assert!(error.to_string().contains("append-message"));
    }

    #[test]
    fn other_kinds_are_not_append_messages() {
        let part = DataPart::new("text-delta", "partial");
        assert!(!part.is_append_message());
    }
}
