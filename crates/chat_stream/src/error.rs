use thiserror::Error;

/// Failure to turn a data-part payload into a chat message.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("data part '{kind}' has no payload")]
    MissingPayload { kind: String },

    #[error("data part '{kind}' carries a malformed message payload: {source}")]
    MalformedMessage {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure reported by a transport while reattaching to a response stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no resumable stream for chat '{chat_id}'")]
    NoActiveStream { chat_id: String },

    #[error("transport unavailable: {message}")]
    Unavailable { message: String },
}

impl TransportError {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
