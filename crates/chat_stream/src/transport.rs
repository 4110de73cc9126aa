use crate::error::TransportError;
use crate::stream::DataStream;

/// Input for reattaching to a chat's response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRequest {
    pub chat_id: String,
}

impl ResumeRequest {
    #[must_use]
    pub fn new(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
        }
    }
}

/// Transport able to reattach to an in-flight or just-finished response stream.
pub trait ResumeTransport: Send + Sync + 'static {
    /// Stable identifier used in logs and startup selection.
    fn transport_id(&self) -> &str;

    /// Starts reattaching to the stream for `req.chat_id`.
    ///
    /// Callers treat this as fire-and-forget: data arriving from the resumed stream is
    /// published through `stream`, never returned here. An `Err` only reports that the
    /// reattach could not be started.
    fn resume(&self, req: &ResumeRequest, stream: &DataStream) -> Result<(), TransportError>;
}
