//! Provider-agnostic contract for resumable chat streams.
//!
//! This crate defines the message model, the out-of-band data-part wire shape, the
//! shared data-part provider, and the transport seam used to reattach to a response
//! stream. It excludes network transport details and session orchestration.

mod data_part;
mod error;
mod message;
mod stream;
mod transport;

pub use data_part::{DataPart, DataParts, APPEND_MESSAGE};
pub use error::{DecodeError, TransportError};
pub use message::{ChatMessage, Role};
pub use stream::DataStream;
pub use transport::{ResumeRequest, ResumeTransport};
