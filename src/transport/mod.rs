//! Message transports: one protocol message per frame.

use std::io;

pub mod framed;
pub mod in_memory;

pub use framed::{FramedTransport, TcpTransport, TextFrameCodec};
pub use in_memory::InMemoryTransport;

/// How message boundaries are marked on a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Framing {
    /// 2-byte big-endian length followed by UTF-8 bytes (Java `writeUTF`).
    #[default]
    Utf,
    /// One message per `\n`-terminated line; a trailing `\r` is dropped.
    Line,
}

/// Errors raised while moving frames.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },
    /// A complete frame arrived but its bytes are not UTF-8. The stream is
    /// still aligned on a frame boundary.
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,
    #[error("message contains a newline and cannot be line framed")]
    EmbeddedNewline,
    #[error("peer has gone away")]
    Closed,
}

impl TransportError {
    /// Whether the connection can keep being used after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TransportError::InvalidUtf8)
    }
}

#[async_trait::async_trait]
pub trait Transport: Send {
    /// Write one message and flush it.
    async fn send(&mut self, msg: &str) -> Result<(), TransportError>;
    /// Next message, or `None` once the peer has closed the connection.
    async fn recv(&mut self) -> Result<Option<String>, TransportError>;
}
