use bytes::{Bytes, BytesMut};
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::{
    AnyDelimiterCodec, AnyDelimiterCodecError, Decoder, Encoder, Framed, LengthDelimitedCodec,
};

use crate::config::MAX_FRAME_LEN;
use crate::transport::{Framing, Transport, TransportError};

/// Splits a byte stream into text frames according to a [`Framing`].
///
/// Frames are handed out as raw bytes; UTF-8 is checked by the transport so
/// that a bad frame does not end the stream.
#[derive(Debug)]
pub struct TextFrameCodec {
    framing: Framing,
    utf: LengthDelimitedCodec,
    line: AnyDelimiterCodec,
}

impl TextFrameCodec {
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            utf: LengthDelimitedCodec::builder()
                .length_field_length(2)
                .max_frame_length(MAX_FRAME_LEN)
                .new_codec(),
            line: AnyDelimiterCodec::new_with_max_length(
                b"\n".to_vec(),
                b"\n".to_vec(),
                MAX_FRAME_LEN,
            ),
        }
    }
}

fn line_error(e: AnyDelimiterCodecError, len: usize) -> TransportError {
    match e {
        AnyDelimiterCodecError::MaxChunkLengthExceeded => TransportError::FrameTooLarge {
            len,
            max: MAX_FRAME_LEN,
        },
        AnyDelimiterCodecError::Io(e) => e.into(),
    }
}

fn strip_cr(mut line: Bytes) -> Bytes {
    if line.last() == Some(&b'\r') {
        line.truncate(line.len() - 1);
    }
    line
}

impl Decoder for TextFrameCodec {
    type Item = Bytes;
    type Error = TransportError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, TransportError> {
        match self.framing {
            Framing::Utf => Ok(self.utf.decode(src)?.map(BytesMut::freeze)),
            Framing::Line => {
                let buffered = src.len();
                let line = self.line.decode(src).map_err(|e| line_error(e, buffered))?;
                Ok(line.map(strip_cr))
            }
        }
    }

    // A partial length prefix or body left at EOF is an I/O error here,
    // never a clean close.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, TransportError> {
        match self.framing {
            Framing::Utf => Ok(self.utf.decode_eof(src)?.map(BytesMut::freeze)),
            Framing::Line => {
                let buffered = src.len();
                let line = self
                    .line
                    .decode_eof(src)
                    .map_err(|e| line_error(e, buffered))?;
                Ok(line.map(strip_cr))
            }
        }
    }
}

impl<'a> Encoder<&'a str> for TextFrameCodec {
    type Error = TransportError;

    fn encode(&mut self, msg: &'a str, dst: &mut BytesMut) -> Result<(), TransportError> {
        if msg.len() > MAX_FRAME_LEN {
            return Err(TransportError::FrameTooLarge {
                len: msg.len(),
                max: MAX_FRAME_LEN,
            });
        }
        match self.framing {
            Framing::Utf => self.utf.encode(Bytes::copy_from_slice(msg.as_bytes()), dst)?,
            Framing::Line => {
                if msg.contains('\n') {
                    return Err(TransportError::EmbeddedNewline);
                }
                self.line
                    .encode(msg, dst)
                    .map_err(|e| line_error(e, msg.len()))?
            }
        }
        Ok(())
    }
}

/// Frames text messages over any tokio byte stream.
pub struct FramedTransport<S> {
    frames: Framed<S, TextFrameCodec>,
}

/// The transport used for real connections.
pub type TcpTransport = FramedTransport<TcpStream>;

impl<S> FramedTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, framing: Framing) -> Self {
        Self {
            frames: Framed::new(stream, TextFrameCodec::new(framing)),
        }
    }
}

impl FramedTransport<TcpStream> {
    pub async fn connect<A: ToSocketAddrs>(addr: A, framing: Framing) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream, framing))
    }
}

#[async_trait::async_trait]
impl<S> Transport for FramedTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, msg: &str) -> Result<(), TransportError> {
        // `SinkExt::send` flushes before returning.
        self.frames.send(msg).await
    }

    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        match self.frames.next().await {
            Some(frame) => String::from_utf8(frame?.to_vec())
                .map(Some)
                .map_err(|_| TransportError::InvalidUtf8),
            None => Ok(None),
        }
    }
}
