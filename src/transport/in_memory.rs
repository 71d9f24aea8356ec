use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::transport::{Transport, TransportError};

/// One end of an in-process, already-framed message pipe.
pub struct InMemoryTransport {
    tx: UnboundedSender<String>,
    rx: UnboundedReceiver<String>,
}

impl InMemoryTransport {
    /// Two connected ends: what one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = unbounded_channel();
        let (tx2, rx2) = unbounded_channel();
        (Self { tx: tx1, rx: rx2 }, Self { tx: tx2, rx: rx1 })
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, msg: &str) -> Result<(), TransportError> {
        self.tx
            .send(msg.to_owned())
            .map_err(|_| TransportError::Closed)
    }

    /// Returns `None` once the other end has been dropped and drained.
    async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        Ok(self.rx.recv().await)
    }
}
