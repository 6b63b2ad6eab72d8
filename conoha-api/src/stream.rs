//! One-shot result stream.
//!
//! A request produces at most one item: either the result or the terminal
//! error. The sender is consumed by [`OneShotSender::send`], so a second item
//! cannot be written. The consumer side is an ordinary stream, which keeps the
//! door open for emitting progress updates over the same wire shape later.

use conoha_common::{ErrorCode, MinecraftResponse, StreamError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

pub type StreamItem = Result<MinecraftResponse, StreamError>;

pub struct OneShotSender {
    tx: Option<mpsc::Sender<StreamItem>>,
}

pub fn one_shot() -> (OneShotSender, ReceiverStream<StreamItem>) {
    let (tx, rx) = mpsc::channel(1);
    (OneShotSender { tx: Some(tx) }, ReceiverStream::new(rx))
}

impl OneShotSender {
    /// Deliver the only item and close the stream.
    /// Returns false when the consumer is already gone.
    pub fn send(mut self, item: StreamItem) -> bool {
        match self.tx.take() {
            Some(tx) => tx.try_send(item).is_ok(),
            None => false,
        }
    }

    /// Resolves once the consumer has been dropped.
    pub async fn closed(&self) {
        if let Some(tx) = &self.tx {
            tx.closed().await
        }
    }
}

// A producer that dies without sending still closes the stream with an error.
impl Drop for OneShotSender {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.try_send(Err(StreamError::new(
                ErrorCode::Internal,
                "request ended without a result",
            )));
        }
    }
}
