use crate::error::AppError;
use crate::pipeline::types::ClassificationResult;
use futures::future::BoxFuture;
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tower::Service;

type Slot = Option<Arc<ClassificationResult>>;

/// Writes the latest classification into the single published slot.
///
/// Every publish swaps the whole `Arc`, so readers see either the previous
/// result or the new one, never a mix.
#[derive(Clone)]
pub struct ResultPublishingService {
    slot_tx: Arc<watch::Sender<Slot>>,
}

impl ResultPublishingService {
    pub fn new() -> (Self, ResultReader) {
        let (slot_tx, slot_rx) = watch::channel(None);
        (
            Self {
                slot_tx: Arc::new(slot_tx),
            },
            ResultReader { slot_rx },
        )
    }

    pub fn subscribe(&self) -> ResultReader {
        ResultReader {
            slot_rx: self.slot_tx.subscribe(),
        }
    }

    pub fn publish(&self, result: ClassificationResult) -> Arc<ClassificationResult> {
        let result = Arc::new(result);
        // send_replace keeps working with no readers attached.
        self.slot_tx.send_replace(Some(result.clone()));
        result
    }
}

impl Service<ClassificationResult> for ResultPublishingService {
    type Response = Arc<ClassificationResult>;
    type Error = AppError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, result: ClassificationResult) -> Self::Future {
        let published = self.publish(result);
        Box::pin(async move { Ok(published) })
    }
}

/// Pull-based view of the published slot for the presentation layer.
#[derive(Clone)]
pub struct ResultReader {
    slot_rx: watch::Receiver<Slot>,
}

impl ResultReader {
    /// The most recently completed classification, if any.
    pub fn latest(&self) -> Option<Arc<ClassificationResult>> {
        self.slot_rx.borrow().clone()
    }

    /// Waits for the next publish and returns it. `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<Arc<ClassificationResult>> {
        match self.slot_rx.changed().await {
            Ok(()) => self.slot_rx.borrow_and_update().clone(),
            Err(_) => None,
        }
    }

    /// Every publish as a stream, starting with the current value.
    pub fn into_stream(self) -> WatchStream<Slot> {
        WatchStream::new(self.slot_rx)
    }
}
