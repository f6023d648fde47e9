//! One-slot, replace-on-send handoff between a frame producer and the worker.

use crate::error::AppError;
use crate::pipeline::metrics::PipelineMetrics;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

struct Shared<F> {
    slot: Mutex<Option<F>>,
    notify: Notify,
    closed: AtomicBool,
    metrics: Arc<PipelineMetrics>,
}

impl<F> Shared<F> {
    fn slot(&self) -> MutexGuard<'_, Option<F>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn close(&self) {
        let mut slot = self.slot();
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        // A frame that never reached the worker is released here.
        let waiting = slot.take();
        drop(slot);
        if waiting.is_some() {
            self.metrics.record_dropped();
            tracing::debug!("Dropped a waiting frame on close");
        }
        drop(waiting);
        self.notify.notify_one();
    }
}

pub fn frame_slot<F>(metrics: Arc<PipelineMetrics>) -> (FrameSender<F>, FrameReceiver<F>) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(None),
        notify: Notify::new(),
        closed: AtomicBool::new(false),
        metrics,
    });
    (
        FrameSender {
            shared: shared.clone(),
        },
        FrameReceiver { shared },
    )
}

/// Producer half. Cloneable, never blocks.
pub struct FrameSender<F> {
    shared: Arc<Shared<F>>,
}

impl<F> Clone for FrameSender<F> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<F> FrameSender<F> {
    /// Offers a frame to the worker, replacing any frame still waiting.
    ///
    /// Fails only once the receiving side has been closed.
    pub fn send(&self, frame: F) -> Result<(), AppError> {
        let mut slot = self.shared.slot();
        if self.is_closed() {
            return Err(AppError::Detached);
        }
        let replaced = slot.replace(frame);
        drop(slot);

        self.shared.metrics.record_submitted();
        if replaced.is_some() {
            self.shared.metrics.record_replaced();
            tracing::trace!("Replaced a frame the worker had not picked up yet");
        }
        drop(replaced);

        self.shared.notify.notify_one();
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Stops accepting frames and discards the waiting one, if any.
    pub fn close(&self) {
        self.shared.close();
    }
}

/// Worker half.
pub struct FrameReceiver<F> {
    shared: Arc<Shared<F>>,
}

impl<F> FrameReceiver<F> {
    /// Waits for the next frame. `None` once the slot is closed.
    pub async fn recv(&mut self) -> Option<F> {
        loop {
            if self.shared.closed.load(Ordering::Acquire) {
                return None;
            }
            if let Some(frame) = self.shared.slot().take() {
                return Some(frame);
            }
            self.shared.notify.notified().await;
        }
    }

    pub fn close(&self) {
        self.shared.close();
    }
}

impl<F> Drop for FrameReceiver<F> {
    fn drop(&mut self) {
        self.shared.close();
    }
}
