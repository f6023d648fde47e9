use crate::{
    common::{Frame, FrameBuffer},
    config::Configuration,
    error::AppError,
    intake::frame_slot::{frame_slot, FrameReceiver, FrameSender},
    pipeline::{
        ClassificationPipeline, ClassificationService, Classifier, FrameOutcome, MetricsSnapshot,
        Palette, PipelineMetrics, ResultPublishingService, ResultReader,
    },
};
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};
use tokio::{runtime::Handle, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tower::util::BoxService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Processing,
    Detached,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Idle,
            1 => WorkerState::Processing,
            _ => WorkerState::Detached,
        }
    }
}

/// Owns the classification worker and the producer-side handoff.
///
/// Frames submitted through [`Coordinator::submit`] or a [`FrameSender`] are
/// classified one at a time on a dedicated task; results land in the slot
/// read through [`Coordinator::results`].
pub struct Coordinator<F = Frame> {
    frame_tx: FrameSender<F>,
    reader: ResultReader,
    metrics: Arc<PipelineMetrics>,
    state: Arc<AtomicU8>,
    cancel_token: CancellationToken,
    worker_task: Option<JoinHandle<()>>,
}

impl<F> Coordinator<F>
where
    F: FrameBuffer + Send + 'static,
{
    fn new(runtime: Handle, classifier: Classifier) -> Self {
        let metrics = Arc::new(PipelineMetrics::new());
        let (publisher, reader) = ResultPublishingService::new();
        let (frame_tx, frame_rx) = frame_slot(metrics.clone());
        let pipeline =
            ClassificationPipeline::with_classifier(classifier, publisher, metrics.clone());
        let state = Arc::new(AtomicU8::new(WorkerState::Idle as u8));
        let cancel_token = CancellationToken::new();

        let worker_task = Self::start_worker_task(
            &runtime,
            pipeline,
            frame_rx,
            state.clone(),
            cancel_token.clone(),
        );

        Self {
            frame_tx,
            reader,
            metrics,
            state,
            cancel_token,
            worker_task: Some(worker_task),
        }
    }

    fn start_worker_task(
        runtime: &Handle,
        mut pipeline: ClassificationPipeline,
        mut frame_rx: FrameReceiver<F>,
        state: Arc<AtomicU8>,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        runtime.spawn(async move {
            tracing::info!("Classification worker started");
            loop {
                let frame = tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => None,
                    frame = frame_rx.recv() => frame,
                };
                let Some(frame) = frame else {
                    break;
                };

                state.store(WorkerState::Processing as u8, Ordering::Release);
                match pipeline.handle_frame(frame).await {
                    FrameOutcome::Published(result) => {
                        tracing::debug!(
                            "Published {} (distance {:.3})",
                            result.label(),
                            result.distance()
                        );
                    }
                    FrameOutcome::Skipped => tracing::debug!("Frame skipped"),
                }
                state.store(WorkerState::Idle as u8, Ordering::Release);
            }
            frame_rx.close();
            state.store(WorkerState::Detached as u8, Ordering::Release);
            tracing::info!("Classification worker stopped");
        })
    }

    /// Hands a frame to the worker without waiting for it to be classified.
    ///
    /// A frame still waiting from an earlier call is replaced. After
    /// [`Coordinator::detach`] frames are refused with [`AppError::Detached`].
    pub fn submit(&self, frame: F) -> Result<(), AppError> {
        self.frame_tx.send(frame)
    }

    /// A producer handle that can be moved to another thread.
    pub fn frame_sender(&self) -> FrameSender<F> {
        self.frame_tx.clone()
    }
}

impl<F> Coordinator<F> {
    pub fn results(&self) -> ResultReader {
        self.reader.clone()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Stops accepting frames. A frame already being classified still
    /// completes and is published.
    pub fn detach(&self) {
        self.frame_tx.close();
        self.cancel_token.cancel();
    }

    /// Detaches, waits for the worker task to finish and returns the final counters.
    pub async fn shutdown(mut self) -> Result<MetricsSnapshot, AppError> {
        self.detach();
        if let Some(worker_task) = self.worker_task.take() {
            worker_task
                .await
                .map_err(|e| AppError::Pipeline(format!("Worker task failed: {e}")))?;
        }
        Ok(self.metrics.snapshot())
    }
}

impl<F> Drop for Coordinator<F> {
    fn drop(&mut self) {
        self.detach();
    }
}

pub struct CoordinatorBuilder {
    configuration: Configuration,
    palette: Option<Arc<Palette>>,
    classifier: Option<Classifier>,
}

impl CoordinatorBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            palette: None,
            classifier: None,
        }
    }

    // Uses a custom palette instead of the standard table.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(Arc::new(palette));
        self
    }

    // Sets the label language for the standard table, this will override the default configuration.
    pub fn label_language(mut self, language: crate::pipeline::LabelLanguage) -> Self {
        self.configuration.label_language = language;
        self
    }

    // Replaces the palette lookup entirely, the palette and language settings are then ignored.
    pub fn classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Spawns the worker on the current tokio runtime.
    ///
    /// Fails with [`AppError::Runtime`] when called outside one.
    pub fn build<F>(self) -> Result<Coordinator<F>, AppError>
    where
        F: FrameBuffer + Send + 'static,
    {
        let runtime = Handle::try_current()?;
        let classifier = match self.classifier {
            Some(classifier) => classifier,
            None => {
                let palette = self.palette.unwrap_or_else(|| {
                    Arc::new(Palette::standard(self.configuration.label_language))
                });
                BoxService::new(ClassificationService::new(palette))
            }
        };
        Ok(Coordinator::new(runtime, classifier))
    }
}
