use crate::common::FrameBuffer;
use crate::error::AppError;
use crate::pipeline::domain::Palette;
use crate::pipeline::metrics::PipelineMetrics;
use crate::pipeline::services::{ClassificationService, ResultPublishingService};
use crate::pipeline::types::{ClassificationResult, RgbSample, SampledPixel};
use std::sync::Arc;
use std::time::Instant;
use tower::util::BoxService;
use tower::{Service, ServiceBuilder, ServiceExt};

/// What happened to a frame handed to the pipeline.
#[derive(Debug, Clone)]
pub enum FrameOutcome {
    Published(Arc<ClassificationResult>),
    Skipped,
}

/// Copies the pixel at `(width / 2, height / 2)` out of the frame.
///
/// `None` for zero-sized or otherwise unreadable frames.
pub fn sample_center<F: FrameBuffer + ?Sized>(frame: &F) -> Option<SampledPixel> {
    let (x, y) = (frame.width() / 2, frame.height() / 2);
    let px = frame.pixel(x, y)?;
    Some(SampledPixel {
        rgb: RgbSample::from(px),
        frame_id: frame.frame_id(),
    })
}

/// Boxed pixel classifier, the first stage of the pipeline.
pub type Classifier = BoxService<SampledPixel, ClassificationResult, AppError>;

/// Samples, classifies and publishes one frame at a time.
pub struct ClassificationPipeline {
    service: BoxService<SampledPixel, Arc<ClassificationResult>, AppError>,
    metrics: Arc<PipelineMetrics>,
}

impl ClassificationPipeline {
    pub fn new(
        palette: Arc<Palette>,
        publisher: ResultPublishingService,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        let classifier = BoxService::new(ClassificationService::new(palette));
        Self::with_classifier(classifier, publisher, metrics)
    }

    /// Publishes whatever `classifier` produces instead of the palette lookup.
    pub fn with_classifier(
        classifier: Classifier,
        publisher: ResultPublishingService,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        let service = ServiceBuilder::new()
            .service(classifier)
            .and_then(move |result: ClassificationResult| {
                let mut publisher = publisher.clone();
                async move { publisher.call(result).await }
            })
            .boxed();

        Self::from_service(service, metrics)
    }

    pub fn from_service(
        service: BoxService<SampledPixel, Arc<ClassificationResult>, AppError>,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self { service, metrics }
    }

    /// Handles one frame to completion.
    ///
    /// The frame is dropped as soon as its center pixel is copied, before any
    /// color math runs. Failures are logged and reported as `Skipped`; they
    /// never reach the caller as errors.
    pub async fn handle_frame<F: FrameBuffer>(&mut self, frame: F) -> FrameOutcome {
        let started = Instant::now();
        let sampled = sample_center(&frame);
        let (width, height) = (frame.width(), frame.height());
        drop(frame);

        let Some(pixel) = sampled else {
            tracing::warn!(
                "Skipping {}x{} frame: center pixel is out of bounds",
                width,
                height
            );
            self.metrics.record_skipped();
            return FrameOutcome::Skipped;
        };

        match self.classify(pixel).await {
            Ok(published) => {
                self.metrics.record_classified(started.elapsed());
                FrameOutcome::Published(published)
            }
            Err(e) => {
                tracing::error!("Failed to classify frame: {}", e);
                self.metrics.record_skipped();
                FrameOutcome::Skipped
            }
        }
    }

    async fn classify(
        &mut self,
        pixel: SampledPixel,
    ) -> Result<Arc<ClassificationResult>, AppError> {
        self.service.ready().await?.call(pixel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::services::ResultReader;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn pipeline() -> (ClassificationPipeline, ResultReader, Arc<PipelineMetrics>) {
        let (publisher, reader) = ResultPublishingService::new();
        let metrics = Arc::new(PipelineMetrics::new());
        let pipeline =
            ClassificationPipeline::new(Arc::new(Palette::default()), publisher, metrics.clone());
        (pipeline, reader, metrics)
    }

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(rgb))
    }

    struct TrackedFrame {
        image: RgbImage,
        released: Arc<AtomicBool>,
    }

    impl FrameBuffer for TrackedFrame {
        fn width(&self) -> u32 {
            self.image.width()
        }

        fn height(&self) -> u32 {
            self.image.height()
        }

        fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
            FrameBuffer::pixel(&self.image, x, y)
        }
    }

    impl Drop for TrackedFrame {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn samples_the_geometric_center_with_floor() {
        let mut img = solid(5, 3, [0, 0, 0]);
        img.put_pixel(2, 1, Rgb([200, 100, 50]));
        let pixel = sample_center(&img).unwrap();
        assert_eq!(pixel.rgb.to_rgb8(), [200, 100, 50]);

        let mut even = solid(4, 4, [0, 0, 0]);
        even.put_pixel(2, 2, Rgb([1, 2, 3]));
        assert_eq!(sample_center(&even).unwrap().rgb.to_rgb8(), [1, 2, 3]);
    }

    #[test]
    fn zero_sized_frames_have_no_sample() {
        assert!(sample_center(&RgbImage::new(0, 0)).is_none());
        assert!(sample_center(&RgbImage::new(8, 0)).is_none());
    }

    #[tokio::test]
    async fn publishes_named_color_for_each_frame() {
        let (mut pipeline, reader, metrics) = pipeline();

        let outcome = pipeline.handle_frame(solid(3, 3, [255, 0, 0])).await;
        assert!(matches!(outcome, FrameOutcome::Published(ref r) if r.label() == "Red"));
        assert_eq!(reader.latest().unwrap().label(), "Red");
        assert_eq!(metrics.snapshot().frames_classified, 1);
    }

    #[tokio::test]
    async fn malformed_frame_keeps_previous_result() {
        let (mut pipeline, reader, metrics) = pipeline();
        pipeline.handle_frame(solid(2, 2, [0, 0, 0])).await;

        let outcome = pipeline.handle_frame(RgbImage::new(0, 0)).await;
        assert!(matches!(outcome, FrameOutcome::Skipped));
        assert_eq!(reader.latest().unwrap().label(), "Black");
        assert_eq!(metrics.snapshot().frames_skipped, 1);
    }

    #[tokio::test]
    async fn sequential_frames_leave_the_last_result() {
        let (mut pipeline, reader, _) = pipeline();
        let frames = [[255, 255, 255], [0, 0, 128], [0, 128, 128], [128, 128, 128]];
        for rgb in frames {
            pipeline.handle_frame(solid(7, 5, rgb)).await;
        }
        let latest = reader.latest().unwrap();
        assert_eq!(latest.label(), "Gray");
        assert_eq!(latest.rgb(), [128, 128, 128]);
    }

    #[tokio::test]
    async fn frame_is_released_before_classification() {
        let released = Arc::new(AtomicBool::new(false));
        let seen_released = released.clone();
        let service = tower::service_fn(move |pixel: SampledPixel| {
            let was_released = seen_released.load(Ordering::SeqCst);
            async move {
                assert!(was_released, "frame still held when classification began");
                Ok::<_, AppError>(Arc::new(ClassificationResult::new("Probe", pixel.rgb, 0.0)))
            }
        });
        let mut pipeline = ClassificationPipeline::from_service(
            BoxService::new(service),
            Arc::new(PipelineMetrics::new()),
        );

        let frame = TrackedFrame {
            image: solid(2, 2, [9, 9, 9]),
            released: released.clone(),
        };
        let outcome = pipeline.handle_frame(frame).await;
        assert!(matches!(outcome, FrameOutcome::Published(_)));
    }

    #[tokio::test]
    async fn service_errors_are_contained() {
        let service = tower::service_fn(|_pixel: SampledPixel| async {
            Err::<Arc<ClassificationResult>, _>(AppError::Pipeline("boom".to_string()))
        });
        let metrics = Arc::new(PipelineMetrics::new());
        let mut pipeline =
            ClassificationPipeline::from_service(BoxService::new(service), metrics.clone());

        let outcome = pipeline.handle_frame(solid(1, 1, [1, 1, 1])).await;
        assert!(matches!(outcome, FrameOutcome::Skipped));
        assert_eq!(metrics.snapshot().frames_skipped, 1);
    }
}
