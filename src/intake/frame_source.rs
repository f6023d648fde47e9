use crate::common::Frame;
use crate::config::FrameSourceSettings;
use crate::error::AppError;
use crate::intake::frame_slot::FrameSender;
use crate::pipeline::Palette;
use chrono::Utc;
use image::{DynamicImage, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Something that produces camera frames on demand.
pub trait FrameSource: Send {
    /// The next frame, or `None` when the source is exhausted.
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Solid frames cycling through a palette's colors with a little noise.
pub struct SyntheticSource {
    id: Uuid,
    width: u32,
    height: u32,
    colors: Vec<[u8; 3]>,
    next: usize,
    jitter: u8,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, palette: &Palette) -> Self {
        Self {
            id: Uuid::new_v4(),
            width,
            height,
            colors: palette.iter().map(|e| e.reference_rgb().to_rgb8()).collect(),
            next: 0,
            jitter: 6,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_jitter(mut self, jitter: u8) -> Self {
        self.jitter = jitter;
        self
    }

    fn jittered(&mut self, rgb: [u8; 3]) -> [u8; 3] {
        let jitter = i16::from(self.jitter);
        rgb.map(|c| {
            let offset = self.rng.random_range(-jitter..=jitter);
            (i16::from(c) + offset).clamp(0, 255) as u8
        })
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.colors.is_empty() {
            return None;
        }
        let base = self.colors[self.next % self.colors.len()];
        self.next += 1;

        let rgb = self.jittered(base);
        let image = RgbImage::from_pixel(self.width, self.height, Rgb(rgb));
        Some(Frame::new(self.id, DynamicImage::ImageRgb8(image), Utc::now()))
    }
}

/// Replays one decoded image file as every frame.
pub struct StillImageSource {
    id: Uuid,
    image: DynamicImage,
}

impl StillImageSource {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, AppError> {
        let image = image::open(path)?;
        Ok(Self::from_image(image))
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
        }
    }
}

impl FrameSource for StillImageSource {
    fn next_frame(&mut self) -> Option<Frame> {
        Some(Frame::new(self.id, self.image.clone(), Utc::now()))
    }
}

/// Drives a [`FrameSource`] on its own thread, pushing frames into the worker's slot.
pub struct SourceRunner {
    cancel_token: CancellationToken,
    source_thread: Option<std::thread::JoinHandle<u64>>,
}

impl SourceRunner {
    pub fn start(
        mut source: Box<dyn FrameSource>,
        frame_tx: FrameSender<Frame>,
        settings: &FrameSourceSettings,
    ) -> Self {
        let cancel_token = CancellationToken::new();
        let thread_token = cancel_token.clone();
        let interval = Duration::from_millis(settings.frame_interval_ms);
        let frame_count = settings.frame_count;

        let source_thread = std::thread::spawn(move || {
            let mut sent = 0u64;
            while sent < frame_count && !thread_token.is_cancelled() {
                let Some(frame) = source.next_frame() else {
                    tracing::info!("Frame source exhausted after {} frames", sent);
                    break;
                };
                if frame_tx.send(frame).is_err() {
                    tracing::info!("Pipeline detached, stopping frame source");
                    break;
                }
                sent += 1;
                std::thread::sleep(interval);
            }
            sent
        });

        Self {
            cancel_token,
            source_thread: Some(source_thread),
        }
    }

    /// Stops the thread and returns how many frames it handed off.
    pub fn stop(&mut self) -> Result<u64, AppError> {
        self.cancel_token.cancel();
        match self.source_thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| AppError::Pipeline("Frame source thread panicked".to_string())),
            None => Ok(0),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.source_thread
            .as_ref()
            .map_or(true, |thread| thread.is_finished())
    }
}

impl Drop for SourceRunner {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::FrameBuffer;
    use crate::intake::frame_slot::frame_slot;
    use crate::pipeline::{LabelLanguage, PipelineMetrics};
    use std::sync::Arc;

    #[test]
    fn synthetic_source_cycles_palette_within_jitter() {
        let palette = Palette::default();
        let mut source = SyntheticSource::new(4, 4, &palette).with_seed(7);
        for entry in palette.iter() {
            let frame = source.next_frame().unwrap();
            let px = frame.pixel(2, 2).unwrap();
            let expected = entry.reference_rgb().to_rgb8();
            for channel in 0..3 {
                assert!((i16::from(px[channel]) - i16::from(expected[channel])).abs() <= 6);
            }
        }
    }

    #[test]
    fn synthetic_source_without_jitter_is_exact() {
        let palette =
            Palette::from_hex_table([("Only", 0x102030)], LabelLanguage::English).unwrap();
        let mut source = SyntheticSource::new(1, 1, &palette).with_jitter(0);
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.pixel(0, 0), Some(Rgb([0x10, 0x20, 0x30])));
    }

    #[test]
    fn empty_palette_source_is_exhausted() {
        let mut source = SyntheticSource::new(2, 2, &Palette::empty(LabelLanguage::English));
        assert!(source.next_frame().is_none());
    }

    #[tokio::test]
    async fn runner_stops_after_frame_count() {
        let (frame_tx, mut frame_rx) = frame_slot(Arc::new(PipelineMetrics::new()));
        let settings = FrameSourceSettings {
            width: 2,
            height: 2,
            frame_interval_ms: 1,
            frame_count: 3,
            image_path: None,
        };
        let still = StillImageSource::from_image(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            2,
            2,
            Rgb([5, 5, 5]),
        )));
        let mut runner = SourceRunner::start(Box::new(still), frame_tx, &settings);

        let frame = frame_rx.recv().await.unwrap();
        assert_eq!(frame.pixel(1, 1), Some(Rgb([5, 5, 5])));

        while !runner.is_finished() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(runner.stop().unwrap(), 3);
    }

    #[tokio::test]
    async fn runner_stops_when_pipeline_detaches() {
        let (frame_tx, frame_rx) = frame_slot(Arc::new(PipelineMetrics::new()));
        drop(frame_rx);
        let settings = FrameSourceSettings {
            frame_interval_ms: 1,
            frame_count: 100,
            ..FrameSourceSettings::default()
        };
        let source = SyntheticSource::new(2, 2, &Palette::default());
        let mut runner = SourceRunner::start(Box::new(source), frame_tx, &settings);
        assert_eq!(runner.stop().unwrap(), 0);
    }
}
