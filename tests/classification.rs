use color_probe::pipeline::{
    ClassificationPipeline, FrameOutcome, PipelineMetrics, ResultPublishingService,
};
use color_probe::{
    Configuration, Coordinator, CoordinatorBuilder, LabelLanguage, Palette, RgbSample,
};
use image::{Rgb, RgbImage};
use std::sync::Arc;
use std::time::Duration;

fn solid(rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(16, 9, Rgb(rgb))
}

#[tokio::test]
async fn reference_colors_classify_by_name() {
    let (publisher, reader) = ResultPublishingService::new();
    let mut pipeline = ClassificationPipeline::new(
        Arc::new(Palette::default()),
        publisher,
        Arc::new(PipelineMetrics::new()),
    );

    for (rgb, label) in [
        ([255, 0, 0], "Red"),
        ([0, 0, 0], "Black"),
        ([255, 255, 255], "White"),
        ([128, 128, 128], "Gray"),
    ] {
        let outcome = pipeline.handle_frame(solid(rgb)).await;
        let FrameOutcome::Published(result) = outcome else {
            panic!("frame {rgb:?} was skipped");
        };
        assert_eq!(result.label(), label);
        assert_eq!(reader.latest().unwrap().rgb(), rgb);
    }
}

#[tokio::test]
async fn every_palette_entry_classifies_as_itself() {
    let palette = Palette::default();
    let (publisher, _reader) = ResultPublishingService::new();
    let mut pipeline = ClassificationPipeline::new(
        Arc::new(palette.clone()),
        publisher,
        Arc::new(PipelineMetrics::new()),
    );

    for entry in palette.iter() {
        let rgb = entry.reference_rgb().to_rgb8();
        let FrameOutcome::Published(result) = pipeline.handle_frame(solid(rgb)).await else {
            panic!("{} was skipped", entry.name());
        };
        assert_eq!(result.label(), entry.name());
        assert!(result.distance() < 1e-9);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn readers_only_see_whole_results() {
    let coordinator: Coordinator<RgbImage> =
        CoordinatorBuilder::new(Configuration::default())
            .build()
            .unwrap();
    let reader = coordinator.results();

    let watcher = tokio::spawn(async move {
        let mut reader = reader;
        let mut seen = 0usize;
        while let Some(result) = reader.changed().await {
            // Label and sample always come from the same frame.
            let expected = match result.label() {
                "Blue" => [0, 0, 255],
                "Lime" => [0, 255, 0],
                other => panic!("unexpected label {other}"),
            };
            assert_eq!(result.rgb(), expected);
            seen += 1;
        }
        seen
    });

    let sender = coordinator.frame_sender();
    let producer = std::thread::spawn(move || {
        for i in 0..200 {
            let rgb = if i % 2 == 0 { [0, 0, 255] } else { [0, 255, 0] };
            sender.send(solid(rgb)).unwrap();
            std::thread::sleep(Duration::from_micros(200));
        }
        // Final frame is Blue.
        sender.send(solid([0, 0, 255])).unwrap();
    });
    producer.join().unwrap();

    let last = coordinator.results();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let metrics = coordinator.metrics();
            if metrics.frames_classified + metrics.frames_replaced == 201 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("frames were not drained in time");

    assert_eq!(last.latest().unwrap().label(), "Blue");
    let metrics = coordinator.shutdown().await.unwrap();
    assert_eq!(metrics.frames_submitted, 201);
    assert!(watcher.await.unwrap() >= 1);
}

#[tokio::test]
async fn spanish_labels_and_overlay_caption() {
    let coordinator: Coordinator<RgbImage> = CoordinatorBuilder::new(Configuration::default())
        .label_language(LabelLanguage::Spanish)
        .build()
        .unwrap();
    let mut reader = coordinator.results();

    coordinator.submit(solid([0, 128, 128])).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), reader.changed())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.label(), "Verde azulado");
    assert_eq!(result.to_string(), "Color: Verde azulado\nRGB: (0, 128, 128)");
    coordinator.shutdown().await.unwrap();
}

#[test]
fn samples_reject_invalid_channels() {
    assert!(RgbSample::new(0.2, 0.4, 0.6).is_ok());
    assert!(RgbSample::new(0.2, f64::INFINITY, 0.6).is_err());
}
