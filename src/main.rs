use color_probe::config::Configuration;
use color_probe::coordinator::{Coordinator, CoordinatorBuilder};
use color_probe::error::AppError;
use color_probe::intake::{FrameSource, SourceRunner, StillImageSource, SyntheticSource};
use color_probe::pipeline::Palette;
use color_probe::Frame;
use std::path::PathBuf;
use std::time::Duration;
use tokio_stream::StreamExt;

fn init_logging(configuration: &Configuration) {
    tracing_subscriber::fmt()
        .with_max_level(configuration.max_log_level())
        .init();
}

fn open_source(configuration: &Configuration) -> Result<Box<dyn FrameSource>, AppError> {
    let settings = &configuration.frame_source;
    match &settings.image_path {
        Some(path) => Ok(Box::new(StillImageSource::open(path)?)),
        None => {
            let palette = Palette::standard(configuration.label_language);
            Ok(Box::new(SyntheticSource::new(
                settings.width,
                settings.height,
                &palette,
            )))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let configuration = Configuration::load(config_path.as_deref())?;
    init_logging(&configuration);

    let coordinator: Coordinator<Frame> =
        CoordinatorBuilder::new(configuration.clone()).build()?;
    let mut results = coordinator.results().into_stream();

    let printer = tokio::spawn(async move {
        while let Some(latest) = results.next().await {
            let Some(result) = latest else {
                continue;
            };
            match serde_json::to_string(&result.report()) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!("Failed to serialize result: {}", e),
            }
        }
    });

    let mut runner = SourceRunner::start(
        open_source(&configuration)?,
        coordinator.frame_sender(),
        &configuration.frame_source,
    );

    let mut poll = tokio::time::interval(Duration::from_millis(50));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, detaching");
                break;
            }
            _ = poll.tick() => {
                if runner.is_finished() {
                    break;
                }
            }
        }
    }

    let sent = runner.stop()?;
    let metrics = coordinator.shutdown().await?;
    if let Err(e) = printer.await {
        tracing::error!("Result printer failed: {}", e);
    }

    tracing::info!(
        "Frames sent: {}, classified: {}, replaced: {}, dropped: {}, skipped: {}",
        sent,
        metrics.frames_classified,
        metrics.frames_replaced,
        metrics.frames_dropped,
        metrics.frames_skipped
    );
    Ok(())
}
