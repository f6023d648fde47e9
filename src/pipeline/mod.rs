pub mod domain;
pub mod metrics;
pub mod pipeline;
pub mod services;
pub mod types;

pub use domain::{LabelLanguage, Palette, PaletteEntry};
pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use pipeline::{sample_center, ClassificationPipeline, Classifier, FrameOutcome};
pub use services::{ClassificationService, ResultPublishingService, ResultReader};
pub use types::{ClassificationReport, ClassificationResult, PerceptualColor, RgbSample};
