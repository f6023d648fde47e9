pub mod common;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod intake;
pub mod pipeline;

pub use common::{Frame, FrameBuffer};
pub use config::Configuration;
pub use coordinator::{Coordinator, CoordinatorBuilder, WorkerState};
pub use error::{AppError, PaletteError, SampleError};
pub use pipeline::{
    ClassificationPipeline, ClassificationReport, ClassificationResult, LabelLanguage, Palette,
    PaletteEntry, PerceptualColor, ResultReader, RgbSample,
};
