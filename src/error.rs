use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Image Error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Sample Error: {0}")]
    Sample(#[from] SampleError),
    #[error("Palette Error: {0}")]
    Palette(#[from] PaletteError),
    #[error("Pipeline Error: {0}")]
    Pipeline(String),
    #[error("Runtime Error: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
    #[error("The pipeline is detached and no longer accepts frames.")]
    Detached,
}

#[derive(Error, Debug, PartialEq)]
pub enum SampleError {
    #[error("Channel {channel} is not finite: {value}")]
    NotFinite { channel: char, value: f64 },
    #[error("Channel {channel} is outside [0, 1]: {value}")]
    OutOfRange { channel: char, value: f64 },
    #[error("Hex color {0:#x} does not fit in 24 bits")]
    HexOutOfRange(u32),
}

#[derive(Error, Debug, PartialEq)]
pub enum PaletteError {
    #[error("Duplicate palette entry name: {0}")]
    DuplicateName(String),
    #[error("Invalid reference color for {name}: {source}")]
    InvalidColor { name: String, source: SampleError },
}
