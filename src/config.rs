use crate::error::AppError;
use crate::pipeline::LabelLanguage;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub log_level: String,
    pub label_language: LabelLanguage,
    pub frame_source: FrameSourceSettings,
}

/// Settings for the bundled frame source used by the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrameSourceSettings {
    pub width: u32,
    pub height: u32,
    pub frame_interval_ms: u64,
    pub frame_count: u64,
    pub image_path: Option<PathBuf>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            label_language: LabelLanguage::English,
            frame_source: FrameSourceSettings::default(),
        }
    }
}

impl Default for FrameSourceSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            frame_interval_ms: 33,
            frame_count: 90,
            image_path: None,
        }
    }
}

impl Configuration {
    /// Defaults, then the optional file, then `COLOR_PROBE__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("COLOR_PROBE").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn max_log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
