use crate::pipeline::types::RgbSample;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The outcome of classifying one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    label: String,
    sampled_rgb: RgbSample,
    distance: f64,
    frame_id: Option<Uuid>,
    classified_at: DateTime<Utc>,
}

impl ClassificationResult {
    pub fn new(label: impl Into<String>, sampled_rgb: RgbSample, distance: f64) -> Self {
        Self {
            label: label.into(),
            sampled_rgb,
            distance,
            frame_id: None,
            classified_at: Utc::now(),
        }
    }

    pub fn with_frame_id(mut self, frame_id: Uuid) -> Self {
        self.frame_id = Some(frame_id);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sampled_rgb(&self) -> RgbSample {
        self.sampled_rgb
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.sampled_rgb.to_rgb8()
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn frame_id(&self) -> Option<Uuid> {
        self.frame_id
    }

    pub fn classified_at(&self) -> DateTime<Utc> {
        self.classified_at
    }

    pub fn report(&self) -> ClassificationReport {
        ClassificationReport {
            label: self.label.clone(),
            rgb: self.rgb(),
            distance: self.distance,
        }
    }
}

/// Overlay caption shown next to the swatch.
impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb();
        write!(f, "Color: {}\nRGB: ({r}, {g}, {b})", self.label)
    }
}

/// The external shape of a result, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub label: String,
    pub rgb: [u8; 3],
    pub distance: f64,
}
