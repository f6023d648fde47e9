use crate::pipeline::types::RgbSample;
use uuid::Uuid;

/// The one pixel copied out of a frame, detached from its buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPixel {
    pub rgb: RgbSample,
    pub frame_id: Option<Uuid>,
}

impl From<RgbSample> for SampledPixel {
    fn from(rgb: RgbSample) -> Self {
        Self { rgb, frame_id: None }
    }
}
