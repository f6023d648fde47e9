mod classification_result;
mod perceptual_color;
mod rgb_sample;
mod sampled_pixel;

pub use classification_result::{ClassificationReport, ClassificationResult};
pub use perceptual_color::PerceptualColor;
pub use rgb_sample::RgbSample;
pub use sampled_pixel::SampledPixel;
