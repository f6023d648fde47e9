use crate::error::SampleError;
use image::Rgb;

/// A device RGB color with every channel normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbSample {
    r: f64,
    g: f64,
    b: f64,
}

impl RgbSample {
    /// Builds a sample from normalized channels, rejecting NaN, infinities and
    /// anything outside `[0, 1]`.
    pub fn new(r: f64, g: f64, b: f64) -> Result<Self, SampleError> {
        for (channel, value) in [('r', r), ('g', g), ('b', b)] {
            if !value.is_finite() {
                return Err(SampleError::NotFinite { channel, value });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(SampleError::OutOfRange { channel, value });
            }
        }
        Ok(Self { r, g, b })
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }

    /// Builds a sample from a 24-bit `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Result<Self, SampleError> {
        if hex > 0x00FF_FFFF {
            return Err(SampleError::HexOutOfRange(hex));
        }
        let [_, r, g, b] = hex.to_be_bytes();
        Ok(Self::from_rgb8(r, g, b))
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels scaled back to 8 bits, rounded to the nearest integer.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| (c * 255.0).round() as u8)
    }
}

impl From<Rgb<u8>> for RgbSample {
    fn from(px: Rgb<u8>) -> Self {
        Self::from_rgb8(px[0], px[1], px[2])
    }
}

impl From<[u8; 3]> for RgbSample {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::from_rgb8(r, g, b)
    }
}
