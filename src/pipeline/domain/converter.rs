//! sRGB to CIE L*a*b* conversion (D65, 2° observer).

use crate::pipeline::types::{PerceptualColor, RgbSample};

/// Linear RGB (scaled to 0..100) to XYZ, rows produce X, Y and Z.
const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// D65 reference white.
const WHITE_POINT: [f64; 3] = [95.047, 100.0, 108.883];

const EPSILON: f64 = 0.008856;
const KAPPA_SLOPE: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

/// Converts a device RGB sample to L*a*b*.
///
/// Output is never clamped. Pure black comes out with `L` numerically close
/// to, not exactly, zero.
pub fn convert(rgb: RgbSample) -> PerceptualColor {
    let linear = rgb.channels().map(|c| srgb_to_linear(c) * 100.0);

    let [x, y, z] = SRGB_TO_XYZ.map(|row| {
        row[0] * linear[0] + row[1] * linear[1] + row[2] * linear[2]
    });

    let fx = lab_f(x / WHITE_POINT[0]);
    let fy = lab_f(y / WHITE_POINT[1]);
    let fz = lab_f(z / WHITE_POINT[2]);

    PerceptualColor::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(v: f64) -> f64 {
    if v > EPSILON {
        v.cbrt()
    } else {
        KAPPA_SLOPE * v + LAB_OFFSET
    }
}
