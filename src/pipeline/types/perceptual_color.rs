/// A CIE L\*a\*b\* color (D65 white point).
///
/// Only the converter builds these; components are kept exactly as computed,
/// without clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptualColor {
    l: f64,
    a: f64,
    b: f64,
}

impl PerceptualColor {
    pub(crate) fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn l(&self) -> f64 {
        self.l
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    /// Plain Euclidean distance in L\*a\*b\* (CIE76).
    pub fn distance(&self, other: &PerceptualColor) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}
