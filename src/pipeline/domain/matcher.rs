use crate::pipeline::domain::palette::{Palette, PaletteEntry};
use crate::pipeline::types::PerceptualColor;

/// The palette entry closest to a query color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteMatch<'p> {
    pub entry: &'p PaletteEntry,
    pub distance: f64,
}

impl PaletteMatch<'_> {
    pub fn is_unknown(&self) -> bool {
        self.distance.is_infinite()
    }
}

/// Linear scan for the entry with the smallest Euclidean L*a*b* distance.
///
/// The first entry in palette order wins a tie. An empty palette yields the
/// palette's unknown sentinel at infinite distance.
pub fn nearest<'p>(target: &PerceptualColor, palette: &'p Palette) -> PaletteMatch<'p> {
    let mut best = PaletteMatch {
        entry: palette.unknown(),
        distance: f64::INFINITY,
    };

    for entry in palette.iter() {
        let distance = target.distance(entry.reference_lab());
        if distance < best.distance {
            best = PaletteMatch { entry, distance };
        }
    }

    best
}
