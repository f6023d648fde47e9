pub mod converter;
pub mod matcher;
pub mod palette;

pub use converter::convert;
pub use matcher::{nearest, PaletteMatch};
pub use palette::{LabelLanguage, Palette, PaletteEntry};
