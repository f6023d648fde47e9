use crate::error::PaletteError;
use crate::pipeline::domain::converter::convert;
use crate::pipeline::types::{PerceptualColor, RgbSample};
use indexmap::IndexMap;
use serde::Deserialize;
use std::borrow::Cow;

/// Language used for palette labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLanguage {
    #[default]
    English,
    Spanish,
}

impl LabelLanguage {
    pub fn unknown_label(self) -> &'static str {
        match self {
            LabelLanguage::English => "Unknown",
            LabelLanguage::Spanish => "Desconocido",
        }
    }
}

/// `(english, spanish, 0xRRGGBB)` in matching order. Order decides ties.
const STANDARD_COLORS: [(&str, &str, u32); 25] = [
    ("Black", "Negro", 0x000000),
    ("Gray", "Gris", 0x808080),
    ("White", "Blanco", 0xFFFFFF),
    ("Red", "Rojo", 0xFF0000),
    ("Dark Red", "Rojo oscuro", 0x8B0000),
    ("Light Red", "Rojo claro", 0xF08080),
    ("Green", "Verde", 0x008000),
    ("Dark Green", "Verde oscuro", 0x006400),
    ("Blue", "Azul", 0x0000FF),
    ("Yellow", "Amarillo", 0xFFFF00),
    ("Orange", "Naranja", 0xFFA500),
    ("Brown", "Marrón", 0xA52A2A),
    ("Pink", "Rosa", 0xFFC0CB),
    ("Purple", "Morado", 0x800080),
    ("Turquoise", "Turquesa", 0x40E0D0),
    ("Violet", "Violeta", 0xEE82EE),
    ("Olive", "Oliva", 0x808000),
    ("Salmon", "Salmón", 0xFA8072),
    ("Gold", "Dorado", 0xFFD700),
    ("Cyan", "Cian", 0x00FFFF),
    ("Magenta", "Magenta", 0xFF00FF),
    ("Lime", "Lima", 0x00FF00),
    ("Tan", "Marrón claro", 0xD2B48C),
    ("Navy", "Azul marino", 0x000080),
    ("Teal", "Verde azulado", 0x008080),
];

/// A named reference color with its L*a*b* value cached.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    name: Cow<'static, str>,
    reference_rgb: RgbSample,
    reference_lab: PerceptualColor,
}

impl PaletteEntry {
    pub fn new(name: impl Into<Cow<'static, str>>, reference_rgb: RgbSample) -> Self {
        Self {
            name: name.into(),
            reference_rgb,
            reference_lab: convert(reference_rgb),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference_rgb(&self) -> RgbSample {
        self.reference_rgb
    }

    pub fn reference_lab(&self) -> &PerceptualColor {
        &self.reference_lab
    }
}

/// An ordered, immutable set of named reference colors.
///
/// Iteration order is construction order and is what the matcher scans.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: IndexMap<Cow<'static, str>, PaletteEntry>,
    unknown: PaletteEntry,
}

impl Palette {
    /// The compiled-in 25 color table, labelled in `language`.
    pub fn standard(language: LabelLanguage) -> Self {
        let entries = STANDARD_COLORS
            .iter()
            .map(|&(english, spanish, hex)| {
                let name = match language {
                    LabelLanguage::English => english,
                    LabelLanguage::Spanish => spanish,
                };
                let [_, r, g, b] = hex.to_be_bytes();
                let entry = PaletteEntry::new(name, RgbSample::from_rgb8(r, g, b));
                (entry.name.clone(), entry)
            })
            .collect();

        Self {
            entries,
            unknown: PaletteEntry::new(language.unknown_label(), RgbSample::from_rgb8(0, 0, 0)),
        }
    }

    /// Builds a palette from `(name, 0xRRGGBB)` pairs, keeping their order.
    pub fn from_hex_table<N>(
        table: impl IntoIterator<Item = (N, u32)>,
        language: LabelLanguage,
    ) -> Result<Self, PaletteError>
    where
        N: Into<Cow<'static, str>>,
    {
        let mut entries = IndexMap::new();
        for (name, hex) in table {
            let name = name.into();
            let rgb = RgbSample::from_hex(hex).map_err(|source| PaletteError::InvalidColor {
                name: name.to_string(),
                source,
            })?;
            if entries.contains_key(&name) {
                return Err(PaletteError::DuplicateName(name.into_owned()));
            }
            entries.insert(name.clone(), PaletteEntry::new(name, rgb));
        }

        Ok(Self {
            entries,
            unknown: PaletteEntry::new(language.unknown_label(), RgbSample::from_rgb8(0, 0, 0)),
        })
    }

    pub fn empty(language: LabelLanguage) -> Self {
        Self {
            entries: IndexMap::new(),
            unknown: PaletteEntry::new(language.unknown_label(), RgbSample::from_rgb8(0, 0, 0)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PaletteEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.values()
    }

    /// Sentinel returned by the matcher when there is nothing to match.
    pub fn unknown(&self) -> &PaletteEntry {
        &self.unknown
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard(LabelLanguage::default())
    }
}
