//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TideError};

/// Interned color label: an index into the active [`Palette`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColorLabel(pub u16);

impl ColorLabel {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Simulation time unit
pub type Tick = u64;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` literal
    pub fn from_hex(literal: &str) -> Option<Self> {
        let digits = literal.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// A named palette entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub name: String,
    pub rgb: Rgb,
}

/// Ordered, non-empty set of colors a cell may take.
///
/// Labels are positions in this list, so equality and census keys stay
/// plain integer comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<PaletteColor>,
}

impl Palette {
    /// Build a palette from color names (keywords or `#rrggbb`)
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(TideError::domain("palette must contain at least one color"));
        }
        if names.len() > u16::MAX as usize {
            return Err(TideError::domain(format!(
                "palette holds {} colors, at most {} are supported",
                names.len(),
                u16::MAX
            )));
        }

        let mut colors: Vec<PaletteColor> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim().to_ascii_lowercase();
            let rgb = crate::render::colors::resolve(&name)
                .ok_or_else(|| TideError::config(format!("unknown palette color '{}'", name)))?;
            if colors.iter().any(|existing| existing.name == name) {
                return Err(TideError::config(format!("duplicate palette color '{}'", name)));
            }
            colors.push(PaletteColor { name, rgb });
        }

        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All labels in palette order
    pub fn labels(&self) -> Vec<ColorLabel> {
        (0..self.colors.len()).map(|i| ColorLabel(i as u16)).collect()
    }

    pub fn get(&self, label: ColorLabel) -> Option<&PaletteColor> {
        self.colors.get(label.index())
    }

    pub fn name(&self, label: ColorLabel) -> Option<&str> {
        self.get(label).map(|c| c.name.as_str())
    }

    pub fn rgb(&self, label: ColorLabel) -> Option<Rgb> {
        self.get(label).map(|c| c.rgb)
    }

    pub fn label_of(&self, name: &str) -> Option<ColorLabel> {
        let name = name.trim().to_ascii_lowercase();
        self.colors
            .iter()
            .position(|c| c.name == name)
            .map(|i| ColorLabel(i as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("ff8000"), None);
        assert_eq!(Rgb::from_hex("#ff80"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_palette_labels_follow_order() {
        let palette = Palette::from_names(&["green", "blue", "#102030"]).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.label_of("blue"), Some(ColorLabel(1)));
        assert_eq!(palette.rgb(ColorLabel(2)), Some(Rgb::new(0x10, 0x20, 0x30)));
        assert_eq!(palette.name(ColorLabel(0)), Some("green"));
        assert!(palette.get(ColorLabel(3)).is_none());
    }

    #[test]
    fn test_palette_rejects_bad_input() {
        let empty: [&str; 0] = [];
        assert!(matches!(Palette::from_names(&empty), Err(TideError::Domain(_))));
        assert!(matches!(Palette::from_names(&["chartreuse-ish"]), Err(TideError::Config(_))));
        assert!(matches!(Palette::from_names(&["red", "Red"]), Err(TideError::Config(_))));
    }
}
