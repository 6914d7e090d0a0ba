use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use palette::Srgb;

/// Used for species missing from the color table.
pub const DEFAULT_SPECIES_COLOR: Color32 = Color32::from_rgb(255, 105, 180); // hotpink
pub const MEASURED_COLOR: Color32 = Color32::BLACK;
pub const CALCULATED_COLOR: Color32 = Color32::from_rgb(127, 255, 0); // chartreuse
pub const RESIDUAL_COLOR: Color32 = Color32::BLACK;
pub const ZERO_LINE_COLOR: Color32 = Color32::RED;

/// Bundled table covering the standard TCCON species.
const BUNDLED_COLORS: &str = include_str!("../data/colors.json");

// ---------------------------------------------------------------------------
// Color parsing
// ---------------------------------------------------------------------------

/// Parse a CSS/SVG color name (`"darkorange"`) or a `#rrggbb` hex code.
pub fn parse_color(value: &str) -> Option<Color32> {
    let value = value.trim();
    let rgb: Srgb<u8> = if value.starts_with('#') {
        value.parse().ok()?
    } else {
        palette::named::from_str(&value.to_ascii_lowercase())?
    };
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// `#rrggbb` form, for SVG/HTML output.
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

// ---------------------------------------------------------------------------
// Color table: species name → Color32
// ---------------------------------------------------------------------------

/// Fixed species colors. Species that are never retrieved in the same window
/// may share a color.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    mapping: BTreeMap<String, Color32>,
}

impl ColorTable {
    /// The table shipped with the viewer.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_COLORS).context("parsing bundled colors.json")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a JSON object of `"species": "color"` pairs. Entries whose color
    /// cannot be parsed are skipped with a warning.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> = serde_json::from_str(text)?;
        let mapping = raw
            .into_iter()
            .filter_map(|(species, value)| match parse_color(&value) {
                Some(color) => Some((species, color)),
                None => {
                    log::warn!("Ignoring unknown color '{value}' for species '{species}'");
                    None
                }
            })
            .collect();
        Ok(ColorTable { mapping })
    }

    pub fn get(&self, species: &str) -> Option<Color32> {
        self.mapping.get(species).copied()
    }

    /// Color for `species`, falling back to [`DEFAULT_SPECIES_COLOR`].
    pub fn color_for(&self, species: &str) -> Color32 {
        self.get(species).unwrap_or_else(|| {
            log::warn!(
                "'{species}' is not in the color table, using hotpink; \
                 add it to colors.json to give it a specific color"
            );
            DEFAULT_SPECIES_COLOR
        })
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
