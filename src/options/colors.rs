use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Palette handed to the viewer, as `#rrggbb` strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Colors", inline)]
#[serde(default)]
pub struct ColorOptions {
    /// Color of unhighlighted chains.
    #[schemars(title = "Default")]
    pub default: String,
    /// Color of secondary elements (ligands, hover previews).
    #[schemars(title = "Lighter")]
    pub lighter: String,
    /// Color of locked selections.
    #[schemars(title = "Highlight")]
    pub highlight: String,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            default: "#454b52".to_owned(),
            lighter: "#d1e2e6".to_owned(),
            highlight: "#52b1e9".to_owned(),
        }
    }
}

impl ColorOptions {
    /// Parse a `#rrggbb` string into linear `[0, 1]` RGB. Returns `None`
    /// for anything else.
    #[must_use]
    pub fn parse_hex(color: &str) -> Option<[f32; 3]> {
        let hex = color.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .ok()
                .map(|v| f32::from(v) / 255.0)
        };
        Some([channel(0)?, channel(2)?, channel(4)?])
    }

    /// Highlight color as RGB, falling back to white.
    #[must_use]
    pub fn highlight_rgb(&self) -> [f32; 3] {
        Self::parse_hex(&self.highlight).unwrap_or([1.0, 1.0, 1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(ColorOptions::parse_hex("#ff0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(ColorOptions::parse_hex("ff0000"), None);
        assert_eq!(ColorOptions::parse_hex("#ff00"), None);
        assert_eq!(ColorOptions::parse_hex("#gg0000"), None);
        let rgb = ColorOptions::default().highlight_rgb();
        assert!((rgb[0] - 0x52 as f32 / 255.0).abs() < 1e-6);
    }
}
