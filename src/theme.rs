//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Block and UI colours, loadable from a theme file. The default block
/// palette follows the Atari/arcade scheme the original game used, with
/// One Dark hues.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Block colours indexed by `BlockType::color_index()`:
    /// I red, J yellow, L magenta, O blue, S cyan, Z orange, T green.
    pub blocks: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (level, lines).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

/// Theme keys for the seven block colours, in `color_index()` order.
const BLOCK_KEYS: [&str; 7] = [
    "block_i", "block_j", "block_l", "block_o", "block_s", "block_z", "block_t",
];

/// Fallback hex per block colour, in the same order.
const BLOCK_DEFAULTS: [&str; 7] = [
    "#E06C75", // I red
    "#E5C07B", // J yellow
    "#C678DD", // L magenta
    "#61AFEF", // O blue
    "#56B6C2", // S cyan
    "#D19A66", // Z orange
    "#98C379", // T green
];

impl Theme {
    /// Hardcoded One Dark defaults.
    pub fn onedark_default() -> Self {
        let mut blocks = [Color::Reset; 7];
        for (slot, hex) in blocks.iter_mut().zip(BLOCK_DEFAULTS) {
            *slot = parse_hex(hex).unwrap();
        }
        Self {
            blocks,
            bg: parse_hex("#282C34").unwrap(),
            div_line: parse_hex("#3F444F").unwrap(),
            main_fg: parse_hex("#ABB2BF").unwrap(),
            title: parse_hex("#E5C07B").unwrap(),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or
    /// `theme[key]='value'`. Falls back to the defaults when the path is
    /// None or the file is missing; individual missing keys keep their
    /// default colour.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default()),
        };
        let s = std::fs::read_to_string(path)?;
        Ok(Self::from_map(&parse_theme_file(&s)))
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let mut theme = Self::onedark_default();
        for (slot, key) in theme.blocks.iter_mut().zip(BLOCK_KEYS) {
            if let Some(color) = get(key) {
                *slot = color;
            }
        }
        if let Some(c) = get("bg") {
            theme.bg = c;
        }
        if let Some(c) = get("div_line") {
            theme.div_line = c;
        }
        if let Some(c) = get("main_fg") {
            theme.main_fg = c;
        }
        if let Some(c) = get("title") {
            theme.title = c;
        }
        theme
    }

    /// Block colour for a `BlockType::color_index()`.
    #[inline]
    pub fn block_color(&self, index: u8) -> Color {
        self.blocks[(index as usize) % self.blocks.len()]
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let (r, g, b) = if s.len() == 6 {
        let r =
            u8::from_str_radix(&s[0..2], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let g =
            u8::from_str_radix(&s[2..4], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        let b =
            u8::from_str_radix(&s[4..6], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        (r, g, b)
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let g = u8::from_str_radix(&s[1..2], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        let b = u8::from_str_radix(&s[2..3], 16)
            .map_err(|_| ThemeError::InvalidHex(s.to_string()))?
            * 17;
        (r, g, b)
    } else {
        return Err(ThemeError::InvalidHex(s.to_string()));
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[block_i]="#FF0000""##);
        assert_eq!(map.get("block_i"), Some(&"#FF0000".to_string()));
    }

    #[test]
    fn test_from_map_overrides_single_block() {
        let mut map = HashMap::new();
        map.insert("block_i".to_string(), "#FF0000".to_string());
        let theme = Theme::from_map(&map);
        assert!(matches!(theme.block_color(0), Color::Rgb(255, 0, 0)));
        // Other slots keep their defaults.
        assert!(matches!(theme.block_color(1), Color::Rgb(0xE5, 0xC0, 0x7B)));
    }
}
