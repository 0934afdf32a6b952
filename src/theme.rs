//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::shuffle::PALETTE_LEN;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Block palette and UI colours loaded from a theme file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Block colours (index 0..=6): blue, green, purple, yellow, red, pink, indigo.
    pub blocks: [Color; PALETTE_LEN],
    /// Screen background.
    pub main_bg: Color,
    /// Loading overlay panel.
    pub overlay_bg: Color,
    /// "Loading..." caption.
    pub main_fg: Color,
    /// Secondary caption and key hints.
    pub inactive_fg: Color,
    pub track_on: Color,
    pub track_off: Color,
    pub thumb_on: Color,
    pub thumb_off: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("theme file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

const DEFAULT_BLOCKS: [Color; PALETTE_LEN] = [
    Color::from_u32(0x003B_82F6), // blue
    Color::from_u32(0x0010_B981), // green
    Color::from_u32(0x008B_5CF6), // purple
    Color::from_u32(0x00F5_9E0B), // yellow
    Color::from_u32(0x00EF_4444), // red
    Color::from_u32(0x00EC_4899), // pink
    Color::from_u32(0x0063_66F1), // indigo
];

const HIGH_CONTRAST_BLOCKS: [Color; PALETTE_LEN] = [
    Color::from_u32(0x0000_88FF), // blue
    Color::from_u32(0x0000_FF00), // green
    Color::from_u32(0x00AA_00FF), // purple
    Color::from_u32(0x00FF_FF00), // yellow
    Color::from_u32(0x00FF_0000), // red
    Color::from_u32(0x00FF_00FF), // magenta
    Color::from_u32(0x0000_FFFF), // cyan
];

/// Tol's vibrant scheme with yellow in place of grey.
const COLORBLIND_BLOCKS: [Color; PALETTE_LEN] = [
    Color::from_u32(0x0000_77BB), // blue
    Color::from_u32(0x00EE_7733), // orange
    Color::from_u32(0x0000_9988), // teal
    Color::from_u32(0x00BB_BB00), // yellow
    Color::from_u32(0x00CC_3311), // red
    Color::from_u32(0x00EE_3377), // magenta
    Color::from_u32(0x0033_BBEE), // cyan
];

impl Default for Theme {
    fn default() -> Self {
        Self {
            blocks: DEFAULT_BLOCKS,
            main_bg: Color::from_u32(0x00F9_FAFB),
            overlay_bg: Color::from_u32(0x00AD_D8E6), // lightblue
            main_fg: Color::from_u32(0x0037_4151),
            inactive_fg: Color::from_u32(0x006B_7280),
            track_on: Color::from_u32(0x0081_B0FF),
            track_off: Color::from_u32(0x0076_7577),
            thumb_on: Color::from_u32(0x00F5_DD4B),
            thumb_off: Color::from_u32(0x00F4_F3F4),
        }
    }
}

impl Theme {
    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Defaults are used if path is None; a path that does not exist is an error so
    /// the caller can report it. Keys that are missing or unparsable keep their default.
    /// `palette` selects colour variant: Normal (theme), HighContrast, or Colorblind.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            None => return Ok(Self::default_for_palette(palette)),
            Some(p) if !p.exists() => return Err(ThemeError::NotFound(p.to_path_buf())),
            Some(p) => p,
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Default theme for a palette when no file is loaded.
    pub fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::default();
        t.apply_palette(palette);
        t
    }

    /// Override block colours for high-contrast or colorblind.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => self.blocks = HIGH_CONTRAST_BLOCKS,
            crate::Palette::Colorblind => self.blocks = COLORBLIND_BLOCKS,
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let d = Self::default();
        let blocks = std::array::from_fn(|i| {
            get(&format!("block{}", i + 1)).unwrap_or(d.blocks[i])
        });
        Self {
            blocks,
            main_bg: get("main_bg").unwrap_or(d.main_bg),
            overlay_bg: get("overlay_bg").unwrap_or(d.overlay_bg),
            main_fg: get("main_fg").unwrap_or(d.main_fg),
            inactive_fg: get("inactive_fg").unwrap_or(d.inactive_fg),
            track_on: get("track_on").unwrap_or(d.track_on),
            track_off: get("track_off").unwrap_or(d.track_off),
            thumb_on: get("thumb_on").unwrap_or(d.thumb_on),
            thumb_off: get("thumb_off").unwrap_or(d.thumb_off),
        }
    }

    /// Colour for a fractional palette index: linear RGB blend of the two neighbouring
    /// entries, clamped to the palette's ends.
    pub fn block_color(&self, index: f32) -> Color {
        let max = (PALETTE_LEN - 1) as f32;
        let index = if index.is_nan() { 0.0 } else { index.clamp(0.0, max) };
        let lo = index.floor() as usize;
        let hi = (lo + 1).min(PALETTE_LEN - 1);
        blend(self.blocks[lo], self.blocks[hi], index - lo as f32)
    }
}

/// Blend two colours in RGB space; `t` = 0 gives `a`.
pub fn blend(a: Color, b: Color, t: f32) -> Color {
    let (ar, ag, ab) = rgb(a);
    let (br, bg, bb) = rgb(b);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(mix(ar, br), mix(ag, bg), mix(ab, bb))
}

/// RGB components; named colours map to their usual xterm values.
fn rgb(c: Color) -> (u8, u8, u8) {
    match c {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black => (0, 0, 0),
        Color::Red => (205, 0, 0),
        Color::Green => (0, 205, 0),
        Color::Yellow => (205, 205, 0),
        Color::Blue => (0, 0, 238),
        Color::Magenta => (205, 0, 205),
        Color::Cyan => (0, 205, 205),
        Color::Gray => (229, 229, 229),
        Color::DarkGray => (127, 127, 127),
        Color::White => (255, 255, 255),
        _ => (128, 128, 128),
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
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&s[range], 16);
    let (r, g, b) = match s.len() {
        6 => (
            channel(0..2).map_err(|_| invalid())?,
            channel(2..4).map_err(|_| invalid())?,
            channel(4..6).map_err(|_| invalid())?,
        ),
        3 => (
            channel(0..1).map_err(|_| invalid())? * 17,
            channel(1..2).map_err(|_| invalid())? * 17,
            channel(2..3).map_err(|_| invalid())? * 17,
        ),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Palette;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#3B82F6").unwrap();
        assert!(matches!(c, Color::Rgb(0x3B, 0x82, 0xF6)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
        assert!(parse_hex("#ééé").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[overlay_bg]="#ADD8E6""##);
        assert_eq!(map.get("overlay_bg"), Some(&"#ADD8E6".to_string()));
    }

    #[test]
    fn test_default_palette_matches_hex() {
        let t = Theme::default();
        assert_eq!(t.blocks[0], parse_hex("#3B82F6").unwrap());
        assert_eq!(t.blocks[6], parse_hex("#6366F1").unwrap());
        assert_eq!(t.overlay_bg, Color::Rgb(0xAD, 0xD8, 0xE6));
    }

    #[test]
    fn test_from_map_overrides_and_falls_back() {
        let map = parse_theme_file(
            "# comment\ntheme[block3]='#000000'\ntheme[main_fg]=\"nope\"\ntheme[track_on]=\"#FFF\"\n",
        );
        let t = Theme::from_map(&map);
        let d = Theme::default();
        assert_eq!(t.blocks[2], Color::Rgb(0, 0, 0));
        assert_eq!(t.blocks[0], d.blocks[0]);
        assert_eq!(t.main_fg, d.main_fg);
        assert_eq!(t.track_on, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_load_missing_file_is_reported() {
        let missing = Path::new("/nonexistent/shuffletui.theme");
        let err = Theme::load(Some(missing), Palette::HighContrast).unwrap_err();
        assert!(matches!(&err, ThemeError::NotFound(p) if p == missing));
        assert!(err.to_string().contains("/nonexistent/shuffletui.theme"));
        // what main falls back to
        assert_eq!(
            Theme::default_for_palette(Palette::HighContrast).blocks,
            HIGH_CONTRAST_BLOCKS
        );
    }

    #[test]
    fn test_load_without_path_uses_palette_default() {
        assert_eq!(Theme::load(None, Palette::Normal).unwrap(), Theme::default());
        assert_eq!(
            Theme::load(None, Palette::HighContrast).unwrap().blocks,
            HIGH_CONTRAST_BLOCKS
        );
    }

    #[test]
    fn test_block_color_interpolates_between_neighbours() {
        let t = Theme::default();
        assert_eq!(t.block_color(0.0), t.blocks[0]);
        assert_eq!(t.block_color(4.0), t.blocks[4]);
        assert_eq!(t.block_color(6.0), t.blocks[6]);
        assert_eq!(t.block_color(9.0), t.blocks[6]);
        assert_eq!(t.block_color(-1.0), t.blocks[0]);
        // halfway between blue (3B82F6) and green (10B981)
        assert_eq!(t.block_color(0.5), Color::Rgb(0x26, 0x9E, 0xBC));
    }
}
