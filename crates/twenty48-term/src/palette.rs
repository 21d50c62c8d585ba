//! Tile colors. Values within the palette get a fixed color; anything
//! larger walks a pastel hue wheel.

use anyhow::{bail, Context, Result};
use twenty48_board::engine::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse "#RRGGBB".
    pub fn from_hex(s: &str) -> Result<Self> {
        let Some(hex) = s.strip_prefix('#') else {
            bail!("color {s:?} must start with '#'");
        };
        if hex.len() != 6 || !hex.is_ascii() {
            bail!("color {s:?} must be #RRGGBB");
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("color {s:?} has a bad hex digit"))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Color of an empty cell.
pub const EMPTY: Rgb = Rgb(0xED, 0xE4, 0xD4);

const DEFAULT_PALETTE: [Rgb; 11] = [
    Rgb(0xFF, 0xC9, 0x6C), //    2
    Rgb(0xFF, 0xA4, 0x47), //    4
    Rgb(0xFF, 0x7A, 0x59), //    8
    Rgb(0xFF, 0x3B, 0x30), //   16
    Rgb(0xFF, 0x5D, 0xA2), //   32
    Rgb(0xD9, 0x6C, 0xFF), //   64
    Rgb(0x8F, 0x7C, 0xFF), //  128
    Rgb(0x4A, 0xC8, 0xED), //  256
    Rgb(0x00, 0xDF, 0xA2), //  512
    Rgb(0xA2, 0xE0, 0x4F), // 1024
    Rgb(0xF9, 0xE8, 0x4C), // 2048
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            colors: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl Palette {
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        let colors = colors
            .iter()
            .map(|c| Rgb::from_hex(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Palette { colors })
    }

    /// Color for a cell value; 0 is the empty color.
    pub fn color(&self, value: Tile) -> Rgb {
        if value == 0 {
            return EMPTY;
        }
        let idx = value.trailing_zeros().saturating_sub(1) as usize;
        match self.colors.get(idx) {
            Some(&c) => c,
            None => hsl_to_rgb(((idx * 42) % 360) as f64, 0.70, 0.85),
        }
    }
}

/// `h` in degrees, `s` and `l` in [0, 1].
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h % 360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(to_u8(r), to_u8(g), to_u8(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(Rgb::from_hex("#FFC96C").unwrap(), Rgb(0xFF, 0xC9, 0x6C));
        assert_eq!(Rgb::from_hex("#00dfa2").unwrap(), Rgb(0x00, 0xDF, 0xA2));
        assert!(Rgb::from_hex("FFC96C").is_err());
        assert!(Rgb::from_hex("#FFC96").is_err());
        assert!(Rgb::from_hex("#GGC96C").is_err());
        assert!(Rgb::from_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn default_palette_by_value() {
        let p = Palette::default();
        assert_eq!(p.color(0), EMPTY);
        assert_eq!(p.color(2), Rgb(0xFF, 0xC9, 0x6C));
        assert_eq!(p.color(16), Rgb(0xFF, 0x3B, 0x30));
        assert_eq!(p.color(2048), Rgb(0xF9, 0xE8, 0x4C));
    }

    #[test]
    fn past_the_palette_uses_hue_wheel() {
        let p = Palette::default();
        // 4096 -> index 11 -> hue 102
        assert_eq!(p.color(4096), hsl_to_rgb(102.0, 0.70, 0.85));
        assert_ne!(p.color(4096), p.color(8192));

        let short = Palette::from_hex(&["#000000"]).unwrap();
        assert_eq!(short.color(2), Rgb(0, 0, 0));
        assert_eq!(short.color(4), hsl_to_rgb(42.0, 0.70, 0.85));
    }

    #[test]
    fn hsl_conversion() {
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), Rgb(255, 255, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.0), Rgb(0, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Rgb(0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.7, 0.85), Rgb(244, 190, 190));
    }
}
