use anyhow::{ensure, Context, Result};
use std::io::Read;

use crate::palette;

/// Largest board side the terminal renderer lays out.
pub const MAX_SIZE: usize = 16;

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Board side length, fixed for the whole session.
    #[serde(default = "defaults::size")]
    pub size: usize,

    /// Seed for tile spawns. If None, the game is seeded from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub swipe: Swipe,

    #[serde(default)]
    pub render: Render,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Swipe {
    /// Minimum drag distance in pixels on the dominant axis.
    #[serde(default = "defaults::threshold_px")]
    pub threshold_px: f64,
    /// Terminal cell size used to convert mouse positions to pixels.
    #[serde(default = "defaults::cell_width_px")]
    pub cell_width_px: f64,
    #[serde(default = "defaults::cell_height_px")]
    pub cell_height_px: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Render {
    /// Print tile values inside the blocks. Off by default: pure color blocks.
    #[serde(default)]
    pub show_values: bool,
    /// Draw cells that just changed in bold.
    #[serde(default = "defaults::highlight_changes")]
    pub highlight_changes: bool,
    /// Override for the tile palette, as "#RRGGBB" strings starting at tile 2.
    #[serde(default)]
    pub palette: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: defaults::size(),
            seed: None,
            swipe: Swipe::default(),
            render: Render::default(),
        }
    }
}

impl Default for Swipe {
    fn default() -> Self {
        Self {
            threshold_px: defaults::threshold_px(),
            cell_width_px: defaults::cell_width_px(),
            cell_height_px: defaults::cell_height_px(),
        }
    }
}

impl Default for Render {
    fn default() -> Self {
        Self {
            show_values: false,
            highlight_changes: defaults::highlight_changes(),
            palette: None,
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg = Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (2..=MAX_SIZE).contains(&self.size),
            "size must be between 2 and {MAX_SIZE}, got {}",
            self.size
        );
        let s = &self.swipe;
        ensure!(
            s.threshold_px.is_finite() && s.threshold_px > 0.0,
            "swipe.threshold_px must be positive"
        );
        ensure!(
            s.cell_width_px.is_finite() && s.cell_width_px > 0.0,
            "swipe.cell_width_px must be positive"
        );
        ensure!(
            s.cell_height_px.is_finite() && s.cell_height_px > 0.0,
            "swipe.cell_height_px must be positive"
        );
        if let Some(colors) = &self.render.palette {
            ensure!(!colors.is_empty(), "render.palette must not be empty");
            for c in colors {
                palette::Rgb::from_hex(c)?;
            }
        }
        Ok(())
    }

    /// Palette to render with: the override if present, else the built-in one.
    pub fn palette(&self) -> Result<palette::Palette> {
        match &self.render.palette {
            Some(colors) => palette::Palette::from_hex(colors),
            None => Ok(palette::Palette::default()),
        }
    }
}

mod defaults {
    pub fn size() -> usize { twenty48_board::engine::DEFAULT_SIZE }
    pub fn threshold_px() -> f64 { twenty48_board::input::DEFAULT_SWIPE_THRESHOLD }
    pub fn cell_width_px() -> f64 { 8.0 }
    pub fn cell_height_px() -> f64 { 16.0 }
    pub fn highlight_changes() -> bool { true }
}
