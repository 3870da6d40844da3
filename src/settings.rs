//! World configuration and terrain contour presets
//!
//! Consumed once at world init. Defaults describe a 964x632 window of 32-unit tiles.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::SoundId;

/// Terrain contour preset controlling the vertical bias of the surface walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Contour {
    #[default]
    Plains,
    Hills,
    Mountains,
}

impl Contour {
    pub const ALL: [Contour; 3] = [Contour::Plains, Contour::Hills, Contour::Mountains];

    pub fn as_str(&self) -> &'static str {
        match self {
            Contour::Plains => "Plains",
            Contour::Hills => "Hills",
            Contour::Mountains => "Mountains",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "plains" => Some(Contour::Plains),
            "hills" => Some(Contour::Hills),
            "mountains" => Some(Contour::Mountains),
            _ => None,
        }
    }

    /// Parse a contour name, falling back to `Plains` for anything unknown
    pub fn from_name(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("Unknown contour {s:?}, using {}", Contour::default().as_str());
            Contour::default()
        })
    }

    /// Cumulative (down, up) thresholds in tenths, compared against a roll in 0..=10
    pub fn chances(&self) -> (u32, u32) {
        match self {
            Contour::Plains => (2, 4),
            Contour::Hills => (3, 6),
            Contour::Mountains => (4, 8),
        }
    }

    /// Next preset in menu order (wraps)
    pub fn next(&self) -> Self {
        match self {
            Contour::Plains => Contour::Hills,
            Contour::Hills => Contour::Mountains,
            Contour::Mountains => Contour::Plains,
        }
    }

    /// Previous preset in menu order (wraps)
    pub fn prev(&self) -> Self {
        match self {
            Contour::Plains => Contour::Mountains,
            Contour::Hills => Contour::Plains,
            Contour::Mountains => Contour::Hills,
        }
    }

    /// Background track played while running over this terrain
    pub fn music(&self) -> SoundId {
        match self {
            Contour::Plains => SoundId::PlainsMusic,
            Contour::Hills => SoundId::HillsMusic,
            Contour::Mountains => SoundId::MountainMusic,
        }
    }
}

impl From<String> for Contour {
    fn from(name: String) -> Self {
        Contour::from_name(&name)
    }
}

/// World settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub width: f32,
    pub height: f32,
    /// Edge length of one terrain tile
    pub tile_size: f32,

    // === Terrain ===
    pub rows: usize,
    /// Columns generated at world init
    pub cols: usize,
    /// The surface walk never climbs above this row
    pub highest_row: usize,
    /// The surface walk never descends below this row
    pub lowest_row: usize,
    pub contour: Contour,
    /// Live terrain tiles below which a new column is generated each frame
    pub max_terrain_tiles: usize,
    /// Every time the column count hits a multiple of this, an enemy spawns
    pub enemy_spawn_interval: usize,

    // === Camera ===
    /// Horizontal shift applied by one rumble
    pub rumble_power: f32,
    /// Fraction of the width past which the camera scrolls
    pub scroll_trigger: f32,

    // === Menu ===
    pub menu_scroll_speed: f32,
    pub splash_frames: u32,

    /// RNG seed for terrain, bounces and debris
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let rows = 20;
        Self {
            width: 964.0,
            height: 632.0,
            tile_size: 32.0,

            rows,
            cols: 30,
            highest_row: 10,
            lowest_row: rows - 2,
            contour: Contour::Plains,
            max_terrain_tiles: 400,
            enemy_spawn_interval: 20,

            rumble_power: 20.0,
            scroll_trigger: 2.0 / 3.0,

            menu_scroll_speed: 3.0,
            splash_frames: 25,

            seed: 0x6e65_775f_6d6f_6f6e,
        }
    }
}

impl Settings {
    /// Default settings with a different contour
    pub fn with_contour(contour: Contour) -> Self {
        Self {
            contour,
            ..Self::default()
        }
    }

    /// X coordinate the player's leading edge may not pass while unlocked
    pub fn scroll_point(&self) -> f32 {
        self.width * self.scroll_trigger
    }

    /// Row the surface walk starts from
    pub fn start_row(&self) -> usize {
        (self.lowest_row + self.highest_row) / 2
    }

    /// Check that the settings describe a usable world
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("tile_size", self.tile_size),
            ("cols", self.cols as f32),
            ("enemy_spawn_interval", self.enemy_spawn_interval as f32),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::InvalidDimension { field, value });
            }
        }

        if !(self.highest_row < self.lowest_row && self.lowest_row < self.rows) {
            return Err(ConfigError::RowBounds {
                highest: self.highest_row,
                lowest: self.lowest_row,
                rows: self.rows,
            });
        }

        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
