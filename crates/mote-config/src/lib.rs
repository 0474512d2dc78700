//! Configuration for the mote particle clock.
//!
//! Settings are read once at startup from `config.toml` in the platform
//! config directory. Edits made from the debug panel only touch the
//! in-memory [`ClockConfig`] and are never written back.

mod params;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use mote_core::{Rgb, TimeFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use params::{Bounds, FALL_DISTANCE, HUE_STEP_DEGREES, PARTICLE_SIZE, Param};

/// Name of the config file inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Accepted frame rates.
const FRAME_RATE_RANGE: std::ops::RangeInclusive<u32> = 1..=120;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Camera projection used by the stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// How particles are rasterized into terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// 2x4 braille dots per cell.
    #[default]
    Braille,
    /// One glyph per cell.
    Cells,
}

/// Complete clock configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Stage clear color.
    pub background: Rgb,
    /// Particle color at the top of a glyph.
    pub primary: Rgb,
    /// Particle color at the bottom of a glyph.
    pub secondary: Rgb,
    /// Particle size in world units.
    pub particle_size: f32,
    /// How far particles drop while a digit falls apart.
    pub fall_distance: f32,
    pub time_format: TimeFormat,
    pub projection: Projection,
    /// Add ambient light to the scene (brightens every particle).
    pub ambient_light: bool,
    pub render_mode: RenderMode,
    /// Directory with `0.txt`..`9.txt` and `colon.txt` glyph bitmaps.
    pub glyph_dir: Option<PathBuf>,
    /// Target frames per second.
    pub frame_rate: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            background: Rgb::new(8, 8, 16),
            primary: Rgb::new(94, 200, 255),
            secondary: Rgb::new(255, 94, 176),
            particle_size: 0.02,
            fall_distance: 1.5,
            time_format: TimeFormat::default(),
            projection: Projection::default(),
            ambient_light: true,
            render_mode: RenderMode::default(),
            glyph_dir: None,
            frame_rate: 30,
        }
    }
}

impl ClockConfig {
    /// Platform-specific project directories, if a home directory exists.
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "mote")
    }

    /// Default location of the config file.
    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults when there
    /// is no config directory or no file.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse TOML text and clamp every bounded value.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let mut config: ClockConfig = toml::from_str(text)?;
        config.sanitize();
        Ok(config)
    }

    /// Clamp bounded values into range, logging anything that moved.
    pub fn sanitize(&mut self) {
        let size = PARTICLE_SIZE.clamp(self.particle_size);
        if size != self.particle_size {
            tracing::warn!(value = self.particle_size, clamped = size, "particle_size out of range");
            self.particle_size = size;
        }

        let fall = FALL_DISTANCE.clamp(self.fall_distance);
        if fall != self.fall_distance {
            tracing::warn!(value = self.fall_distance, clamped = fall, "fall_distance out of range");
            self.fall_distance = fall;
        }

        let rate = self
            .frame_rate
            .clamp(*FRAME_RATE_RANGE.start(), *FRAME_RATE_RANGE.end());
        if rate != self.frame_rate {
            tracing::warn!(value = self.frame_rate, clamped = rate, "frame_rate out of range");
            self.frame_rate = rate;
        }
    }

    /// Nudge `param` by `steps` increments (negative steps go down).
    ///
    /// Numbers move along their step grid and stay within bounds; colors
    /// rotate their hue.
    pub fn adjust(&mut self, param: Param, steps: i32) {
        let hue = steps as f32 * HUE_STEP_DEGREES;
        match param {
            Param::Background => self.background = self.background.rotate_hue(hue),
            Param::Primary => self.primary = self.primary.rotate_hue(hue),
            Param::Secondary => self.secondary = self.secondary.rotate_hue(hue),
            Param::ParticleSize => {
                self.particle_size = PARTICLE_SIZE.step_by(self.particle_size, steps)
            }
            Param::FallDistance => {
                self.fall_distance = FALL_DISTANCE.step_by(self.fall_distance, steps)
            }
        }
    }

    /// Current value of `param`, formatted for display.
    pub fn display_value(&self, param: Param) -> String {
        match param {
            Param::Background => self.background.to_string(),
            Param::Primary => self.primary.to_string(),
            Param::Secondary => self.secondary.to_string(),
            Param::ParticleSize => format!("{:.3}", self.particle_size),
            Param::FallDistance => format!("{:.1}", self.fall_distance),
        }
    }
}
