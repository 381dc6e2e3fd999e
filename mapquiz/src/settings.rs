//! User-tunable settings, loaded from an optional JSON file.

use quizdata::ColorKey;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error reading settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Colors used to paint revealed regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintColors {
    /// Region found on the first try.
    pub perfect: ColorKey,
    /// Region found after one or more misses.
    pub with_errors: ColorKey,
    /// Region force-revealed after too many misses.
    pub incorrect: ColorKey,
    /// Region explored in learn mode.
    pub learn: ColorKey,
}

impl Default for PaintColors {
    fn default() -> Self {
        Self {
            perfect: ColorKey(0xe9e9e9ff),
            with_errors: ColorKey(0xe9c46aff),
            incorrect: ColorKey(0xe63946ff),
            learn: ColorKey(0x8ecae6ff),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display scale of the map bitmap at zoom 1.0.
    pub image_scale: f64,
    /// Seconds a "Wrong!" or warning message stays on screen.
    pub hud_lifetime: f32,
    /// Consecutive misses after which the target is revealed and skipped.
    pub miss_threshold: u8,
    pub colors: PaintColors,
    pub background: ColorKey,
    pub window_size: (u32, u32),
    /// TTF/OTF font for HUD text. Relative paths resolve against the
    /// working directory.
    pub font: PathBuf,
    /// Pixel size of the prompt and counter lines.
    pub font_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_scale: 0.5,
            hud_lifetime: crate::hud::STANDARD_LIFETIME,
            miss_threshold: 3,
            colors: PaintColors::default(),
            background: ColorKey(0x181818ff),
            window_size: (16 * 80, 9 * 80),
            font: PathBuf::from("resources/Alegreya-Regular.ttf"),
            font_size: 40.0,
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.image_scale.is_finite() && self.image_scale > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "image_scale must be positive, got {}",
                self.image_scale
            )));
        }
        if !(self.hud_lifetime.is_finite() && self.hud_lifetime > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "hud_lifetime must be positive, got {}",
                self.hud_lifetime
            )));
        }
        if self.miss_threshold == 0 {
            return Err(SettingsError::Invalid(
                "miss_threshold must be at least 1".to_string(),
            ));
        }
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Err(SettingsError::Invalid(format!(
                "window_size must be non-zero, got {:?}",
                self.window_size
            )));
        }
        Ok(())
    }
}
