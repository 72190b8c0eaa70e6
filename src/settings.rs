//! User settings persisted between runs as JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::Difficulty;
use crate::error::SettingsError;

/// Window size for graphical front ends. The terminal UI ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

/// The persisted settings record. Only `difficulty` feeds the game engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Bot tier, 0 (easy) to 3 (extreme).
    pub difficulty: u8,
    pub dimension: Dimension,
    pub language: String,
    pub last_ip: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            difficulty: Difficulty::Easy.tier(),
            dimension: Dimension {
                width: 700,
                height: 700,
            },
            language: "ENGLISH".to_string(),
            last_ip: String::new(),
        }
    }
}

impl Settings {
    /// Parse and check a settings file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.difficulty()?;
        Ok(settings)
    }

    /// Read settings, writing defaults when the file is missing or corrupted.
    pub fn read_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            let settings = Settings::default();
            settings.save(path)?;
            return Ok(settings);
        }
        match Self::load(path) {
            Ok(settings) => Ok(settings),
            Err(e @ (SettingsError::Json(_) | SettingsError::InvalidDifficulty(_))) => {
                tracing::warn!(path = %path.display(), error = %e, "settings corrupted, restoring defaults");
                let settings = Settings::default();
                settings.save(path)?;
                Ok(settings)
            }
            Err(e) => Err(e),
        }
    }

    /// Write the settings, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |e: std::io::Error| SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(io_err)
    }

    pub fn difficulty(&self) -> Result<Difficulty, SettingsError> {
        Difficulty::try_from(self.difficulty)
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty.tier();
    }
}
