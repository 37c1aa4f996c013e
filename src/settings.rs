use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::clock::interval::DEFAULT_FRAME_INTERVAL;
use crate::playback::speed::{DEFAULT_SPEED_KMH, MIN_SPEED_KMH};

/// Persistent application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last used speed, restored on the next launch
    pub speed_kmh: u32,
    /// Milliseconds between clock ticks
    pub frame_interval_ms: u64,
    /// Print narrated instructions to stdout
    pub narrate_to_stdout: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL.as_millis() as u64,
            narrate_to_stdout: true,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ridealong").join("settings.json"))
    }

    /// Load from the user config dir, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                warn!("Ignoring settings: {:#}", e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if settings.speed_kmh < MIN_SPEED_KMH {
            warn!("Stored speed {} km/h below minimum, using default", settings.speed_kmh);
            settings.speed_kmh = DEFAULT_SPEED_KMH;
        }
        debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("No config directory on this system")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }
}
