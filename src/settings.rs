//! Driver settings
//!
//! Loaded from an optional JSON file; command-line flags override on top.
//! None of this reaches the simulation core, whose constants are fixed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::policy::PolicyKind;

/// Command-line driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Engine seed; every episode seed is derived from it
    pub seed: u64,
    /// Episodes to play
    pub episodes: u32,
    /// Controller that picks actions
    pub policy: PolicyKind,

    // === Output ===
    /// Write one render snapshot per tick as JSON lines
    pub snapshot_path: Option<PathBuf>,
    /// Pace ticks at the render frame rate while streaming snapshots
    pub realtime: bool,
    /// Best-episodes board file (loaded at start, saved at exit)
    pub board_path: Option<PathBuf>,
    /// Log running stats every N episodes (0 = only at the end)
    pub report_every: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            episodes: 10,
            policy: PolicyKind::Aim,

            snapshot_path: None,
            realtime: false,
            board_path: None,
            report_every: 10,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let settings = serde_json::from_str(&json).map_err(|e| StoreError::json(path, e))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, StoreError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| StoreError::json(path, e))?;
        fs::write(path, json).map_err(|e| StoreError::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Whether the driver has to capture snapshots every tick
    pub fn streams_snapshots(&self) -> bool {
        self.snapshot_path.is_some()
    }
}
