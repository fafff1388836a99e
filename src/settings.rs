//! Simulation settings with persistence
//!
//! Settings are saved to `~/.config/goap-sim/settings.toml`

use std::fs;
use std::path::PathBuf;

use goap_agent::PlannerConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All simulation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub planner: PlannerConfig,
    pub simulation: SimulationSettings,
}

impl SimSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("goap-sim"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        // Create config directory if it doesn't exist
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// World and agent tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Number of ticks to simulate
    pub ticks: u32,
    /// Seconds per tick
    pub delta: f32,
    /// Walking speed in units per second
    pub speed: f32,
    /// Distance at which a target counts as in range
    pub reach: f32,
    /// Strokes needed to chop one log
    pub chop_strokes: u32,
    /// Ticks needed to gather one log's worth of branches
    pub branch_ticks: u32,
    /// Chance per stroke that the axe breaks (0.0–1.0)
    pub axe_break_chance: f32,
    /// Axes stored in the tool shed
    pub axes: u32,
    pub trees: usize,
    pub logs_per_tree: u32,
    pub forest_radius: f32,
    /// RNG seed, so runs are reproducible
    pub seed: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            ticks: 2000,
            delta: 0.1,
            speed: 3.0,
            reach: 1.0,
            chop_strokes: 5,
            branch_ticks: 20,
            axe_break_chance: 0.02,
            axes: 3,
            trees: 4,
            logs_per_tree: 3,
            forest_radius: 10.0,
            seed: 42,
        }
    }
}
