use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ItemStacksError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ToggleSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalItemsSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Comma-separated shared names, prefab names or plain names, such as
    /// `rk_pork, rk_porkrind, $item_rk_pork`.
    #[serde(default)]
    pub items: String,
}

impl Default for AdditionalItemsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            items: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipliersSection {
    #[serde(default = "MultipliersSection::default_stack_size")]
    pub stack_size_multiplier: f32,
    #[serde(default = "MultipliersSection::default_weight")]
    pub weight_multiplier: f32,
}

impl Default for MultipliersSection {
    fn default() -> Self {
        Self {
            stack_size_multiplier: Self::default_stack_size(),
            weight_multiplier: Self::default_weight(),
        }
    }
}

impl MultipliersSection {
    fn default_stack_size() -> f32 {
        10.0
    }

    fn default_weight() -> f32 {
        0.1
    }
}

fn default_true() -> bool {
    true
}

/// On-disk configuration, grouped the same way the settings are shown to
/// players.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemStacksConfig {
    #[serde(default)]
    pub item_stack_size: ToggleSection,
    #[serde(default)]
    pub item_weight: ToggleSection,
    #[serde(default)]
    pub item_multipliers: MultipliersSection,
    #[serde(default)]
    pub additional_items: AdditionalItemsSection,
}

/// Multipliers ready to hand to the tracker. `None` means the value is left
/// alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassSettings {
    pub stack_multiplier: Option<f32>,
    pub weight_multiplier: Option<f32>,
}

impl PassSettings {
    pub fn is_noop(&self) -> bool {
        self.stack_multiplier.is_none() && self.weight_multiplier.is_none()
    }
}

/// Clamps a configured multiplier to `[0, i32::MAX]`. NaN becomes 0.
pub fn clamp_multiplier(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, i32::MAX as f32)
}

impl ItemStacksConfig {
    pub fn default_path() -> Option<PathBuf> {
        let mut base = dirs::config_dir().or_else(dirs::data_dir)?;
        base.push("ItemStacks");
        base.push("config.json");
        Some(base)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| {
            ItemStacksError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn pass_settings(&self) -> PassSettings {
        PassSettings {
            stack_multiplier: self
                .item_stack_size
                .enabled
                .then(|| clamp_multiplier(self.item_multipliers.stack_size_multiplier)),
            weight_multiplier: self
                .item_weight
                .enabled
                .then(|| clamp_multiplier(self.item_multipliers.weight_multiplier)),
        }
    }
}
