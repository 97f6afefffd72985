use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::canvas::{DEFAULT_ZOOM_FACTOR, ScaleLimits};

pub const CONFIG_ENV: &str = "WCANVAS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "wcanvas.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub zoom_factor: f32,
    pub min_scale: Option<f32>,
    pub max_scale: Option<f32>,
    /// Longest side, in world units, of a newly placed image.
    pub image_max_extent: f32,
    pub background: [f32; 4],
    /// Images placed at startup, in order.
    pub images: Vec<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            min_scale: None,
            max_scale: None,
            image_max_extent: 400.0,
            background: [0.96, 0.96, 0.96, 1.0],
            images: Vec::new(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid viewer config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Reads the file named by `WCANVAS_CONFIG`, else `wcanvas.json` if it exists,
    /// else falls back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            log::info!("loading config from {path} ({CONFIG_ENV})");
            return Self::from_file(Path::new(&path));
        }

        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            log::info!("loading config from {}", path.display());
            return Self::from_file(path);
        }

        log::info!("no config file, using defaults");
        Ok(Self::default())
    }

    pub fn scale_limits(&self) -> ScaleLimits {
        ScaleLimits::new(self.min_scale, self.max_scale)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(self.zoom_factor.is_finite() && self.zoom_factor > 1.0) {
            anyhow::bail!("zoom_factor must be greater than 1, got {}", self.zoom_factor);
        }
        for (name, bound) in [("min_scale", self.min_scale), ("max_scale", self.max_scale)] {
            if let Some(value) = bound {
                if !(value.is_finite() && value > 0.0) {
                    anyhow::bail!("{name} must be a positive number, got {value}");
                }
            }
        }
        if !(self.image_max_extent.is_finite() && self.image_max_extent > 0.0) {
            anyhow::bail!(
                "image_max_extent must be positive, got {}",
                self.image_max_extent
            );
        }
        Ok(())
    }
}
