//! Configuration for the generation pipeline.
//!
//! Uses `figment` for layered configuration: defaults -> config file ->
//! environment. The main knob is the camera framing convention applied to
//! every generated scene: one fixed vantage chosen for the whole system
//! rather than per-scene, since model-chosen camera placement is unreliable.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The fixed camera framing convention applied to generated scenes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramingConfig {
    /// Camera vantage position as `[x, y, z]`.
    pub position: [f64; 3],
    /// Field of view in degrees for perspective cameras.
    pub fov: f64,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 10.0],
            fov: 60.0,
        }
    }
}

/// Top-level configuration for the sceneforge pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub framing: FramingConfig,
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `SCENEFORGE_`)
/// 2. Config file (if a path is given and the file exists)
/// 3. Built-in defaults
pub fn load_config(config_file: Option<&Path>) -> Result<PipelineConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(PipelineConfig::default()));

    if let Some(path) = config_file
        && path.exists()
    {
        figment = figment.merge(Toml::file(path));
    }

    // Environment variables (SCENEFORGE_FRAMING__FOV, etc.)
    figment = figment.merge(Env::prefixed("SCENEFORGE_").split("__"));

    figment.extract().map_err(Box::new)
}
