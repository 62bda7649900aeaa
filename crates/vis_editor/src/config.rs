//! Editor configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vis_runtime::prelude::Config;

/// Editor start-up configuration
///
/// Stored as `editor.toml` or `editor.ron` next to the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Log filter, e.g. `"info"` or `"vis_editor=debug"`
    pub log_level: String,
    /// Pixels of source art per world unit
    pub pixels_per_unit: f32,
    /// Directory holding the editor settings files
    pub settings_dir: PathBuf,
    /// Viewport size in pixels
    pub viewport: Viewport,
    /// Layers of a new scene, bottom first
    pub layer_names: Vec<String>,
    /// Actions kept for undo
    pub undo_limit: usize,
}

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pixels_per_unit: 100.0,
            settings_dir: PathBuf::from(".vis/settings"),
            viewport: Viewport { width: 1280.0, height: 720.0 },
            layer_names: vec!["Background".to_string(), "Default".to_string(), "Foreground".to_string()],
            undo_limit: 100,
        }
    }
}

impl Config for EditorConfig {}
