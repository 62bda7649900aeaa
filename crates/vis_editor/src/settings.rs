//! Editor settings storage
//!
//! Every settings struct is stored as its own RON file in the settings
//! directory. Settings are never essential: a file that is missing or fails
//! to parse is logged and replaced by the default value.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use vis_runtime::prelude::ConfigError;

/// Loads and saves settings structs by name
#[derive(Debug, Clone)]
pub struct SettingsIo {
    directory: PathBuf,
}

impl SettingsIo {
    /// Store settings under `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// Directory holding the settings files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File used for settings called `name`
    pub fn path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.ron"))
    }

    /// Load settings, falling back to the default value
    pub fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        match self.try_load(name) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                log::debug!("No settings '{name}', using defaults");
                T::default()
            }
            Err(error) => {
                log::warn!("Failed to load settings '{name}', using defaults: {error}");
                T::default()
            }
        }
    }

    /// Load settings, `None` when they were never saved
    pub fn try_load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ConfigError> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        ron::from_str(&contents).map(Some).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save settings, creating the directory when needed
    pub fn save<T: Serialize>(&self, name: &str, settings: &T) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.directory)?;
        let contents = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(self.path(name), contents)?;
        log::debug!("Saved settings '{name}'");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct GridSettings {
        visible: bool,
        size: u32,
    }

    impl Default for GridSettings {
        fn default() -> Self {
            Self { visible: true, size: 1 }
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsIo::new(dir.path().join("settings"));

        let grid = GridSettings { visible: false, size: 4 };
        settings.save("grid", &grid).unwrap();
        assert!(settings.path("grid").exists());
        assert_eq!(settings.load::<GridSettings>("grid"), grid);
    }

    #[test]
    fn test_missing_and_broken_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsIo::new(dir.path());
        assert_eq!(settings.load::<GridSettings>("grid"), GridSettings::default());

        std::fs::write(settings.path("grid"), "not ron at all (").unwrap();
        assert!(settings.try_load::<GridSettings>("grid").is_err());
        assert_eq!(settings.load::<GridSettings>("grid"), GridSettings::default());
    }
}
