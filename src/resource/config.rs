//! Loader configuration.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Where skybox documents are discovered and whether loading happens at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// When false, a reload yields an empty batch.
    pub enabled: bool,
    /// Directory name that must appear in a document id, e.g. `sky`.
    pub folder: String,
    /// File extension without the dot.
    pub extension: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            folder: "sky".to_string(),
            extension: "json".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Whether a document id (a `/`-separated relative path) names a skybox.
    ///
    /// The folder must be one of the id's directories, at any depth.
    pub fn matches(&self, id: &str) -> bool {
        let Some((dirs, file)) = id.rsplit_once('/') else {
            return false;
        };
        let has_extension = file
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext == self.extension);
        has_extension && dirs.split('/').any(|dir| dir == self.folder)
    }

    /// Save to a JSON file, creating parent directories.
    pub fn save_sync(&self, path: &Path) -> Result<(), io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)
    }

    /// Load from a JSON file; missing keys take their defaults.
    pub fn load_sync(path: &Path) -> Result<Self, io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }
}
