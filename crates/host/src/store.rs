//! Last-picked color persisted as a small JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use huepick_core::color::Rgb;
use huepick_core::error::PickerError;
use huepick_core::service::ColorStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredColor {
    picked_color: Rgb,
}

/// A [`ColorStore`] backed by `{"pickedColor": "#rrggbb"}` on disk.
///
/// A missing file means nothing was stored yet. An unreadable or malformed
/// file is logged and treated the same way.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ColorStore for JsonFileStore {
    fn get(&self) -> Option<Rgb> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "color store unreadable");
                return None;
            }
        };
        match serde_json::from_str::<StoredColor>(&json) {
            Ok(stored) => Some(stored.picked_color),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "color store malformed");
                None
            }
        }
    }

    fn set(&mut self, color: Rgb) -> Result<(), PickerError> {
        let json = serde_json::to_string(&StoredColor {
            picked_color: color,
        })
        .map_err(|e| PickerError::Io(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| PickerError::Io(format!("{}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), color = %color.to_hex(), "color stored");
        Ok(())
    }
}
