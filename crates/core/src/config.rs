//! Popup configuration.
//!
//! A [`PickerConfig`] is plain JSON. Every key is optional; missing keys take
//! the values of [`PickerConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::PickerError;
use crate::sphere::MapExtent;

/// Closest the camera may get to the sphere center.
pub const MIN_CAMERA_DISTANCE: f64 = 0.3;
/// Farthest the camera may get from the sphere center.
pub const MAX_CAMERA_DISTANCE: f64 = 3.0;
/// Most sphere markers a scene may keep.
pub const MAX_MARKER_HISTORY: usize = 1024;

/// Display settings for the map, the sphere and the text readout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PickerConfig {
    pub map_width: f64,
    pub map_height: f64,
    /// Whether the 2D map starts visible.
    pub show_map: bool,
    /// Whether the text readout ends with a `Hex:` line.
    pub include_hex: bool,
    /// Sphere markers kept before the oldest is dropped.
    pub marker_history: usize,
    /// Sphere material opacity in [0, 1].
    pub sphere_opacity: f64,
    pub camera_distance: f64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            map_width: 240.0,
            map_height: 240.0,
            show_map: true,
            include_hex: true,
            marker_history: 16,
            sphere_opacity: 0.5,
            camera_distance: 2.0,
        }
    }
}

impl PickerConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, PickerError> {
        let config: PickerConfig =
            serde_json::from_str(json).map_err(|e| PickerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks map extent, marker history, opacity and camera distance.
    pub fn validate(&self) -> Result<(), PickerError> {
        self.map_extent()?;
        if self.marker_history > MAX_MARKER_HISTORY {
            return Err(PickerError::InvalidConfig(format!(
                "marker_history must be at most {MAX_MARKER_HISTORY}, got {}",
                self.marker_history
            )));
        }
        if !(0.0..=1.0).contains(&self.sphere_opacity) {
            return Err(PickerError::InvalidConfig(format!(
                "sphere_opacity must be in [0, 1], got {}",
                self.sphere_opacity
            )));
        }
        if !(MIN_CAMERA_DISTANCE..=MAX_CAMERA_DISTANCE).contains(&self.camera_distance) {
            return Err(PickerError::InvalidConfig(format!(
                "camera_distance must be in [{MIN_CAMERA_DISTANCE}, {MAX_CAMERA_DISTANCE}], got {}",
                self.camera_distance
            )));
        }
        Ok(())
    }

    pub fn map_extent(&self) -> Result<MapExtent, PickerError> {
        MapExtent::new(self.map_width, self.map_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PickerConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = PickerConfig::from_json("{}").unwrap();
        assert_eq!(config, PickerConfig::default());
    }

    #[test]
    fn partial_json_overrides_only_given_keys() {
        let config = PickerConfig::from_json(r#"{"map_width": 360, "include_hex": false}"#).unwrap();
        assert_eq!(config.map_width, 360.0);
        assert!(!config.include_hex);
        assert_eq!(config.map_height, 240.0);
        assert_eq!(config.marker_history, 16);
    }

    #[test]
    fn json_round_trip() {
        let mut original = PickerConfig::default();
        original.show_map = false;
        original.sphere_opacity = 0.8;
        let json = serde_json::to_string_pretty(&original).unwrap();
        let restored = PickerConfig::from_json(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn zero_map_width_is_invalid_dimensions() {
        let result = PickerConfig::from_json(r#"{"map_width": 0}"#);
        assert_eq!(result, Err(PickerError::InvalidDimensions));
    }

    #[test]
    fn opacity_out_of_range_is_rejected() {
        let result = PickerConfig::from_json(r#"{"sphere_opacity": 1.5}"#);
        assert!(matches!(result, Err(PickerError::InvalidConfig(msg)) if msg.contains("sphere_opacity")));
    }

    #[test]
    fn oversized_marker_history_is_rejected() {
        for json in [
            r#"{"marker_history": 18446744073709551615}"#,
            r#"{"marker_history": 1000000000000}"#,
            r#"{"marker_history": 1025}"#,
        ] {
            let result = PickerConfig::from_json(json);
            assert!(
                matches!(&result, Err(PickerError::InvalidConfig(msg)) if msg.contains("marker_history")),
                "{json} gave {result:?}"
            );
        }
        assert!(PickerConfig::from_json(r#"{"marker_history": 1024}"#).is_ok());
    }

    #[test]
    fn camera_distance_outside_zoom_range_is_rejected() {
        let result = PickerConfig::from_json(r#"{"camera_distance": 10}"#);
        assert!(matches!(result, Err(PickerError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        let result = PickerConfig::from_json("{not json");
        assert!(matches!(result, Err(PickerError::InvalidConfig(_))));
    }

    #[test]
    fn wrong_type_is_invalid_config() {
        let result = PickerConfig::from_json(r#"{"show_map": "yes"}"#);
        assert!(matches!(result, Err(PickerError::InvalidConfig(_))));
    }
}
