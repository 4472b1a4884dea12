//! Fan-out of a picked color to the text readout, the 2D map and the sphere.
//!
//! [`PresentationAdapter`] owns the [`RenderSurface`] and a [`SceneContext`]
//! holding all mutable sphere-view state (markers, opacity, camera zoom and
//! orientation). The context is created with the adapter, changed only through
//! it, and cleared by [`PresentationAdapter::shutdown`].

use std::collections::VecDeque;

use glam::{DQuat, DVec3, EulerRot};
use tracing::{debug, warn};

use crate::color::{ColorHex, Hsl, Hsv, Rgb};
use crate::config::{PickerConfig, MAX_CAMERA_DISTANCE, MAX_MARKER_HISTORY, MIN_CAMERA_DISTANCE};
use crate::error::PickerError;
use crate::service::RenderSurface;
use crate::sphere::{hsl_to_color_map_position, hsl_to_sphere_point, MapExtent, MapPoint, SpherePoint};

/// Camera distance change per unit of wheel delta.
const ZOOM_SPEED: f64 = 0.0005;
/// Sphere rotation per pixel of pointer drag.
const DRAG_DEGREES_PER_PIXEL: f64 = 0.3;

/// Every derived form of one picked color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorReading {
    pub rgb: Rgb,
    pub hex: ColorHex,
    pub hsv: Hsv,
    pub hsl: Hsl,
    pub sphere: SpherePoint,
}

impl ColorReading {
    pub fn from_rgb(rgb: Rgb) -> Self {
        let hsl = rgb.to_hsl();
        Self {
            rgb,
            hex: rgb.to_hex(),
            hsv: rgb.to_hsv(),
            hsl,
            sphere: hsl_to_sphere_point(hsl),
        }
    }

    pub fn from_hex(hex: &ColorHex) -> Self {
        Self::from_rgb(hex.to_rgb())
    }
}

/// Formats the text readout, one representation per line.
pub fn format_readout(reading: &ColorReading, include_hex: bool) -> String {
    let Rgb { r, g, b } = reading.rgb;
    let Hsv { h, s, v } = reading.hsv;
    let hsl = reading.hsl;
    let mut text = format!(
        "RGB: {r},{g},{b}\nHSV: {h}°, {s}%, {v}%\nHSL: {}°, {}%, {}%",
        hsl.h, hsl.s, hsl.l
    );
    if include_hex {
        text.push_str("\nHex: ");
        text.push_str(reading.hex.as_str());
    }
    text
}

/// A marker on the color sphere, in sphere-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereMarker {
    pub position: SpherePoint,
    pub color: Rgb,
}

/// A marker on the 2D map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapMarker {
    pub position: MapPoint,
    pub hsl: Hsl,
    pub visible: bool,
}

/// What a single [`PresentationAdapter::present`] call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub text: String,
    /// `None` when the map position was out of bounds and drawing was skipped.
    pub map_marker: Option<MapMarker>,
    pub sphere_marker: SphereMarker,
}

/// Mutable state of the sphere view.
#[derive(Debug, Clone)]
pub struct SceneContext {
    markers: VecDeque<SphereMarker>,
    marker_history: usize,
    opacity: f64,
    camera_distance: f64,
    orientation: DQuat,
}

impl SceneContext {
    /// History beyond [`MAX_MARKER_HISTORY`] is truncated.
    pub fn new(config: &PickerConfig) -> Self {
        let marker_history = config.marker_history.min(MAX_MARKER_HISTORY);
        Self {
            markers: VecDeque::with_capacity(marker_history),
            marker_history,
            opacity: config.sphere_opacity.clamp(0.0, 1.0),
            camera_distance: config
                .camera_distance
                .clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE),
            orientation: DQuat::IDENTITY,
        }
    }

    /// Adds a marker, dropping the oldest once the history is full.
    pub fn add_marker(&mut self, marker: SphereMarker) {
        if self.marker_history == 0 {
            return;
        }
        while self.markers.len() >= self.marker_history {
            self.markers.pop_front();
        }
        self.markers.push_back(marker);
    }

    /// Markers from oldest to newest.
    pub fn markers(&self) -> impl Iterator<Item = &SphereMarker> {
        self.markers.iter()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Sets the sphere opacity from a 0-100 slider value.
    ///
    /// Non-finite values are ignored.
    pub fn set_opacity_percent(&mut self, percent: f64) {
        if !percent.is_finite() {
            debug!(percent, "ignoring non-finite opacity");
            return;
        }
        self.opacity = (percent / 100.0).clamp(0.0, 1.0);
        debug!(opacity = self.opacity, "sphere opacity changed");
    }

    pub fn camera_distance(&self) -> f64 {
        self.camera_distance
    }

    /// Moves the camera by a wheel delta and returns the clamped distance.
    ///
    /// Non-finite deltas leave the camera where it is.
    pub fn zoom(&mut self, wheel_delta_y: f64) -> f64 {
        if !wheel_delta_y.is_finite() {
            debug!(wheel_delta_y, "ignoring non-finite zoom delta");
            return self.camera_distance;
        }
        self.camera_distance = (self.camera_distance + wheel_delta_y * ZOOM_SPEED)
            .clamp(MIN_CAMERA_DISTANCE, MAX_CAMERA_DISTANCE);
        self.camera_distance
    }

    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    /// Rotates the sphere by a pointer drag of `(dx, dy)` pixels.
    pub fn rotate_by_drag(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let delta = DQuat::from_euler(
            EulerRot::XYZ,
            (dy * DRAG_DEGREES_PER_PIXEL).to_radians(),
            (dx * DRAG_DEGREES_PER_PIXEL).to_radians(),
            0.0,
        );
        self.orientation = (delta * self.orientation).normalize();
    }

    /// Marker position after the sphere's current rotation.
    pub fn world_position(&self, marker: &SphereMarker) -> DVec3 {
        self.orientation * marker.position.as_dvec3()
    }

    fn clear(&mut self) {
        self.markers.clear();
        self.orientation = DQuat::IDENTITY;
    }
}

/// Turns readings into display instructions for a [`RenderSurface`].
pub struct PresentationAdapter {
    surface: Box<dyn RenderSurface>,
    scene: SceneContext,
    extent: MapExtent,
    include_hex: bool,
    map_visible: bool,
}

impl PresentationAdapter {
    /// Validates `config` and builds the scene context.
    pub fn new(surface: Box<dyn RenderSurface>, config: &PickerConfig) -> Result<Self, PickerError> {
        config.validate()?;
        Ok(Self {
            surface,
            scene: SceneContext::new(config),
            extent: config.map_extent()?,
            include_hex: config.include_hex,
            map_visible: config.show_map,
        })
    }

    /// Sends the readout, the map marker and the sphere marker to the surface.
    ///
    /// An out-of-bounds map position is logged and that marker skipped; the
    /// text and the sphere marker are still drawn.
    pub fn present(&mut self, reading: &ColorReading) -> Presentation {
        let text = format_readout(reading, self.include_hex);
        self.surface.show_text(&text);

        let hsl = reading.hsl;
        let map_marker =
            match hsl_to_color_map_position(f64::from(hsl.h), f64::from(hsl.l), self.extent) {
                Ok(position) => {
                    let marker = MapMarker {
                        position,
                        hsl,
                        visible: self.map_visible,
                    };
                    self.surface
                        .place_map_marker(marker.position, marker.hsl, marker.visible);
                    Some(marker)
                }
                Err(err) => {
                    warn!(error = %err, ?hsl, "map marker skipped");
                    None
                }
            };

        let sphere_marker = SphereMarker {
            position: reading.sphere,
            color: reading.rgb,
        };
        self.scene.add_marker(sphere_marker);
        self.surface.place_marker(sphere_marker.position, sphere_marker.color);
        debug!(hex = %reading.hex, markers = self.scene.marker_count(), "presented color");

        Presentation {
            text,
            map_marker,
            sphere_marker,
        }
    }

    pub fn map_visible(&self) -> bool {
        self.map_visible
    }

    /// Applies the user's show/hide map toggle to subsequent markers.
    pub fn set_map_visible(&mut self, visible: bool) {
        self.map_visible = visible;
    }

    pub fn scene(&self) -> &SceneContext {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneContext {
        &mut self.scene
    }

    /// Drops all markers and resets the sphere orientation.
    pub fn shutdown(&mut self) {
        self.scene.clear();
        debug!("scene cleared");
    }
}
