//! Placement of HSL colors on the 3D color sphere and the 2D hue/lightness map.
//!
//! The sphere uses spherical coordinates with Y as the polar axis:
//! hue is the azimuth θ = h/360 · 2π, lightness the polar angle
//! φ = (1 − l/100) · π (white at the north pole, black at the south pole) and
//! saturation the distance from the center, s/100. A fully saturated color
//! therefore sits on the surface, and every gray collapses onto the center.

use std::f64::consts::{PI, TAU};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::color::{hsl_components_to_rgb, Hsl, Rgb};
use crate::error::PickerError;

/// A point within or on the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpherePoint(DVec3);

impl SpherePoint {
    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Euclidean distance from the sphere center.
    pub fn norm(&self) -> f64 {
        self.0.length()
    }

    pub fn as_dvec3(&self) -> DVec3 {
        self.0
    }
}

/// Converts spherical coordinates (Y-up) to a Cartesian vector.
fn from_spherical(radius: f64, phi: f64, theta: f64) -> DVec3 {
    let planar = radius * phi.sin();
    DVec3::new(planar * theta.sin(), radius * phi.cos(), planar * theta.cos())
}

/// Maps an HSL color to its marker position on the color sphere.
///
/// The norm equals `s / 100`, capped at 1 for hand-built inputs with `s > 100`.
pub fn hsl_to_sphere_point(hsl: Hsl) -> SpherePoint {
    let theta = f64::from(hsl.h) / 360.0 * TAU;
    let phi = (1.0 - f64::from(hsl.l) / 100.0) * PI;
    let radius = (f64::from(hsl.s) / 100.0).min(1.0);
    SpherePoint(from_spherical(radius, phi, theta))
}

/// Recovers `(hue_degrees, saturation, lightness)` for a point on the sphere
/// mesh, with saturation and lightness in [0, 1].
///
/// Used to paint the sphere's vertex colors; marker placement never needs it.
pub fn sphere_surface_hsl(position: DVec3) -> (f64, f64, f64) {
    let radius = position.length();
    if radius == 0.0 {
        return (0.0, 0.0, 1.0);
    }
    let theta = position.x.atan2(position.z);
    let phi = (position.y / radius).clamp(-1.0, 1.0).acos();
    let hue = theta.to_degrees().rem_euclid(360.0);
    (hue, radius.min(1.0), 1.0 - phi / PI)
}

/// The color painted at a sphere mesh vertex.
pub fn sphere_surface_color(position: DVec3) -> Rgb {
    let (h, s, l) = sphere_surface_hsl(position);
    hsl_components_to_rgb(h, s, l)
}

/// Pixel size of the 2D hue/lightness map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapExtent {
    pub width: f64,
    pub height: f64,
}

impl MapExtent {
    /// Returns `PickerError::InvalidDimensions` unless both sides are positive
    /// and finite.
    pub fn new(width: f64, height: f64) -> Result<Self, PickerError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(PickerError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn contains(&self, point: MapPoint) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// A position on the 2D map, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

/// Maps hue to x and lightness to y (white at the top) on the 2D map.
///
/// Returns `PickerError::OutOfBounds` when the point falls outside the map,
/// which only happens for hue or lightness outside their normal ranges.
pub fn hsl_to_color_map_position(h: f64, l: f64, extent: MapExtent) -> Result<MapPoint, PickerError> {
    let point = MapPoint {
        x: h / 360.0 * extent.width,
        y: (100.0 - l) / 100.0 * extent.height,
    };
    if !extent.contains(point) {
        return Err(PickerError::OutOfBounds {
            x: point.x,
            y: point.y,
            width: extent.width,
            height: extent.height,
        });
    }
    Ok(point)
}
