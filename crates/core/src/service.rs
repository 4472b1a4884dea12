//! Traits for the host collaborators the picker drives.
//!
//! Page capture, the native eyedropper, cross-context messaging, persistence
//! and rendering all live outside this crate. Each is an object-safe trait so
//! hosts can plug in `Box<dyn ...>` implementations.
//!
//! Asynchronous host APIs are modeled as request/response pairs: the session
//! issues a request carrying a [`CaptureToken`] and the host later answers
//! through [`PickingSession::capture_completed`](crate::PickingSession::capture_completed).

use serde::{Deserialize, Serialize};

use crate::color::{ColorHex, Hsl, Rgb};
use crate::error::PickerError;
use crate::sphere::{MapPoint, SpherePoint};

/// Identifies one capture request. A newer token supersedes all older ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureToken(u64);

impl CaptureToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Opaque registration handle minted by a [`MessageBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Produces still images of the visible page.
pub trait CaptureService {
    /// Starts capturing the visible viewport. The host answers with the same
    /// token once the image is ready.
    fn request_capture(&mut self, token: CaptureToken);
}

/// A captured image that can be sampled pixel by pixel.
pub trait CapturedFrame {
    /// Image size in pixels as `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Color at image coordinates, or `None` outside the image.
    fn sample_at_point(&self, x: u32, y: u32) -> Option<Rgb>;
}

/// The host's native screen eyedropper, where available.
pub trait Eyedropper {
    /// Lets the user pick one pixel anywhere on screen.
    ///
    /// Fails with `PickerError::UserCancelled` when dismissed and
    /// `PickerError::Unsupported` when the host has no eyedropper.
    fn open_picker(&mut self) -> Result<ColorHex, PickerError>;
}

/// Messages exchanged between the popup and the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PickerEvent {
    /// A pixel was sampled under the pointer.
    ColorPicked { color: Rgb },
    /// Hover picking was switched off; page-side listeners should detach.
    PickingStopped,
}

/// Cross-context messaging.
pub trait MessageBus {
    fn subscribe(&mut self) -> ListenerHandle;

    /// Removes a registration. Unknown handles must be ignored.
    fn unsubscribe(&mut self, handle: ListenerHandle);

    /// Fire-and-forget broadcast.
    fn publish(&mut self, event: &PickerEvent);
}

/// Best-effort storage for the last picked color.
pub trait ColorStore {
    fn get(&self) -> Option<Rgb>;

    fn set(&mut self, color: Rgb) -> Result<(), PickerError>;
}

/// Drawing surface for the text readout, the map marker and the sphere marker.
pub trait RenderSurface {
    fn show_text(&mut self, text: &str);

    fn place_marker(&mut self, point: SpherePoint, color: Rgb);

    /// `visible` is false while the map is hidden; the marker is still placed.
    fn place_map_marker(&mut self, position: MapPoint, hsl: Hsl, visible: bool);
}

/// A [`ColorStore`] that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    color: Option<Rgb>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ColorStore for MemoryStore {
    fn get(&self) -> Option<Rgb> {
        self.color
    }

    fn set(&mut self, color: Rgb) -> Result<(), PickerError> {
        self.color = Some(color);
        Ok(())
    }
}

/// Size of the browser viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// A pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

/// Scales a viewport position to image pixel coordinates.
///
/// Captures are taken at device resolution, so each axis is scaled by
/// `image / viewport` and floored. Returns `PickerError::OutOfBounds` when the
/// result lies outside the image and `PickerError::InvalidDimensions` for an
/// empty viewport.
pub fn scale_to_image(
    point: ViewportPoint,
    viewport: Viewport,
    image: (u32, u32),
) -> Result<(u32, u32), PickerError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(viewport.width) || !valid(viewport.height) {
        return Err(PickerError::InvalidDimensions);
    }
    let (width, height) = (f64::from(image.0), f64::from(image.1));
    let x = (point.x * width / viewport.width).floor();
    let y = (point.y * height / viewport.height).floor();
    if !(0.0..width).contains(&x) || !(0.0..height).contains(&y) {
        return Err(PickerError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    Ok((x as u32, y as u32))
}
