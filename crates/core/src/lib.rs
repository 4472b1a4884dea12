#![deny(unsafe_code)]
//! Core of the huepick color picker.
//!
//! Converts sampled colors between RGB, HSV, HSL and hex ([`color`]), places
//! them on the HSL color sphere and the 2D hue/lightness map ([`sphere`]), runs
//! the single-toggle hover-picking state machine ([`session`]) and fans
//! results out to a host rendering surface ([`presentation`]).
//!
//! Page capture, messaging, persistence and drawing are host collaborators,
//! described by the traits in [`service`].

pub mod color;
pub mod config;
pub mod error;
pub mod presentation;
pub mod service;
pub mod session;
pub mod sphere;

pub use color::{
    hex_to_rgb, hsl_components_to_rgb, hsl_to_rgb, rgb_to_hex, rgb_to_hsl, rgb_to_hsv, ColorHex,
    Hsl, Hsv, Rgb,
};
pub use config::PickerConfig;
pub use error::PickerError;
pub use presentation::{ColorReading, Presentation, PresentationAdapter, SceneContext};
pub use service::{
    CaptureService, CaptureToken, CapturedFrame, ColorStore, Eyedropper, ListenerHandle,
    MemoryStore, MessageBus, PickerEvent, RenderSurface, Viewport, ViewportPoint,
};
pub use session::{PickingSession, SessionState};
pub use sphere::{
    hsl_to_color_map_position, hsl_to_sphere_point, MapExtent, MapPoint, SpherePoint,
};
