#![deny(unsafe_code)]
//! Host-side collaborators for a huepick picking session.
//!
//! `huepick-core` only talks to traits. This crate provides implementations
//! that run without a browser: captures backed by in-memory or on-disk images,
//! an in-process message bus, a recording render surface and a JSON file
//! store, plus CPU rasterization of the hue/lightness map and the color sphere.
//! The CLI and the integration tests drive sessions through these types.

pub mod bus;
pub mod frame;
pub mod pixel;
pub mod store;
pub mod surface;

#[cfg(feature = "png")]
pub mod snapshot;

pub use bus::LocalBus;
pub use frame::{ImageCaptureService, ImageFrame};
pub use store::JsonFileStore;
pub use surface::{DrawCall, RecordingSurface};
