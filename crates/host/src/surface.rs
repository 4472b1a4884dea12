//! A render surface that records draw calls instead of drawing.

use std::cell::RefCell;
use std::rc::Rc;

use huepick_core::color::{Hsl, Rgb};
use huepick_core::service::RenderSurface;
use huepick_core::sphere::{MapPoint, SpherePoint};

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Text(String),
    SphereMarker { point: SpherePoint, color: Rgb },
    MapMarker { position: MapPoint, hsl: Hsl, visible: bool },
}

/// Keeps every draw call in order. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Rc<RefCell<Vec<DrawCall>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.borrow().clone()
    }

    /// The most recent readout, if any text was shown.
    pub fn last_text(&self) -> Option<String> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            DrawCall::Text(text) => Some(text.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl RenderSurface for RecordingSurface {
    fn show_text(&mut self, text: &str) {
        self.calls.borrow_mut().push(DrawCall::Text(text.to_owned()));
    }

    fn place_marker(&mut self, point: SpherePoint, color: Rgb) {
        self.calls
            .borrow_mut()
            .push(DrawCall::SphereMarker { point, color });
    }

    fn place_map_marker(&mut self, position: MapPoint, hsl: Hsl, visible: bool) {
        self.calls.borrow_mut().push(DrawCall::MapMarker {
            position,
            hsl,
            visible,
        });
    }
}
