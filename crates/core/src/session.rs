//! The hover-picking session.
//!
//! A [`PickingSession`] is either idle or active and is driven by a single
//! [`toggle`](PickingSession::toggle) control. Activating it requests a fresh
//! page capture and registers exactly one sampling listener; deactivating it
//! releases that listener and forgets the capture. There is no timeout.
//!
//! Results that arrive late are identified and dropped: a capture result must
//! carry the token of the current request, and a sample must carry the handle
//! of the current listener.

use tracing::{debug, warn};

use crate::color::Rgb;
use crate::error::PickerError;
use crate::presentation::{ColorReading, Presentation, PresentationAdapter};
use crate::service::{
    scale_to_image, CaptureService, CaptureToken, CapturedFrame, ColorStore, Eyedropper,
    ListenerHandle, MemoryStore, MessageBus, PickerEvent, Viewport, ViewportPoint,
};

/// Whether hover picking is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// State machine for one popup's hover picking.
pub struct PickingSession {
    capture: Box<dyn CaptureService>,
    bus: Box<dyn MessageBus>,
    store: Box<dyn ColorStore>,
    presenter: PresentationAdapter,
    /// `Some` exactly while the session is active.
    listener: Option<ListenerHandle>,
    pending_capture: Option<CaptureToken>,
    frame: Option<Box<dyn CapturedFrame>>,
    tokens_issued: u64,
    last_reading: Option<ColorReading>,
}

impl PickingSession {
    /// Creates an idle session persisting to an in-memory store.
    pub fn new(
        capture: Box<dyn CaptureService>,
        bus: Box<dyn MessageBus>,
        presenter: PresentationAdapter,
    ) -> Self {
        Self {
            capture,
            bus,
            store: Box::new(MemoryStore::new()),
            presenter,
            listener: None,
            pending_capture: None,
            frame: None,
            tokens_issued: 0,
            last_reading: None,
        }
    }

    /// Replaces the store used for the last picked color.
    pub fn with_store(mut self, store: Box<dyn ColorStore>) -> Self {
        self.store = store;
        self
    }

    pub fn state(&self) -> SessionState {
        if self.listener.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// The registered listener, while active.
    pub fn listener(&self) -> Option<ListenerHandle> {
        self.listener
    }

    /// The capture request still awaiting its result.
    pub fn pending_capture(&self) -> Option<CaptureToken> {
        self.pending_capture
    }

    /// Whether a captured frame is ready for sampling.
    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }

    /// The most recent color, kept for re-display.
    pub fn last_reading(&self) -> Option<&ColorReading> {
        self.last_reading.as_ref()
    }

    pub fn presenter(&self) -> &PresentationAdapter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut PresentationAdapter {
        &mut self.presenter
    }

    /// Switches hover picking on when idle and off when active.
    ///
    /// Returns the new state.
    pub fn toggle(&mut self) -> SessionState {
        if self.is_active() {
            self.stop();
        } else {
            self.start();
        }
        self.state()
    }

    fn start(&mut self) {
        self.tokens_issued += 1;
        let token = CaptureToken::new(self.tokens_issued);
        self.pending_capture = Some(token);
        self.frame = None;
        self.capture.request_capture(token);
        let handle = self.bus.subscribe();
        self.listener = Some(handle);
        debug!(token = token.value(), listener = handle.id(), "picking started");
    }

    /// Safe to call in any state: the handle is taken before it is released.
    fn stop(&mut self) {
        if let Some(handle) = self.listener.take() {
            self.bus.unsubscribe(handle);
            self.bus.publish(&PickerEvent::PickingStopped);
            debug!(listener = handle.id(), "picking stopped");
        }
        self.pending_capture = None;
        self.frame = None;
    }

    /// Accepts the host's answer to a capture request.
    ///
    /// Returns `PickerError::StaleCapture`, dropping the frame, unless the
    /// session is active and `token` is the pending request.
    pub fn capture_completed(
        &mut self,
        token: CaptureToken,
        frame: Box<dyn CapturedFrame>,
    ) -> Result<(), PickerError> {
        if !self.is_active() || self.pending_capture != Some(token) {
            debug!(token = token.value(), "dropping stale capture");
            return Err(PickerError::StaleCapture);
        }
        let (width, height) = frame.dimensions();
        debug!(token = token.value(), width, height, "capture ready");
        self.pending_capture = None;
        self.frame = Some(frame);
        Ok(())
    }

    /// Samples the captured frame under the pointer and presents the color.
    ///
    /// The sample is also published as [`PickerEvent::ColorPicked`].
    pub fn pointer_moved(
        &mut self,
        listener: ListenerHandle,
        point: ViewportPoint,
        viewport: Viewport,
    ) -> Result<Presentation, PickerError> {
        self.check_listener(listener)?;
        let frame = self.frame.as_ref().ok_or(PickerError::CapturePending)?;
        let dimensions = frame.dimensions();
        let (x, y) = scale_to_image(point, viewport, dimensions)?;
        let color = frame
            .sample_at_point(x, y)
            .ok_or(PickerError::OutOfBounds {
                x: f64::from(x),
                y: f64::from(y),
                width: f64::from(dimensions.0),
                height: f64::from(dimensions.1),
            })?;
        self.bus.publish(&PickerEvent::ColorPicked { color });
        self.sample_received(listener, color)
    }

    /// Processes a sample delivered to `listener`.
    ///
    /// Samples for a released or foreign listener are dropped with
    /// `PickerError::StaleSample`; nothing is drawn and the state is unchanged.
    pub fn sample_received(
        &mut self,
        listener: ListenerHandle,
        color: Rgb,
    ) -> Result<Presentation, PickerError> {
        self.check_listener(listener)?;
        Ok(self.show(color, true))
    }

    /// Picks a color with the native eyedropper.
    ///
    /// Works whether or not hover picking is active. A cancelled pick returns
    /// `Ok(None)` and leaves the displayed color alone; `Unsupported` is passed
    /// back so the caller can disable the entry point.
    pub fn pick_with_eyedropper(
        &mut self,
        eyedropper: &mut dyn Eyedropper,
    ) -> Result<Option<Presentation>, PickerError> {
        match eyedropper.open_picker() {
            Ok(hex) => Ok(Some(self.show(hex.to_rgb(), true))),
            Err(PickerError::UserCancelled) => {
                debug!("eyedropper cancelled");
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "eyedropper failed");
                Err(err)
            }
        }
    }

    /// Re-presents the persisted last color, e.g. when the popup reopens.
    pub fn restore(&mut self) -> Option<Presentation> {
        let color = self.store.get()?;
        Some(self.show(color, false))
    }

    fn check_listener(&self, listener: ListenerHandle) -> Result<(), PickerError> {
        if self.listener != Some(listener) {
            debug!(listener = listener.id(), "dropping stale sample");
            return Err(PickerError::StaleSample);
        }
        Ok(())
    }

    fn show(&mut self, color: Rgb, persist: bool) -> Presentation {
        let reading = ColorReading::from_rgb(color);
        let presentation = self.presenter.present(&reading);
        if persist {
            if let Err(err) = self.store.set(color) {
                warn!(error = %err, "failed to persist last color");
            }
        }
        self.last_reading = Some(reading);
        presentation
    }
}

impl Drop for PickingSession {
    fn drop(&mut self) {
        self.stop();
    }
}
