//! Image-backed page captures.
//!
//! [`ImageFrame`] wraps an RGBA8 image as a [`CapturedFrame`].
//! [`ImageCaptureService`] records capture requests and answers them from a
//! queue of frames, which is how a host without a live browser (the CLI, the
//! tests) drives a picking session.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use huepick_core::color::Rgb;
use huepick_core::error::PickerError;
use huepick_core::service::{CaptureService, CaptureToken, CapturedFrame};
use image::RgbaImage;

/// A captured viewport held in memory.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    image: RgbaImage,
}

impl ImageFrame {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Builds a frame from a raw RGBA8 buffer.
    ///
    /// Returns `PickerError::InvalidDimensions` when the buffer length is not
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, PickerError> {
        RgbaImage::from_raw(width, height, rgba)
            .map(Self::new)
            .ok_or(PickerError::InvalidDimensions)
    }

    /// Decodes an image file (PNG with the default features).
    #[cfg(feature = "png")]
    pub fn open(path: &std::path::Path) -> Result<Self, PickerError> {
        let image = image::open(path)
            .map_err(|e| PickerError::Io(format!("{}: {e}", path.display())))?
            .to_rgba8();
        Ok(Self::new(image))
    }
}

impl CapturedFrame for ImageFrame {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Alpha is ignored; captures of the visible page are opaque.
    fn sample_at_point(&self, x: u32, y: u32) -> Option<Rgb> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
    }
}

#[derive(Debug, Default)]
struct CaptureQueue {
    requests: Vec<CaptureToken>,
    frames: VecDeque<ImageFrame>,
}

/// Answers capture requests with prepared frames, in order.
///
/// Clones share one queue: hand a clone to the session and keep another to
/// deliver results, the way a browser callback would.
#[derive(Debug, Clone, Default)]
pub struct ImageCaptureService {
    queue: Rc<RefCell<CaptureQueue>>,
}

impl ImageCaptureService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a frame to hand out for the next answered request.
    pub fn push_frame(&self, frame: ImageFrame) {
        self.queue.borrow_mut().frames.push_back(frame);
    }

    /// Every token requested so far, oldest first.
    pub fn requests(&self) -> Vec<CaptureToken> {
        self.queue.borrow().requests.clone()
    }

    /// Pops the next queued frame, paired with the most recent request.
    pub fn complete_latest(&self) -> Option<(CaptureToken, ImageFrame)> {
        let mut queue = self.queue.borrow_mut();
        let token = *queue.requests.last()?;
        let frame = queue.frames.pop_front()?;
        Some((token, frame))
    }
}

impl CaptureService for ImageCaptureService {
    fn request_capture(&mut self, token: CaptureToken) {
        tracing::debug!(token = token.value(), "capture requested");
        self.queue.borrow_mut().requests.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker() -> ImageFrame {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 128]));
        ImageFrame::new(image)
    }

    #[test]
    fn samples_pixels_ignoring_alpha() {
        let frame = checker();
        assert_eq!(frame.dimensions(), (2, 2));
        assert_eq!(frame.sample_at_point(0, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(frame.sample_at_point(1, 0), Some(Rgb::new(0, 255, 0)));
        assert_eq!(frame.sample_at_point(0, 1), Some(Rgb::new(0, 0, 255)));
        assert_eq!(frame.sample_at_point(1, 1), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn sampling_outside_returns_none() {
        let frame = checker();
        assert_eq!(frame.sample_at_point(2, 0), None);
        assert_eq!(frame.sample_at_point(0, 7), None);
    }

    #[test]
    fn from_rgba_checks_buffer_length() {
        assert!(ImageFrame::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            ImageFrame::from_rgba(2, 2, vec![0; 15]).unwrap_err(),
            PickerError::InvalidDimensions
        );
    }

    #[test]
    fn capture_service_needs_a_request_and_a_frame() {
        let service = ImageCaptureService::new();
        service.push_frame(checker());
        assert!(service.complete_latest().is_none(), "no request yet");
        assert!(service.requests().is_empty());
    }
}
