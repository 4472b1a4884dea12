//! Error types for the huepick core.

use thiserror::Error;

/// Errors produced by conversion, mapping and session operations.
///
/// None of these are fatal: every failure degrades to "no visual update"
/// plus a diagnostic record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PickerError {
    /// A hex or `rgb(...)` color string could not be parsed.
    #[error("invalid color format: {0}")]
    InvalidFormat(String),

    /// A map position fell outside the canvas extent.
    #[error("position ({x}, {y}) out of bounds for map of size ({width}, {height})")]
    OutOfBounds {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    /// The native eyedropper is not available in this host.
    #[error("native eyedropper is not supported by this host")]
    Unsupported,

    /// The eyedropper was dismissed without a selection.
    #[error("color selection cancelled by user")]
    UserCancelled,

    /// A sample arrived for a listener that is no longer registered.
    #[error("sample delivered after the picking session stopped")]
    StaleSample,

    /// A capture result arrived for a superseded or cancelled request.
    #[error("capture result does not belong to the current session")]
    StaleCapture,

    /// A pointer event arrived before the capture result.
    #[error("capture has not completed yet")]
    CapturePending,

    /// Width or height was zero or not finite.
    #[error("invalid dimensions: width and height must be positive and finite")]
    InvalidDimensions,

    /// A configuration value was rejected.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Reading or writing persisted state failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_includes_message() {
        let err = PickerError::InvalidFormat("#zzzzzz".into());
        let msg = format!("{err}");
        assert!(msg.contains("#zzzzzz"), "missing input in: {msg}");
    }

    #[test]
    fn out_of_bounds_includes_position_and_extent() {
        let err = PickerError::OutOfBounds {
            x: 410.0,
            y: -12.5,
            width: 240.0,
            height: 180.0,
        };
        let msg = format!("{err}");
        assert!(msg.contains("410"), "missing x in: {msg}");
        assert!(msg.contains("-12.5"), "missing y in: {msg}");
        assert!(msg.contains("240"), "missing width in: {msg}");
        assert!(msg.contains("180"), "missing height in: {msg}");
    }

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = format!("{}", PickerError::InvalidDimensions);
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_config_includes_message() {
        let err = PickerError::InvalidConfig("sphere_opacity must be in [0, 1]".into());
        assert!(err.to_string().contains("sphere_opacity"));
    }

    #[test]
    fn picker_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PickerError>();
    }

    #[test]
    fn picker_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<PickerError>();
    }
}
