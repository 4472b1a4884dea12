//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: picker error (stale or pending capture, out-of-bounds sample)
//! - 11: I/O error (image decode, PNG write, store, config file)
//! - 12: input error (bad color string, bad config JSON, bad viewport)
//! - 13: serialization error

use std::fmt;

use huepick_core::PickerError;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A session failure: stale or pending capture, or a pointer outside the
    /// captured image.
    Picker(PickerError),
    /// Reading an image, config or store file, or writing the map PNG.
    Io(String),
    /// A malformed color string, a rejected config, or unusable map or
    /// viewport dimensions.
    Input(String),
    /// JSON output could not be produced.
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Picker(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Picker(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl From<PickerError> for CliError {
    fn from(e: PickerError) -> Self {
        match e {
            PickerError::Io(msg) => CliError::Io(msg),
            PickerError::InvalidFormat(_)
            | PickerError::InvalidConfig(_)
            | PickerError::InvalidDimensions => CliError::Input(e.to_string()),
            other => CliError::Picker(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
