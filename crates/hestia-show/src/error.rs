//! Show-layer error type.

use thiserror::Error;

/// Result type alias for show operations.
pub type Result<T> = std::result::Result<T, ShowError>;

/// Errors surfaced by the show model and the television.
#[derive(Debug, Error)]
pub enum ShowError {
    /// No show registered under this index.
    #[error("unknown show index {0}")]
    UnknownShow(usize),

    /// Action timecodes must never decrease.
    #[error("timecodes must be non-decreasing (action {index})")]
    NonMonotonicTimecode { index: usize },

    /// A volume or mute command was refused in the current state.
    #[error("command rejected: {0}")]
    Rejected(String),

    /// Malformed action command text.
    #[error(transparent)]
    Core(#[from] hestia_core::Error),

    /// A pool device refused a command during show setup or teardown.
    #[error(transparent)]
    Device(#[from] hestia_device::DeviceError),

    /// The IR transmitter or another owned peripheral failed.
    #[error(transparent)]
    Hardware(#[from] hestia_hardware::HardwareError),
}
