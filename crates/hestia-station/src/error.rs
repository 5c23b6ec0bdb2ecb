//! Station-level error type.

use thiserror::Error;

/// Result type alias for station operations.
pub type Result<T> = std::result::Result<T, StationError>;

/// Errors surfaced by the station and its builder.
#[derive(Debug, Error)]
pub enum StationError {
    /// The builder was finalized without a required component.
    #[error("station is missing its {0}")]
    MissingComponent(&'static str),

    #[error(transparent)]
    Alarm(#[from] hestia_alarm::AlarmError),

    #[error(transparent)]
    Show(#[from] hestia_show::ShowError),

    #[error(transparent)]
    Device(#[from] hestia_device::DeviceError),

    #[error(transparent)]
    Core(#[from] hestia_core::Error),
}
