//! Device-layer error type.

use thiserror::Error;

/// Result type alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Errors surfaced by device mutators and the registry.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Validation or state-contract violation.
    #[error(transparent)]
    Core(#[from] hestia_core::Error),

    /// A peripheral refused or failed the actuation.
    #[error(transparent)]
    Hardware(#[from] hestia_hardware::HardwareError),
}
