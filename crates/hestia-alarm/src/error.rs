//! Alarm-layer error type.

use crate::state::AlarmState;
use thiserror::Error;

/// Result type alias for alarm operations.
pub type Result<T> = std::result::Result<T, AlarmError>;

/// Errors surfaced by alarm operations.
#[derive(Debug, Error)]
pub enum AlarmError {
    /// The requested operation is not valid in the current state.
    #[error("invalid alarm transition from {from} to {to}")]
    InvalidTransition { from: AlarmState, to: AlarmState },

    /// A device in the alarm group refused the command.
    #[error(transparent)]
    Device(#[from] hestia_device::DeviceError),

    /// Shared validation error (duplicate card, bad format, ...).
    #[error(transparent)]
    Core(#[from] hestia_core::Error),

    /// A peripheral owned directly by the alarm failed.
    #[error(transparent)]
    Hardware(#[from] hestia_hardware::HardwareError),
}
