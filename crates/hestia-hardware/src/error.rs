//! Error types for hardware operations.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur while talking to a peripheral.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Peripheral is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Peripheral initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Bus or wire-level communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Invalid data received from a peripheral.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// A command was outside the peripheral's physical range.
    #[error("Out of range: {message}")]
    OutOfRange { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new out-of-range error.
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange {
            message: message.into(),
        }
    }
}
