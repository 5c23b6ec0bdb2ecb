use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Identity / registry errors
    #[error("Invalid device ID: {0}")]
    InvalidDeviceId(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Duplicate device ID: {0}")]
    DuplicateDeviceId(String),

    // Command errors
    #[error("Device not operational: {0}")]
    NotOperational(String),

    #[error("Device locked: {0}")]
    Locked(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Out of range: {0}")]
    OutOfRange(String),

    // Data errors
    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Duplicate card: {0}")]
    DuplicateCard(String),

    #[error("Invalid command format: {0}")]
    InvalidCommandFormat(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
