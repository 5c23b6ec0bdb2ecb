//! The assembled Hestia control box.
//!
//! This crate wires the registry, the alarm, the television and the
//! shared peripherals into a single [`Station`] with an explicit command
//! surface and a cooperative [`Station::tick`]. Construction goes through
//! [`StationBuilder`]; time comes from an injected clock so the whole box
//! is drivable from tests without sleeping.

pub mod builder;
pub mod error;
pub mod station;

pub use builder::StationBuilder;
pub use error::{Result, StationError};
pub use station::{BootReport, Station};
