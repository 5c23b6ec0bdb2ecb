//! Intrusion alarm for the Hestia control box.
//!
//! The alarm is a four-state machine (`Disarmed`, `Armed`, `Ringing`,
//! `Enrollment`) that drives a device group (door LED, beacon, RGB strip,
//! siren relay) through the shared registry, authenticates via NFC badges
//! stored in the settings area, and aims a projectile deterrent while
//! ringing.

pub mod alarm;
pub mod cards;
pub mod deterrent;
pub mod error;
pub mod state;

pub use alarm::{Alarm, AlarmDevices};
pub use cards::{CardStore, MAX_CARDS};
pub use deterrent::Deterrent;
pub use error::{AlarmError, Result};
pub use state::AlarmState;
