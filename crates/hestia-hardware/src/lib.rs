//! Hardware abstraction layer for the Hestia control box.
//!
//! This crate defines trait-based boundaries for every peripheral the
//! firmware touches: the home-automation hub link, the non-volatile
//! settings area, the NFC badge reader, the microphone, output actuators
//! (switch, strip, smart light), the IR remote transmitter, the deterrent
//! launcher and the local operator panel.
//!
//! # Design Philosophy
//!
//! - **Synchronous and prompt**: the firmware is a single-threaded
//!   cooperative tick loop, so every trait method returns quickly and
//!   drivers that need pacing handle it internally.
//! - **Object-safe**: components hold peripherals as `Box<dyn Trait>` or
//!   borrow them as `&mut dyn Trait`.
//! - **Error-aware**: fallible operations return [`Result<T>`] with a
//!   [`HardwareError`] describing the failure.
//!
//! # Mock Implementations
//!
//! The [`mock`] module provides a simulated counterpart for every trait,
//! each paired with a handle that scripts inputs and inspects recorded
//! outputs without touching physical hardware.

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use error::{HardwareError, Result};
pub use traits::{
    HubBridge, Launcher, LightActuator, Microphone, NfcReader, OperatorPanel, RemoteTransmitter,
    SettingsStore, StripActuator, SwitchActuator,
};
pub use types::{HubEvent, HubRecord, LightCommand, RemoteCommand, SettingKey, Tone};
