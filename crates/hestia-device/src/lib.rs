//! Device framework for the Hestia control box.
//!
//! Devices compose small capability traits ([`Identifiable`],
//! [`Switchable`], [`Lockable`], [`Tickable`]) around a shared
//! [`OutputCore`] that enforces the mutation guard order: a device must be
//! operational, then unlocked, and only a genuine state change reaches the
//! actuator and the hub. The [`DeviceRegistry`] owns every output device
//! for the process lifetime and enforces ID uniqueness at registration.

pub mod binary;
pub mod capability;
pub mod context;
pub mod error;
pub mod light;
pub mod mode;
pub mod output;
pub mod registry;
pub mod strip;

pub use binary::BinaryOutput;
pub use capability::{Identifiable, Lockable, Switchable, Tickable};
pub use context::DeviceCtx;
pub use error::{DeviceError, Result};
pub use light::{ColorLight, TemperatureLight};
pub use mode::{
    AlarmBlink, ColorMode, RainbowMode, ShowEffect, ShowEffectMode, SoundreactMode, StripMode,
    StripSink,
};
pub use output::OutputCore;
pub use registry::{DeviceRegistry, OutputDevice};
pub use strip::RgbStrip;
