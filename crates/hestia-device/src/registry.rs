//! Owned device registry.

use crate::{
    Result,
    binary::BinaryOutput,
    capability::{Identifiable, Lockable, Switchable, Tickable},
    context::DeviceCtx,
    light::{ColorLight, TemperatureLight},
    strip::RgbStrip,
};
use hestia_core::{DeviceId, Error};
use tracing::warn;

/// Any output device the registry can own. Enum dispatch instead of trait
/// objects keeps concrete accessors (strips need strip-specific commands)
/// available without downcasting.
pub enum OutputDevice {
    Binary(BinaryOutput),
    TemperatureLight(TemperatureLight),
    ColorLight(ColorLight),
    Strip(RgbStrip),
}

impl OutputDevice {
    /// The concrete strip, when this device is one.
    pub fn as_strip_mut(&mut self) -> Option<&mut RgbStrip> {
        match self {
            OutputDevice::Strip(strip) => Some(strip),
            _ => None,
        }
    }

    pub fn as_temperature_light_mut(&mut self) -> Option<&mut TemperatureLight> {
        match self {
            OutputDevice::TemperatureLight(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_color_light_mut(&mut self) -> Option<&mut ColorLight> {
        match self {
            OutputDevice::ColorLight(light) => Some(light),
            _ => None,
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $device:ident => $body:expr) => {
        match $self {
            OutputDevice::Binary($device) => $body,
            OutputDevice::TemperatureLight($device) => $body,
            OutputDevice::ColorLight($device) => $body,
            OutputDevice::Strip($device) => $body,
        }
    };
}

impl Identifiable for OutputDevice {
    fn id(&self) -> DeviceId {
        dispatch!(self, device => device.id())
    }

    fn name(&self) -> &str {
        dispatch!(self, device => device.name())
    }

    fn is_operational(&self) -> bool {
        dispatch!(self, device => device.is_operational())
    }
}

impl Switchable for OutputDevice {
    fn is_on(&self) -> bool {
        dispatch!(self, device => device.is_on())
    }

    fn turn_on(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        dispatch!(self, device => device.turn_on(ctx, share))
    }

    fn turn_off(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        dispatch!(self, device => device.turn_off(ctx, share))
    }
}

impl Lockable for OutputDevice {
    fn lock(&mut self) {
        dispatch!(self, device => device.lock())
    }

    fn unlock(&mut self) {
        dispatch!(self, device => device.unlock())
    }

    fn is_locked(&self) -> bool {
        dispatch!(self, device => device.is_locked())
    }
}

impl Tickable for OutputDevice {
    fn tick(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        dispatch!(self, device => device.tick(ctx))
    }
}

/// All output devices, built once at startup and owned for the process
/// lifetime.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: Vec<OutputDevice>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        DeviceRegistry {
            devices: Vec::new(),
        }
    }

    /// Add a device.
    ///
    /// # Errors
    /// Returns `DuplicateDeviceId` when a device with the same ID is
    /// already registered.
    pub fn register(&mut self, device: OutputDevice) -> Result<()> {
        let id = device.id();
        if self.devices.iter().any(|d| d.id() == id) {
            return Err(Error::DuplicateDeviceId(id.to_string()).into());
        }
        self.devices.push(device);
        Ok(())
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.devices.iter().any(|d| d.id() == id)
    }

    pub fn get(&self, id: DeviceId) -> Option<&OutputDevice> {
        self.devices.iter().find(|d| d.id() == id)
    }

    pub fn get_mut(&mut self, id: DeviceId) -> Option<&mut OutputDevice> {
        self.devices.iter_mut().find(|d| d.id() == id)
    }

    /// Mutable access that surfaces a missing device as an error.
    ///
    /// # Errors
    /// Returns `DeviceNotFound` for an unknown ID.
    pub fn require_mut(&mut self, id: DeviceId) -> Result<&mut OutputDevice> {
        self.get_mut(id)
            .ok_or_else(|| Error::DeviceNotFound(id.to_string()).into())
    }

    /// The concrete strip registered under `id`.
    ///
    /// # Errors
    /// Returns `DeviceNotFound` when the ID is unknown or not a strip.
    pub fn strip_mut(&mut self, id: DeviceId) -> Result<&mut RgbStrip> {
        self.require_mut(id)?
            .as_strip_mut()
            .ok_or_else(|| Error::DeviceNotFound(format!("{id} is not a strip")).into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputDevice> {
        self.devices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut OutputDevice> {
        self.devices.iter_mut()
    }

    /// Advance every device's animations and timers.
    ///
    /// A single failing device is logged and skipped so one dead actuator
    /// cannot stall the rest of the loop.
    pub fn tick_all(&mut self, ctx: &mut DeviceCtx) {
        for device in &mut self.devices {
            if let Err(error) = device.tick(ctx) {
                warn!(device = %device.id(), %error, "device tick failed");
            }
        }
    }
}
