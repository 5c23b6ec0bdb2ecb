//! Smart lights: temperature-only and full-color.

use crate::{
    Result,
    capability::{Identifiable, Lockable, Switchable, Tickable},
    context::DeviceCtx,
    output::OutputCore,
};
use hestia_core::{DeviceId, Error, Percent, Rgb};
use hestia_hardware::{LightActuator, LightCommand};
use tracing::debug;

/// Supported color temperature window, in kelvin.
pub const MIN_COLOR_TEMP_K: u16 = 2_000;
pub const MAX_COLOR_TEMP_K: u16 = 6_500;

/// White light with adjustable color temperature and luminosity.
pub struct TemperatureLight {
    core: OutputCore,
    color_temperature: u16,
    luminosity: Percent,
    actuator: Box<dyn LightActuator>,
}

impl TemperatureLight {
    pub fn new(id: DeviceId, name: impl Into<String>, actuator: Box<dyn LightActuator>) -> Self {
        TemperatureLight {
            core: OutputCore::new(id, name),
            color_temperature: 4_000,
            luminosity: Percent::new(100),
            actuator,
        }
    }

    pub fn color_temperature(&self) -> u16 {
        self.color_temperature
    }

    pub fn luminosity(&self) -> Percent {
        self.luminosity
    }

    /// Set the color temperature in kelvin.
    ///
    /// # Errors
    /// Rejected when the light is non-operational or locked, or the value
    /// is outside the supported window.
    pub fn set_color_temperature(&mut self, _ctx: &mut DeviceCtx, kelvin: u16) -> Result<()> {
        self.core.check_mutable()?;
        if !(MIN_COLOR_TEMP_K..=MAX_COLOR_TEMP_K).contains(&kelvin) {
            return Err(Error::OutOfRange(format!(
                "color temperature {kelvin}K outside {MIN_COLOR_TEMP_K}-{MAX_COLOR_TEMP_K}K"
            ))
            .into());
        }
        self.actuator.apply(LightCommand::ColorTemperature(kelvin))?;
        self.color_temperature = kelvin;
        Ok(())
    }

    /// Set the luminosity percentage.
    ///
    /// # Errors
    /// Rejected when the light is non-operational or locked.
    pub fn set_luminosity(&mut self, _ctx: &mut DeviceCtx, luminosity: Percent) -> Result<()> {
        self.core.check_mutable()?;
        self.actuator.apply(LightCommand::Luminosity(luminosity.as_u8()))?;
        self.luminosity = luminosity;
        Ok(())
    }

    fn set_state(&mut self, ctx: &mut DeviceCtx, on: bool, share: bool) -> Result<()> {
        if !self.core.transition_allowed(on)? {
            return Ok(());
        }
        self.actuator.apply(LightCommand::Power(on))?;
        self.core.commit(on);
        ctx.hub.notify_state(self.core.id(), on);
        if share {
            ctx.panel
                .show_message(&format!("{} {}", self.core.name(), if on { "ON" } else { "OFF" }));
        }
        debug!(device = %self.core.id(), on, "light switched");
        Ok(())
    }
}

impl Identifiable for TemperatureLight {
    fn id(&self) -> DeviceId {
        self.core.id()
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn is_operational(&self) -> bool {
        self.core.is_operational()
    }
}

impl Switchable for TemperatureLight {
    fn is_on(&self) -> bool {
        self.core.is_on()
    }

    fn turn_on(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        self.set_state(ctx, true, share)
    }

    fn turn_off(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        self.set_state(ctx, false, share)
    }
}

impl Lockable for TemperatureLight {
    fn lock(&mut self) {
        self.core.lock();
    }

    fn unlock(&mut self) {
        self.core.unlock();
    }

    fn is_locked(&self) -> bool {
        self.core.is_locked()
    }
}

impl Tickable for TemperatureLight {
    fn tick(&mut self, _ctx: &mut DeviceCtx) -> Result<()> {
        Ok(())
    }
}

/// Full-color light. Composes a [`TemperatureLight`] and adds an RGB
/// channel.
pub struct ColorLight {
    inner: TemperatureLight,
    color: Rgb,
}

impl ColorLight {
    pub fn new(id: DeviceId, name: impl Into<String>, actuator: Box<dyn LightActuator>) -> Self {
        ColorLight {
            inner: TemperatureLight::new(id, name, actuator),
            color: Rgb::new(255, 255, 255),
        }
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// # Errors
    /// Rejected when the light is non-operational or locked.
    pub fn set_color(&mut self, _ctx: &mut DeviceCtx, color: Rgb) -> Result<()> {
        self.inner.core.check_mutable()?;
        self.inner.actuator.apply(LightCommand::Color(color))?;
        self.color = color;
        Ok(())
    }

    /// # Errors
    /// Same contract as [`TemperatureLight::set_color_temperature`].
    pub fn set_color_temperature(&mut self, ctx: &mut DeviceCtx, kelvin: u16) -> Result<()> {
        self.inner.set_color_temperature(ctx, kelvin)
    }

    /// # Errors
    /// Same contract as [`TemperatureLight::set_luminosity`].
    pub fn set_luminosity(&mut self, ctx: &mut DeviceCtx, luminosity: Percent) -> Result<()> {
        self.inner.set_luminosity(ctx, luminosity)
    }
}

impl Identifiable for ColorLight {
    fn id(&self) -> DeviceId {
        self.inner.id()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_operational(&self) -> bool {
        self.inner.is_operational()
    }
}

impl Switchable for ColorLight {
    fn is_on(&self) -> bool {
        self.inner.is_on()
    }

    fn turn_on(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        self.inner.turn_on(ctx, share)
    }

    fn turn_off(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        self.inner.turn_off(ctx, share)
    }
}

impl Lockable for ColorLight {
    fn lock(&mut self) {
        self.inner.lock();
    }

    fn unlock(&mut self) {
        self.inner.unlock();
    }

    fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

impl Tickable for ColorLight {
    fn tick(&mut self, _ctx: &mut DeviceCtx) -> Result<()> {
        Ok(())
    }
}
