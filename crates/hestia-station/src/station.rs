//! The assembled control box.
//!
//! `Station` is the application context: it owns the device registry, the
//! alarm, the television and every shared peripheral, and threads a fresh
//! [`DeviceCtx`] into each operation. Nothing below it reaches for a
//! global; everything the firmware can do is a method here.

use crate::{Result, StationError};
use hestia_alarm::Alarm;
use hestia_core::{Clock, DeviceId, Percent, Rgb};
use hestia_device::{
    DeviceCtx, DeviceRegistry, Identifiable, OutputDevice, StripMode, Switchable,
};
use hestia_hardware::{HubBridge, Microphone, OperatorPanel, SettingsStore};
use hestia_show::Television;
use tracing::{info, warn};

/// Health summary assembled once at boot.
#[derive(Debug, Clone)]
pub struct BootReport {
    /// Devices (and components) that failed bring-up, by ID and name.
    pub degraded: Vec<(DeviceId, String)>,
}

impl BootReport {
    pub fn is_healthy(&self) -> bool {
        self.degraded.is_empty()
    }

    /// One line for the panel and the hub's speech channel.
    pub fn summary(&self) -> String {
        if self.degraded.is_empty() {
            return "all devices operational".to_string();
        }
        let names: Vec<&str> = self.degraded.iter().map(|(_, name)| name.as_str()).collect();
        format!("{} device(s) need attention: {}", names.len(), names.join(", "))
    }
}

/// Everything the control box is made of.
pub struct Station {
    pub(crate) registry: DeviceRegistry,
    pub(crate) alarm: Alarm,
    pub(crate) television: Television,
    pub(crate) hub: Box<dyn HubBridge>,
    pub(crate) panel: Box<dyn OperatorPanel>,
    pub(crate) mic: Box<dyn Microphone>,
    pub(crate) store: Box<dyn SettingsStore>,
    pub(crate) clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Station").finish_non_exhaustive()
    }
}

/// Build a [`DeviceCtx`] from the station's peripherals at the current
/// clock instant. A macro instead of a method so the registry, alarm and
/// television stay independently borrowable.
macro_rules! ctx {
    ($self:ident) => {
        DeviceCtx {
            hub: &mut *$self.hub,
            panel: &mut *$self.panel,
            mic: &mut *$self.mic,
            store: &mut *$self.store,
            now_ms: $self.clock.now_ms(),
        }
    };
}

impl Station {
    /// One-time bring-up: initialize the alarm and the television from
    /// persisted state, then surface the boot health report once, as
    /// per-device availability notifications plus a spoken summary when
    /// anything failed.
    pub fn setup(&mut self) -> BootReport {
        let mut ctx = ctx!(self);
        self.alarm.setup(&mut ctx);
        self.television.setup(&mut ctx);

        let report = self.boot_report();
        for device in self.registry.iter() {
            self.hub.notify_availability(device.id(), device.is_operational());
        }
        self.hub
            .notify_availability(self.alarm.id(), self.alarm.is_operational());
        self.hub
            .notify_availability(self.television.id(), self.television.is_operational());
        if !report.is_healthy() {
            self.panel.show_message("CHECK DEVICES");
            self.hub.speak(&report.summary());
        }
        info!(degraded = report.degraded.len(), "station up");
        report
    }

    /// Current health aggregate over the registry, the alarm and the
    /// television.
    pub fn boot_report(&self) -> BootReport {
        let mut degraded = Vec::new();
        for device in self.registry.iter() {
            if !device.is_operational() {
                degraded.push((device.id(), device.name().to_string()));
            }
        }
        if !self.alarm.is_operational() {
            degraded.push((self.alarm.id(), self.alarm.name().to_string()));
        }
        if !self.television.is_operational() {
            degraded.push((self.television.id(), self.television.name().to_string()));
        }
        BootReport { degraded }
    }

    /// Advance the whole box one tick: device animations and timers, the
    /// alarm (badge polling, deterrent, ring auto-off), the show
    /// sequencer. Component failures are logged, never propagated; a
    /// tick must always complete.
    pub fn tick(&mut self) {
        let mut ctx = ctx!(self);
        self.registry.tick_all(&mut ctx);
        if let Err(error) = self.alarm.tick(&mut ctx, &mut self.registry) {
            warn!(%error, "alarm tick failed");
        }
        if let Err(error) = self.television.tick(&mut ctx, &mut self.registry) {
            warn!(%error, "television tick failed");
        }
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn alarm(&self) -> &Alarm {
        &self.alarm
    }

    pub fn television(&self) -> &Television {
        &self.television
    }

    // Output device commands.

    /// # Errors
    /// Unknown IDs and guard violations from the target device.
    pub fn device_on(&mut self, id: DeviceId, share: bool) -> Result<()> {
        let mut ctx = ctx!(self);
        self.registry.require_mut(id)?.turn_on(&mut ctx, share)?;
        Ok(())
    }

    /// # Errors
    /// Unknown IDs and guard violations from the target device.
    pub fn device_off(&mut self, id: DeviceId, share: bool) -> Result<()> {
        let mut ctx = ctx!(self);
        self.registry.require_mut(id)?.turn_off(&mut ctx, share)?;
        Ok(())
    }

    /// # Errors
    /// Unknown IDs and guard violations from the target device.
    pub fn device_toggle(&mut self, id: DeviceId, share: bool) -> Result<()> {
        let mut ctx = ctx!(self);
        self.registry.require_mut(id)?.toggle(&mut ctx, share)?;
        Ok(())
    }

    /// # Errors
    /// Unknown or non-strip IDs, and guard violations.
    pub fn set_strip_mode(&mut self, id: DeviceId, mode: StripMode) -> Result<()> {
        let mut ctx = ctx!(self);
        self.registry.strip_mut(id)?.set_mode(&mut ctx, mode)?;
        Ok(())
    }

    /// # Errors
    /// Unknown or non-strip IDs, and guard violations.
    pub fn set_strip_color(&mut self, id: DeviceId, color: Rgb) -> Result<()> {
        let mut ctx = ctx!(self);
        self.registry.strip_mut(id)?.set_color(&mut ctx, color)?;
        Ok(())
    }

    /// # Errors
    /// Unknown or non-strip IDs, and guard violations.
    pub fn set_rainbow_speed(&mut self, id: DeviceId, speed: Percent) -> Result<()> {
        let mut ctx = ctx!(self);
        self.registry.strip_mut(id)?.set_rainbow_speed(&mut ctx, speed)?;
        Ok(())
    }

    /// # Errors
    /// Unknown or non-strip IDs, and guard violations.
    pub fn set_sound_sensitivity(&mut self, id: DeviceId, sensitivity: Percent) -> Result<()> {
        let mut ctx = ctx!(self);
        self.registry
            .strip_mut(id)?
            .set_sound_sensitivity(&mut ctx, sensitivity)?;
        Ok(())
    }

    /// # Errors
    /// Unknown IDs, non-light targets, out-of-range kelvin, guard
    /// violations.
    pub fn set_color_temperature(&mut self, id: DeviceId, kelvin: u16) -> Result<()> {
        let mut ctx = ctx!(self);
        match self.registry.require_mut(id)? {
            OutputDevice::TemperatureLight(light) => light.set_color_temperature(&mut ctx, kelvin)?,
            OutputDevice::ColorLight(light) => light.set_color_temperature(&mut ctx, kelvin)?,
            device => {
                return Err(not_a(device, "light"));
            }
        }
        Ok(())
    }

    /// # Errors
    /// Unknown IDs, non-light targets, guard violations.
    pub fn set_luminosity(&mut self, id: DeviceId, luminosity: Percent) -> Result<()> {
        let mut ctx = ctx!(self);
        match self.registry.require_mut(id)? {
            OutputDevice::TemperatureLight(light) => light.set_luminosity(&mut ctx, luminosity)?,
            OutputDevice::ColorLight(light) => light.set_luminosity(&mut ctx, luminosity)?,
            device => {
                return Err(not_a(device, "light"));
            }
        }
        Ok(())
    }

    /// # Errors
    /// Unknown IDs, targets without a color channel, guard violations.
    pub fn set_light_color(&mut self, id: DeviceId, color: Rgb) -> Result<()> {
        let mut ctx = ctx!(self);
        match self.registry.require_mut(id)? {
            OutputDevice::ColorLight(light) => light.set_color(&mut ctx, color)?,
            device => {
                return Err(not_a(device, "color light"));
            }
        }
        Ok(())
    }

    // Alarm commands.

    /// # Errors
    /// State machine and device group violations from the alarm.
    pub fn arm(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.alarm.arm(&mut ctx, &mut self.registry)?;
        Ok(())
    }

    /// # Errors
    /// State machine and device group violations from the alarm.
    pub fn disarm(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.alarm.disarm(&mut ctx, &mut self.registry)?;
        Ok(())
    }

    /// Intrusion signal from a door or motion sensor.
    ///
    /// # Errors
    /// Propagates alarm failures; a trigger while disarmed auto-arms
    /// first.
    pub fn trigger_alarm(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.alarm.trigger(&mut ctx, &mut self.registry)?;
        Ok(())
    }

    /// # Errors
    /// Rejected unless the alarm is disarmed and operational.
    pub fn begin_enrollment(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.alarm.begin_enrollment(&mut ctx)?;
        Ok(())
    }

    /// # Errors
    /// Settings store failures.
    pub fn erase_cards(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.alarm.erase_cards(&mut ctx)?;
        Ok(())
    }

    /// # Errors
    /// Settings store failures.
    pub fn set_buzzer_enabled(&mut self, enabled: bool) -> Result<()> {
        let mut ctx = ctx!(self);
        self.alarm.set_buzzer_enabled(&mut ctx, enabled)?;
        Ok(())
    }

    // Television commands.

    /// # Errors
    /// Guard violations and show-in-progress rejections.
    pub fn tv_on(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.television.turn_on(&mut ctx)?;
        Ok(())
    }

    /// # Errors
    /// Guard violations and show-in-progress rejections.
    pub fn tv_off(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.television.turn_off(&mut ctx)?;
        Ok(())
    }

    /// # Errors
    /// Rejected while a show runs, off, muted or at the rail.
    pub fn tv_volume_up(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.television.volume_up(&mut ctx)?;
        Ok(())
    }

    /// # Errors
    /// Rejected while a show runs, off, muted or at the rail.
    pub fn tv_volume_down(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.television.volume_down(&mut ctx)?;
        Ok(())
    }

    /// # Errors
    /// Rejected while a show runs or while the set is off.
    pub fn tv_toggle_mute(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.television.toggle_mute(&mut ctx)?;
        Ok(())
    }

    /// # Errors
    /// Bad indices and unusable device pools; see
    /// [`Television::play_show`].
    pub fn play_show(&mut self, index: usize) -> Result<()> {
        let mut ctx = ctx!(self);
        self.television.play_show(&mut ctx, &mut self.registry, index)?;
        Ok(())
    }

    /// # Errors
    /// None beyond pool shutdown logging; see [`Television::stop_show`].
    pub fn stop_show(&mut self) -> Result<()> {
        let mut ctx = ctx!(self);
        self.television.stop_show(&mut ctx, &mut self.registry)?;
        Ok(())
    }
}

fn not_a(device: &OutputDevice, wanted: &str) -> StationError {
    hestia_core::Error::DeviceNotFound(format!("{} is not a {wanted}", device.id())).into()
}
