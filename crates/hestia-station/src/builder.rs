//! Step-by-step station assembly.

use crate::{
    Result, StationError,
    station::Station,
};
use hestia_alarm::Alarm;
use hestia_core::Clock;
use hestia_device::{DeviceRegistry, OutputDevice};
use hestia_hardware::{HubBridge, Microphone, OperatorPanel, SettingsStore};
use hestia_show::Television;

/// Builder for a [`Station`].
///
/// Output devices are registered as they are added, so duplicate IDs fail
/// at the call site that introduced them rather than at `build`.
#[derive(Default)]
pub struct StationBuilder {
    registry: DeviceRegistry,
    alarm: Option<Alarm>,
    television: Option<Television>,
    hub: Option<Box<dyn HubBridge>>,
    panel: Option<Box<dyn OperatorPanel>>,
    mic: Option<Box<dyn Microphone>>,
    store: Option<Box<dyn SettingsStore>>,
    clock: Option<Box<dyn Clock>>,
}

impl StationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an output device.
    ///
    /// # Errors
    /// Returns `DuplicateDeviceId` when the ID is already taken.
    pub fn device(mut self, device: OutputDevice) -> Result<Self> {
        self.registry.register(device)?;
        Ok(self)
    }

    #[must_use]
    pub fn alarm(mut self, alarm: Alarm) -> Self {
        self.alarm = Some(alarm);
        self
    }

    #[must_use]
    pub fn television(mut self, television: Television) -> Self {
        self.television = Some(television);
        self
    }

    #[must_use]
    pub fn hub(mut self, hub: impl HubBridge + 'static) -> Self {
        self.hub = Some(Box::new(hub));
        self
    }

    #[must_use]
    pub fn panel(mut self, panel: impl OperatorPanel + 'static) -> Self {
        self.panel = Some(Box::new(panel));
        self
    }

    #[must_use]
    pub fn microphone(mut self, mic: impl Microphone + 'static) -> Self {
        self.mic = Some(Box::new(mic));
        self
    }

    #[must_use]
    pub fn store(mut self, store: impl SettingsStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Finalize the station.
    ///
    /// # Errors
    /// `MissingComponent` naming the first absent part.
    pub fn build(self) -> Result<Station> {
        Ok(Station {
            registry: self.registry,
            alarm: self.alarm.ok_or(StationError::MissingComponent("alarm"))?,
            television: self
                .television
                .ok_or(StationError::MissingComponent("television"))?,
            hub: self.hub.ok_or(StationError::MissingComponent("hub bridge"))?,
            panel: self
                .panel
                .ok_or(StationError::MissingComponent("operator panel"))?,
            mic: self.mic.ok_or(StationError::MissingComponent("microphone"))?,
            store: self
                .store
                .ok_or(StationError::MissingComponent("settings store"))?,
            clock: self.clock.ok_or(StationError::MissingComponent("clock"))?,
        })
    }
}
