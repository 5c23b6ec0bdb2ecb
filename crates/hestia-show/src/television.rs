//! The television and its show sequencer.
//!
//! The television is an IR-controlled output with a volume shadow (the
//! set itself never reports state, so the last accepted level is persisted
//! and assumed) and the owner of the light-show pipeline: it seizes the
//! show's device pool, asks the hub to start the video, waits for the
//! trigger tone and then replays the action script against the registry.

use crate::{
    Result, ShowError,
    action::{Action, DeviceCommand, PowerAction, Show},
    tone::ToneDetector,
};
use hestia_core::{
    DeviceId, Error,
    constants::{
        SHOW_MIN_VOLUME, TONE_DETECTION_BUDGET_TICKS, TONE_DETECTION_LATENCY_MS, VOLUME_MAX,
    },
};
use hestia_device::{
    DeviceCtx, DeviceRegistry, Identifiable, Lockable, OutputCore, OutputDevice, ShowEffectMode,
    StripMode, Switchable,
};
use hestia_hardware::{RemoteCommand, RemoteTransmitter, SettingKey, Tone};
use tracing::{debug, info, warn};

/// Volume assumed for a set that never persisted one.
const DEFAULT_VOLUME: u8 = 10;

/// Where the sequencer currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Idle,
    /// Video requested; listening for the calibration tone that marks
    /// its actual start.
    AwaitingTriggerTone { waited_ticks: u32 },
    /// Tone heard; actions up to `cursor` have been executed.
    Playing { cursor: usize, started_ms: u64 },
}

/// IR-controlled television plus the show sequencer.
pub struct Television {
    core: OutputCore,
    volume: u8,
    muted: bool,
    shows: Vec<Show>,
    playback: Playback,
    active_show: usize,
    remote: Box<dyn RemoteTransmitter>,
    detector: ToneDetector,
}

impl Television {
    pub fn new(id: DeviceId, name: impl Into<String>, remote: Box<dyn RemoteTransmitter>) -> Self {
        Television {
            core: OutputCore::new(id, name),
            volume: DEFAULT_VOLUME,
            muted: false,
            shows: Vec::new(),
            playback: Playback::Idle,
            active_show: 0,
            remote,
            detector: ToneDetector::new(),
        }
    }

    /// Restore the persisted volume shadow.
    pub fn setup(&mut self, ctx: &mut DeviceCtx) {
        if let Some(bytes) = ctx.store.read(SettingKey::TvVolume)
            && let Some(&volume) = bytes.first()
        {
            self.volume = volume.min(VOLUME_MAX);
        }
    }

    pub fn id(&self) -> DeviceId {
        self.core.id()
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn is_operational(&self) -> bool {
        self.core.is_operational()
    }

    pub fn is_on(&self) -> bool {
        self.core.is_on()
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn add_show(&mut self, show: Show) {
        self.shows.push(show);
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    /// Turn the set on.
    ///
    /// # Errors
    /// Rejected while a show is in progress, and subject to the usual
    /// operational and lock guards.
    pub fn turn_on(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        self.set_power(ctx, true)
    }

    /// Turn the set off. Same contract as [`Television::turn_on`].
    ///
    /// # Errors
    /// See [`Television::turn_on`].
    pub fn turn_off(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        self.set_power(ctx, false)
    }

    fn set_power(&mut self, ctx: &mut DeviceCtx, on: bool) -> Result<()> {
        if self.playback != Playback::Idle {
            return Err(self.reject(ctx, "show in progress"));
        }
        self.force_power(ctx, on)
    }

    /// IR power toggle without the show guard. Redundant commands are a
    /// silent no-op so the shadow state never desyncs from a double-press.
    fn force_power(&mut self, ctx: &mut DeviceCtx, on: bool) -> Result<()> {
        if !self.core.transition_allowed(on)? {
            return Ok(());
        }
        self.remote.send(RemoteCommand::Power)?;
        self.core.commit(on);
        ctx.hub.notify_state(self.core.id(), on);
        debug!(tv = self.core.name(), on, "television power");
        Ok(())
    }

    fn reject(&self, ctx: &mut DeviceCtx, reason: &str) -> ShowError {
        ctx.panel.play_tone(Tone::Error);
        ctx.panel.show_message(&reason.to_uppercase());
        ShowError::Rejected(reason.to_string())
    }

    /// Raise the volume one step.
    ///
    /// # Errors
    /// Rejected while a show runs, while the set is off or muted, and at
    /// the top rail.
    pub fn volume_up(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        self.adjust_volume(ctx, 1)
    }

    /// Lower the volume one step. Same rejection rules as
    /// [`Television::volume_up`], with the bottom rail instead.
    ///
    /// # Errors
    /// See [`Television::volume_up`].
    pub fn volume_down(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        self.adjust_volume(ctx, -1)
    }

    fn adjust_volume(&mut self, ctx: &mut DeviceCtx, delta: i8) -> Result<()> {
        self.core.check_mutable()?;
        let reason = if self.playback != Playback::Idle {
            Some("show in progress")
        } else if !self.core.is_on() {
            Some("television is off")
        } else if self.muted {
            Some("television is muted")
        } else if delta > 0 && self.volume >= VOLUME_MAX {
            Some("volume at maximum")
        } else if delta < 0 && self.volume == 0 {
            Some("volume at minimum")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(self.reject(ctx, reason));
        }

        self.remote.send(if delta > 0 {
            RemoteCommand::VolumeUp
        } else {
            RemoteCommand::VolumeDown
        })?;
        self.volume = self.volume.saturating_add_signed(delta);
        self.persist_volume(ctx)?;
        ctx.hub.notify_volume(self.core.id(), self.volume, self.muted);
        Ok(())
    }

    /// Flip mute.
    ///
    /// # Errors
    /// Rejected while a show runs or while the set is off.
    pub fn toggle_mute(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        self.core.check_mutable()?;
        let reason = if self.playback != Playback::Idle {
            Some("show in progress")
        } else if !self.core.is_on() {
            Some("television is off")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(self.reject(ctx, reason));
        }

        self.remote.send(RemoteCommand::Mute)?;
        self.muted = !self.muted;
        ctx.hub.notify_volume(self.core.id(), self.volume, self.muted);
        Ok(())
    }

    fn persist_volume(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        ctx.store.write(SettingKey::TvVolume, &[self.volume])?;
        Ok(())
    }

    /// Start the show registered at `index`.
    ///
    /// All preconditions are checked before anything is touched: the
    /// television must be free, and every device in the show's pool must
    /// exist, be operational and be unlocked. On success the whole pool
    /// is forced off and locked, the set is powered and unmuted with the
    /// volume ramped to the show minimum, and video playback is requested
    /// from the hub.
    ///
    /// # Errors
    /// `UnknownShow` for a bad index; registry and guard errors for an
    /// unusable pool; `Rejected` when a show is already in progress.
    pub fn play_show(
        &mut self,
        ctx: &mut DeviceCtx,
        registry: &mut DeviceRegistry,
        index: usize,
    ) -> Result<()> {
        self.core.check_mutable()?;
        if self.playback != Playback::Idle {
            return Err(self.reject(ctx, "show already in progress"));
        }
        let show = self.shows.get(index).ok_or(ShowError::UnknownShow(index))?;
        let pool: Vec<DeviceId> = show.pool().to_vec();
        let url = show.video_url().to_string();
        let name = show.name().to_string();

        for &id in &pool {
            let device = registry
                .get(id)
                .ok_or_else(|| Error::DeviceNotFound(id.to_string()))?;
            if !device.is_operational() {
                return Err(Error::NotOperational(device.name().to_string()).into());
            }
            if device.is_locked() {
                return Err(Error::Locked(device.name().to_string()).into());
            }
        }

        // Seize the pool in a known state: everything off, then locked.
        for &id in &pool {
            let device = registry.require_mut(id)?;
            device.turn_off(ctx, false)?;
            device.lock();
        }

        self.force_power(ctx, true)?;
        let before = (self.volume, self.muted);
        if self.muted {
            self.remote.send(RemoteCommand::Mute)?;
            self.muted = false;
        }
        while self.volume < SHOW_MIN_VOLUME {
            self.remote.send(RemoteCommand::VolumeUp)?;
            self.volume += 1;
        }
        if (self.volume, self.muted) != before {
            self.persist_volume(ctx)?;
            ctx.hub.notify_volume(self.core.id(), self.volume, self.muted);
        }

        ctx.hub.request_playback(&url);
        self.active_show = index;
        self.playback = Playback::AwaitingTriggerTone { waited_ticks: 0 };
        info!(show = %name, "show starting, waiting for trigger tone");
        Ok(())
    }

    /// Abort or finish the current show, releasing and darkening the
    /// device pool. A no-op when nothing is running.
    ///
    /// # Errors
    /// None currently; kept fallible to match the other mutators.
    pub fn stop_show(&mut self, ctx: &mut DeviceCtx, registry: &mut DeviceRegistry) -> Result<()> {
        if self.playback == Playback::Idle {
            return Ok(());
        }
        self.release_pool(ctx, registry);
        self.playback = Playback::Idle;
        info!("show stopped");
        Ok(())
    }

    fn release_pool(&mut self, ctx: &mut DeviceCtx, registry: &mut DeviceRegistry) {
        let Some(show) = self.shows.get(self.active_show) else {
            return;
        };
        for &id in &show.pool().to_vec() {
            let Some(device) = registry.get_mut(id) else {
                continue;
            };
            device.unlock();
            if let Err(error) = device.turn_off(ctx, false) {
                warn!(device = %id, %error, "pool device refused shutdown");
            }
        }
    }

    /// Advance the sequencer one tick.
    ///
    /// # Errors
    /// None beyond what [`Television::stop_show`] can return; individual
    /// action failures are logged and skipped so one dead device cannot
    /// stall the show.
    pub fn tick(&mut self, ctx: &mut DeviceCtx, registry: &mut DeviceRegistry) -> Result<()> {
        match self.playback {
            Playback::Idle => Ok(()),
            Playback::AwaitingTriggerTone { waited_ticks } => {
                if self.detector.listen(ctx.mic) {
                    // Detection spans more than a window; back-date the
                    // start so timecodes line up with the video.
                    let started_ms = ctx.now_ms.saturating_sub(TONE_DETECTION_LATENCY_MS);
                    self.playback = Playback::Playing {
                        cursor: 0,
                        started_ms,
                    };
                    info!(started_ms, "trigger tone heard, show running");
                    Ok(())
                } else if waited_ticks + 1 >= TONE_DETECTION_BUDGET_TICKS {
                    warn!("trigger tone never heard, abandoning show");
                    self.stop_show(ctx, registry)
                } else {
                    self.playback = Playback::AwaitingTriggerTone {
                        waited_ticks: waited_ticks + 1,
                    };
                    Ok(())
                }
            }
            Playback::Playing { mut cursor, started_ms } => {
                let elapsed = ctx.now_ms.saturating_sub(started_ms);
                let total = self
                    .shows
                    .get(self.active_show)
                    .map_or(0, |show| show.actions().len());
                while cursor < total {
                    let due = self
                        .shows
                        .get(self.active_show)
                        .and_then(|show| show.actions().get(cursor));
                    let action = match due {
                        Some(action) if action.timecode_ms <= elapsed => action.clone(),
                        _ => break,
                    };
                    execute_action(ctx, registry, &action);
                    cursor += 1;
                }
                if cursor >= total {
                    // The last action ends the show.
                    self.stop_show(ctx, registry)
                } else {
                    self.playback = Playback::Playing { cursor, started_ms };
                    Ok(())
                }
            }
        }
    }
}

/// Run one scripted action against its locked pool device: unlock, apply,
/// relock. Failures are logged, never propagated.
fn execute_action(ctx: &mut DeviceCtx, registry: &mut DeviceRegistry, action: &Action) {
    let Some(device) = registry.get_mut(action.device) else {
        warn!(device = %action.device, "show action targets an unknown device, skipped");
        return;
    };
    device.unlock();
    let result = apply_command(ctx, device, &action.command);
    device.lock();
    if let Err(error) = result {
        warn!(device = %action.device, %error, "show action failed, skipped");
    }
}

fn apply_command(
    ctx: &mut DeviceCtx,
    device: &mut OutputDevice,
    command: &DeviceCommand,
) -> Result<()> {
    match command {
        DeviceCommand::Power(action) => match action {
            PowerAction::Off => device.turn_off(ctx, false)?,
            PowerAction::On => device.turn_on(ctx, false)?,
            PowerAction::Toggle => device.toggle(ctx, false)?,
        },
        DeviceCommand::StripEffect(effect) => {
            let strip = device
                .as_strip_mut()
                .ok_or_else(|| mismatch("strip effect"))?;
            if matches!(strip.mode(), StripMode::Show(_)) {
                strip.apply_show_effect(ctx, effect.clone())?;
            } else {
                strip.set_mode(ctx, StripMode::Show(ShowEffectMode::new(effect.clone())))?;
            }
        }
        DeviceCommand::ColorTemperature(kelvin) => match device {
            OutputDevice::TemperatureLight(light) => light.set_color_temperature(ctx, *kelvin)?,
            OutputDevice::ColorLight(light) => light.set_color_temperature(ctx, *kelvin)?,
            _ => return Err(mismatch("color temperature")),
        },
        DeviceCommand::Luminosity(luminosity) => match device {
            OutputDevice::TemperatureLight(light) => light.set_luminosity(ctx, *luminosity)?,
            OutputDevice::ColorLight(light) => light.set_luminosity(ctx, *luminosity)?,
            _ => return Err(mismatch("luminosity")),
        },
        DeviceCommand::LightColor(color) => match device {
            OutputDevice::ColorLight(light) => light.set_color(ctx, *color)?,
            _ => return Err(mismatch("light color")),
        },
    }
    Ok(())
}

fn mismatch(what: &str) -> ShowError {
    Error::InvalidCommandFormat(format!("target device cannot run a {what} command")).into()
}
