//! The intrusion alarm component.

use crate::{
    AlarmError, Result,
    cards::CardStore,
    deterrent::Deterrent,
    state::AlarmState,
};
use hestia_core::{
    CardUid, DeviceId, Error,
    constants::{ALARM_AUTO_OFF_MS, CARD_POLL_INTERVAL_MS},
};
use hestia_device::{AlarmBlink, DeviceCtx, DeviceRegistry, Identifiable, Lockable, StripMode, Switchable};
use hestia_hardware::{NfcReader, SettingKey, Tone};
use tracing::{debug, info, warn};

/// Operator panel texts.
mod messages {
    pub const PRESENT_BADGE: &str = "PRESENT BADGE";
    pub const CARD_ENROLLED: &str = "CARD ENROLLED";
    pub const CARD_KNOWN: &str = "CARD ALREADY KNOWN";
    pub const ENROLLMENT_DENIED: &str = "DISARM FIRST";
    pub const TRIGGERED: &str = "!! ALARM !!";
}

/// IDs of the devices the alarm drives as a group.
#[derive(Debug, Clone, Copy)]
pub struct AlarmDevices {
    /// Steady indicator near the door while armed.
    pub door_led: DeviceId,
    /// Rotating beacon, on while ringing.
    pub beacon: DeviceId,
    /// RGB strip, blinks red while ringing.
    pub strip: DeviceId,
    /// Siren relay, driven only when the buzzer is enabled.
    pub siren: DeviceId,
}

impl AlarmDevices {
    fn group(&self) -> [DeviceId; 3] {
        [self.door_led, self.beacon, self.strip]
    }
}

/// The alarm. Owns the NFC reader, the credential store and the
/// deterrent; drives its device group through the registry.
pub struct Alarm {
    id: DeviceId,
    name: String,
    operational: bool,
    locked: bool,
    state: AlarmState,
    devices: AlarmDevices,
    nfc: Box<dyn NfcReader>,
    cards: CardStore,
    deterrent: Deterrent,
    buzzer_enabled: bool,
    remembered_mode: Option<StripMode>,
    ring_deadline_ms: Option<u64>,
    last_poll_ms: u64,
}

impl Alarm {
    pub fn new(
        id: DeviceId,
        name: impl Into<String>,
        devices: AlarmDevices,
        nfc: Box<dyn NfcReader>,
        deterrent: Deterrent,
    ) -> Self {
        Alarm {
            id,
            name: name.into(),
            operational: true,
            locked: false,
            state: AlarmState::Disarmed,
            devices,
            nfc,
            cards: CardStore::default(),
            deterrent,
            buzzer_enabled: true,
            remembered_mode: None,
            ring_deadline_ms: None,
            last_poll_ms: 0,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    pub fn is_buzzer_enabled(&self) -> bool {
        self.buzzer_enabled
    }

    pub fn card_count(&self) -> usize {
        self.cards.count()
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// One-time initialization: NFC chip bring-up plus persisted state.
    ///
    /// An NFC failure leaves the alarm permanently non-operational for
    /// this process lifetime; there is no runtime retry.
    pub fn setup(&mut self, ctx: &mut DeviceCtx) {
        if let Err(error) = self.nfc.setup() {
            warn!(%error, "NFC setup failed, alarm stays non-operational");
            self.operational = false;
        }
        self.cards = CardStore::load(&*ctx.store);
        self.buzzer_enabled = ctx
            .store
            .read(SettingKey::BuzzerEnabled)
            .map_or(true, |block| block.first().copied() != Some(0));
        info!(
            cards = self.cards.count(),
            buzzer = self.buzzer_enabled,
            operational = self.operational,
            "alarm initialized"
        );
    }

    /// Enable or disable the siren, persisted update-if-changed.
    ///
    /// # Errors
    /// Propagates settings-store write failures.
    pub fn set_buzzer_enabled(&mut self, ctx: &mut DeviceCtx, enabled: bool) -> Result<()> {
        self.buzzer_enabled = enabled;
        ctx.store.write(SettingKey::BuzzerEnabled, &[u8::from(enabled)])?;
        Ok(())
    }

    fn check_mutable(&self) -> Result<()> {
        if !self.operational {
            return Err(Error::NotOperational(self.name.clone()).into());
        }
        if self.locked {
            return Err(Error::Locked(self.name.clone()).into());
        }
        Ok(())
    }

    fn transition(&mut self, to: AlarmState) -> Result<()> {
        if !self.state.can_transition_to(to) {
            return Err(AlarmError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        info!(from = %self.state, %to, "alarm transition");
        self.state = to;
        Ok(())
    }

    /// Arm the alarm.
    ///
    /// Remembers the strip's current mode, lights the door LED, forces
    /// the beacon and strip off and locks all three for exclusive use.
    ///
    /// # Errors
    /// Rejected when the alarm is non-operational or locked, not
    /// disarmed, or any group device is already locked by someone else.
    pub fn arm(&mut self, ctx: &mut DeviceCtx, registry: &mut DeviceRegistry) -> Result<()> {
        self.check_mutable()?;
        if self.state != AlarmState::Disarmed {
            return Err(AlarmError::InvalidTransition {
                from: self.state,
                to: AlarmState::Armed,
            });
        }
        for id in self.devices.group() {
            let device = registry.require_mut(id)?;
            if device.is_locked() {
                return Err(Error::Locked(device.name().to_string()).into());
            }
        }

        self.remembered_mode = Some(registry.strip_mut(self.devices.strip)?.mode().clone());

        registry.require_mut(self.devices.door_led)?.turn_on(ctx, false)?;
        registry.require_mut(self.devices.beacon)?.turn_off(ctx, false)?;
        registry.require_mut(self.devices.strip)?.turn_off(ctx, false)?;
        for id in self.devices.group() {
            registry.require_mut(id)?.lock();
        }

        self.transition(AlarmState::Armed)?;
        ctx.hub.notify_state(self.id, true);
        Ok(())
    }

    /// Disarm the alarm, stopping the ring first when necessary and
    /// restoring the strip's remembered mode.
    ///
    /// # Errors
    /// Rejected when the alarm is non-operational or locked, or not
    /// currently armed.
    pub fn disarm(&mut self, ctx: &mut DeviceCtx, registry: &mut DeviceRegistry) -> Result<()> {
        self.check_mutable()?;
        if !self.state.is_armed() {
            return Err(AlarmError::InvalidTransition {
                from: self.state,
                to: AlarmState::Disarmed,
            });
        }
        self.stop_ringing(ctx, registry)?;

        for id in self.devices.group() {
            registry.require_mut(id)?.unlock();
        }
        if let Some(mode) = self.remembered_mode.take() {
            registry.strip_mut(self.devices.strip)?.set_mode(ctx, mode)?;
        }
        registry.require_mut(self.devices.door_led)?.turn_off(ctx, false)?;

        self.transition(AlarmState::Disarmed)?;
        ctx.hub.notify_state(self.id, false);
        Ok(())
    }

    /// Handle a trigger (door sensor, motion, manual).
    ///
    /// While ringing this only pushes the auto-off deadline out; effects
    /// are never restarted. A trigger while disarmed auto-arms first and
    /// aborts if arming fails.
    ///
    /// # Errors
    /// Rejected when the alarm cannot reach the ringing state.
    pub fn trigger(&mut self, ctx: &mut DeviceCtx, registry: &mut DeviceRegistry) -> Result<()> {
        let now = ctx.now_ms;
        if self.state == AlarmState::Ringing {
            self.ring_deadline_ms = Some(now + ALARM_AUTO_OFF_MS);
            debug!("ring deadline extended");
            return Ok(());
        }
        self.check_mutable()?;
        if self.state == AlarmState::Disarmed {
            self.arm(ctx, registry)?;
        }
        if self.state != AlarmState::Armed {
            return Err(AlarmError::InvalidTransition {
                from: self.state,
                to: AlarmState::Ringing,
            });
        }

        if self.buzzer_enabled {
            registry.require_mut(self.devices.siren)?.turn_on(ctx, false)?;
        }
        {
            let beacon = registry.require_mut(self.devices.beacon)?;
            beacon.unlock();
            beacon.turn_on(ctx, false)?;
            beacon.lock();
        }
        {
            let strip = registry.strip_mut(self.devices.strip)?;
            strip.unlock();
            strip.set_mode(ctx, StripMode::AlarmBlink(AlarmBlink::new()))?;
            strip.turn_on(ctx, false)?;
            strip.lock();
        }

        self.transition(AlarmState::Ringing)?;
        self.ring_deadline_ms = Some(now + ALARM_AUTO_OFF_MS);
        ctx.panel.show_message(messages::TRIGGERED);
        ctx.hub.notify_alarm(self.id, true);
        ctx.hub.speak("Intrusion detected");
        if let Err(error) = self.deterrent.engage(now) {
            warn!(%error, "deterrent engage failed");
        }
        Ok(())
    }

    /// Silence a ringing alarm and return to `Armed`. No-op otherwise.
    ///
    /// # Errors
    /// Propagates group-device failures.
    pub fn stop_ringing(
        &mut self,
        ctx: &mut DeviceCtx,
        registry: &mut DeviceRegistry,
    ) -> Result<()> {
        if self.state != AlarmState::Ringing {
            return Ok(());
        }
        if self.buzzer_enabled {
            registry.require_mut(self.devices.siren)?.turn_off(ctx, false)?;
        }
        {
            let beacon = registry.require_mut(self.devices.beacon)?;
            beacon.unlock();
            beacon.turn_off(ctx, false)?;
            beacon.lock();
        }
        {
            let strip = registry.strip_mut(self.devices.strip)?;
            strip.unlock();
            strip.turn_off(ctx, false)?;
            strip.lock();
        }

        self.transition(AlarmState::Armed)?;
        self.ring_deadline_ms = None;
        ctx.hub.notify_alarm(self.id, false);
        Ok(())
    }

    /// Enter enrollment mode and prompt for a badge.
    ///
    /// # Errors
    /// Rejected (with panel feedback) unless the alarm is operational,
    /// unlocked and disarmed.
    pub fn begin_enrollment(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        if let Err(error) = self.check_mutable() {
            ctx.panel.play_tone(Tone::Error);
            ctx.panel.show_message(messages::ENROLLMENT_DENIED);
            return Err(error);
        }
        if self.state != AlarmState::Disarmed {
            ctx.panel.play_tone(Tone::Error);
            ctx.panel.show_message(messages::ENROLLMENT_DENIED);
            return Err(AlarmError::InvalidTransition {
                from: self.state,
                to: AlarmState::Enrollment,
            });
        }
        self.transition(AlarmState::Enrollment)?;
        ctx.panel.show_message(messages::PRESENT_BADGE);
        Ok(())
    }

    /// Erase every enrolled card. Irreversible.
    ///
    /// # Errors
    /// Propagates settings-store write failures.
    pub fn erase_cards(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        self.cards.erase_all(&mut *ctx.store)
    }

    /// Advance the alarm: poll the badge reader at roughly 1 Hz, advance
    /// the deterrent, auto-stop an expired ring.
    ///
    /// # Errors
    /// Propagates group-device failures from the auto-stop path.
    pub fn tick(&mut self, ctx: &mut DeviceCtx, registry: &mut DeviceRegistry) -> Result<()> {
        let now = ctx.now_ms;

        if self.operational && now.saturating_sub(self.last_poll_ms) >= CARD_POLL_INTERVAL_MS {
            self.last_poll_ms = now;
            match self.nfc.poll_card() {
                Ok(Some(uid)) => self.handle_card(ctx, registry, uid)?,
                Ok(None) => {}
                Err(error) => warn!(%error, "NFC poll failed"),
            }
        }

        if let Err(error) = self.deterrent.tick(now) {
            warn!(%error, "deterrent tick failed");
        }

        if self.state == AlarmState::Ringing && self.ring_deadline_ms.is_some_and(|d| now >= d) {
            info!("ring deadline reached, auto-stopping");
            self.stop_ringing(ctx, registry)?;
        }
        Ok(())
    }

    fn handle_card(
        &mut self,
        ctx: &mut DeviceCtx,
        registry: &mut DeviceRegistry,
        uid: CardUid,
    ) -> Result<()> {
        if self.state == AlarmState::Enrollment {
            match self.cards.enroll(&mut *ctx.store, uid) {
                Ok(()) => {
                    ctx.panel.play_tone(Tone::Confirm);
                    ctx.panel.show_message(messages::CARD_ENROLLED);
                }
                Err(AlarmError::Core(Error::DuplicateCard(_))) => {
                    ctx.panel.play_tone(Tone::Error);
                    ctx.panel.show_message(messages::CARD_KNOWN);
                }
                Err(error) => return Err(error),
            }
            // Enrollment exits in both the success and duplicate cases.
            self.transition(AlarmState::Disarmed)?;
            return Ok(());
        }

        if self.cards.contains(uid) {
            ctx.panel.play_tone(Tone::Confirm);
            match self.state {
                AlarmState::Ringing => self.stop_ringing(ctx, registry)?,
                AlarmState::Armed => self.disarm(ctx, registry)?,
                AlarmState::Disarmed => self.arm(ctx, registry)?,
                AlarmState::Enrollment => {}
            }
        } else {
            warn!(card = %uid, "unknown card presented");
            ctx.panel.play_tone(Tone::Error);
        }
        Ok(())
    }
}
