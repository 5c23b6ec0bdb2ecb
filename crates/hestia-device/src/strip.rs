//! The RGB strip device.

use crate::{
    Result,
    capability::{Identifiable, Lockable, Switchable, Tickable},
    context::DeviceCtx,
    mode::{ShowEffect, StripMode, StripSink},
    output::OutputCore,
};
use hestia_core::{DeviceId, Percent, Rgb};
use hestia_hardware::StripActuator;
use tracing::{debug, warn};

/// Addressable strip with one active animation mode.
///
/// The strip owns its current color: modes write frames through a
/// [`StripSink`] so the logical color always matches the wire. While the
/// strip is off, and right after any mode deactivation, the color is
/// guaranteed to be `(0, 0, 0)`.
pub struct RgbStrip {
    core: OutputCore,
    color: Rgb,
    mode: StripMode,
    actuator: Box<dyn StripActuator>,
}

impl RgbStrip {
    pub fn new(
        id: DeviceId,
        name: impl Into<String>,
        mode: StripMode,
        actuator: Box<dyn StripActuator>,
    ) -> Self {
        RgbStrip {
            core: OutputCore::new(id, name),
            color: Rgb::OFF,
            mode,
            actuator,
        }
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn mode(&self) -> &StripMode {
        &self.mode
    }

    /// Replace the active mode.
    ///
    /// Assigning a mode of the same kind is a no-op. Otherwise the old
    /// mode is deactivated (the strip goes dark) before the new one is
    /// assigned; if the strip is on, the new mode pushes its initial
    /// color and the hub is told about the change.
    ///
    /// # Errors
    /// Rejected when the strip is non-operational or locked.
    pub fn set_mode(&mut self, ctx: &mut DeviceCtx, mode: StripMode) -> Result<()> {
        self.core.check_mutable()?;
        if self.mode.kind() == mode.kind() {
            return Ok(());
        }
        let mut sink = StripSink::new(self.actuator.as_mut(), &mut self.color);
        self.mode.deactivate(&mut sink)?;
        self.mode = mode;
        if self.core.is_on() {
            self.mode.activate(&mut sink, ctx.now_ms)?;
            ctx.hub
                .notify_strip(self.core.id(), self.mode.kind(), self.color);
        }
        debug!(device = %self.core.id(), mode = %self.mode.kind(), "strip mode assigned");
        Ok(())
    }

    /// Set the color held by the static color mode.
    ///
    /// Only meaningful in color mode: there the new color is written
    /// through (when the strip is on) and reported to the hub. In any
    /// animation mode the command is ignored with a warning.
    ///
    /// # Errors
    /// Rejected when the strip is non-operational or locked.
    pub fn set_color(&mut self, ctx: &mut DeviceCtx, color: Rgb) -> Result<()> {
        self.core.check_mutable()?;
        match &mut self.mode {
            StripMode::Color(mode) => {
                if self.core.is_on() {
                    let mut sink = StripSink::new(self.actuator.as_mut(), &mut self.color);
                    mode.set_color(color, Some(&mut sink))?;
                    ctx.hub
                        .notify_strip(self.core.id(), self.mode.kind(), self.color);
                } else {
                    mode.set_color(color, None)?;
                }
                Ok(())
            }
            _ => {
                warn!(device = %self.core.id(), mode = %self.mode.kind(), "set_color ignored outside color mode");
                Ok(())
            }
        }
    }

    /// Forward a sequencer effect to the show mode.
    ///
    /// Ignored with a warning when the strip is not in show-effect mode.
    ///
    /// # Errors
    /// Rejected when the strip is non-operational; the sequencer unlocks
    /// its targets around each command, so lock checks happen upstream.
    pub fn apply_show_effect(&mut self, ctx: &mut DeviceCtx, effect: ShowEffect) -> Result<()> {
        self.core.check_mutable()?;
        match &mut self.mode {
            StripMode::Show(mode) => {
                let mut sink = StripSink::new(self.actuator.as_mut(), &mut self.color);
                mode.set_effect(&mut sink, ctx.now_ms, effect)
            }
            _ => {
                warn!(device = %self.core.id(), mode = %self.mode.kind(), "show effect ignored outside show mode");
                Ok(())
            }
        }
    }

    /// Change the rainbow speed. Ignored outside rainbow mode.
    ///
    /// # Errors
    /// Rejected when the strip is non-operational or locked.
    pub fn set_rainbow_speed(&mut self, ctx: &mut DeviceCtx, speed: Percent) -> Result<()> {
        self.core.check_mutable()?;
        if let StripMode::Rainbow(mode) = &mut self.mode {
            mode.set_speed(ctx, speed)?;
        } else {
            warn!(device = %self.core.id(), "rainbow speed ignored outside rainbow mode");
        }
        Ok(())
    }

    /// Change the sound-react sensitivity. Ignored outside that mode.
    ///
    /// # Errors
    /// Rejected when the strip is non-operational or locked.
    pub fn set_sound_sensitivity(&mut self, ctx: &mut DeviceCtx, sensitivity: Percent) -> Result<()> {
        self.core.check_mutable()?;
        if let StripMode::Soundreact(mode) = &mut self.mode {
            mode.set_sensitivity(ctx, sensitivity)?;
        } else {
            warn!(device = %self.core.id(), "sound sensitivity ignored outside sound-react mode");
        }
        Ok(())
    }
}

impl Identifiable for RgbStrip {
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

impl Switchable for RgbStrip {
    fn is_on(&self) -> bool {
        self.core.is_on()
    }

    fn turn_on(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        if !self.core.transition_allowed(true)? {
            return Ok(());
        }
        let mut sink = StripSink::new(self.actuator.as_mut(), &mut self.color);
        self.mode.activate(&mut sink, ctx.now_ms)?;
        self.core.commit(true);
        ctx.hub.notify_state(self.core.id(), true);
        if share {
            ctx.panel
                .show_message(&format!("{} ON", self.core.name()));
        }
        debug!(device = %self.core.id(), "strip on");
        Ok(())
    }

    fn turn_off(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        if !self.core.transition_allowed(false)? {
            return Ok(());
        }
        let mut sink = StripSink::new(self.actuator.as_mut(), &mut self.color);
        self.mode.deactivate(&mut sink)?;
        self.core.commit(false);
        ctx.hub.notify_state(self.core.id(), false);
        if share {
            ctx.panel
                .show_message(&format!("{} OFF", self.core.name()));
        }
        debug!(device = %self.core.id(), "strip off");
        Ok(())
    }
}

impl Lockable for RgbStrip {
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

impl Tickable for RgbStrip {
    fn tick(&mut self, ctx: &mut DeviceCtx) -> Result<()> {
        if !self.core.is_on() {
            return Ok(());
        }
        let mut sink = StripSink::new(self.actuator.as_mut(), &mut self.color);
        self.mode.tick(ctx, &mut sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{ColorMode, RainbowMode};
    use hestia_core::StripModeKind;
    use hestia_hardware::{
        HubEvent,
        mock::{MemoryStore, MockPanel, MockStrip, RecordingHub, ScriptedMic},
    };

    struct Rig {
        hub: RecordingHub,
        hub_handle: hestia_hardware::mock::RecordingHubHandle,
        panel: MockPanel,
        mic: ScriptedMic,
        store: MemoryStore,
    }

    impl Rig {
        fn new() -> Self {
            let (hub, hub_handle) = RecordingHub::new();
            let (panel, _) = MockPanel::new();
            let (mic, _) = ScriptedMic::new(0);
            let (store, _) = MemoryStore::new();
            Rig {
                hub,
                hub_handle,
                panel,
                mic,
                store,
            }
        }

        fn ctx(&mut self, now_ms: u64) -> DeviceCtx<'_> {
            DeviceCtx {
                hub: &mut self.hub,
                panel: &mut self.panel,
                mic: &mut self.mic,
                store: &mut self.store,
                now_ms,
            }
        }
    }

    fn strip(mode: StripMode) -> (RgbStrip, hestia_hardware::mock::MockStripHandle) {
        let (actuator, handle) = MockStrip::new();
        let strip = RgbStrip::new(
            DeviceId::new(40).unwrap(),
            "tv strip",
            mode,
            Box::new(actuator),
        );
        (strip, handle)
    }

    #[test]
    fn off_strip_is_dark() {
        let mut rig = Rig::new();
        let (mut strip, handle) = strip(StripMode::Color(ColorMode::new(Rgb::new(10, 200, 30))));

        strip.turn_on(&mut rig.ctx(0), false).unwrap();
        assert_eq!(handle.current(), Rgb::new(10, 200, 30));

        strip.turn_off(&mut rig.ctx(100), false).unwrap();
        assert_eq!(handle.current(), Rgb::OFF);
        assert_eq!(strip.color(), Rgb::OFF);
    }

    #[test]
    fn same_kind_mode_assignment_is_a_no_op() {
        let mut rig = Rig::new();
        let (mut strip, handle) = strip(StripMode::Color(ColorMode::new(Rgb::new(1, 2, 3))));
        strip.turn_on(&mut rig.ctx(0), false).unwrap();
        let writes = handle.write_count();

        strip
            .set_mode(&mut rig.ctx(10), StripMode::Color(ColorMode::new(Rgb::RED)))
            .unwrap();
        assert_eq!(handle.write_count(), writes);
        // Held color untouched.
        assert_eq!(strip.color(), Rgb::new(1, 2, 3));
    }

    #[test]
    fn mode_change_goes_dark_then_activates() {
        let mut rig = Rig::new();
        let (mut strip, handle) = strip(StripMode::Color(ColorMode::new(Rgb::new(9, 9, 9))));
        strip.turn_on(&mut rig.ctx(0), false).unwrap();

        strip
            .set_mode(
                &mut rig.ctx(10),
                StripMode::Rainbow(RainbowMode::new(Percent::new(50))),
            )
            .unwrap();

        let history = handle.history();
        // on -> dark during the swap -> rainbow's first frame
        assert_eq!(history[history.len() - 2], Rgb::OFF);
        assert_eq!(history[history.len() - 1], Rgb::new(255, 0, 0));
        assert!(matches!(
            rig.hub_handle.last_event(),
            Some(HubEvent::Strip {
                mode: StripModeKind::Rainbow,
                ..
            })
        ));
    }

    #[test]
    fn mode_change_while_off_stays_dark() {
        let mut rig = Rig::new();
        let (mut strip, handle) = strip(StripMode::Color(ColorMode::new(Rgb::new(9, 9, 9))));

        strip
            .set_mode(
                &mut rig.ctx(0),
                StripMode::Rainbow(RainbowMode::new(Percent::new(10))),
            )
            .unwrap();
        assert_eq!(handle.current(), Rgb::OFF);
        assert!(!strip.is_on());
        // No activation, so no hub strip report either.
        assert!(rig.hub_handle.events().iter().all(|e| !matches!(e, HubEvent::Strip { .. })));
    }

    #[test]
    fn set_color_reports_to_hub_while_on() {
        let mut rig = Rig::new();
        let (mut strip, handle) = strip(StripMode::Color(ColorMode::new(Rgb::OFF)));
        strip.turn_on(&mut rig.ctx(0), false).unwrap();

        strip.set_color(&mut rig.ctx(10), Rgb::new(0, 0, 255)).unwrap();
        assert_eq!(handle.current(), Rgb::new(0, 0, 255));
        assert_eq!(
            rig.hub_handle.last_event(),
            Some(HubEvent::Strip {
                id: strip.id(),
                mode: StripModeKind::Color,
                color: Rgb::new(0, 0, 255)
            })
        );
    }

    #[test]
    fn locked_strip_rejects_mode_and_color_changes() {
        let mut rig = Rig::new();
        let (mut strip, _handle) = strip(StripMode::Color(ColorMode::new(Rgb::OFF)));
        strip.lock();

        assert!(strip.set_color(&mut rig.ctx(0), Rgb::RED).is_err());
        assert!(strip
            .set_mode(
                &mut rig.ctx(0),
                StripMode::Rainbow(RainbowMode::new(Percent::new(0)))
            )
            .is_err());
    }

    #[test]
    fn tick_only_animates_while_on() {
        let mut rig = Rig::new();
        let (mut strip, handle) =
            strip(StripMode::Rainbow(RainbowMode::new(Percent::new(100))));

        strip.tick(&mut rig.ctx(1_000)).unwrap();
        assert_eq!(handle.write_count(), 0);

        strip.turn_on(&mut rig.ctx(1_000), false).unwrap();
        strip.tick(&mut rig.ctx(2_000)).unwrap();
        assert!(handle.write_count() >= 2);
    }
}
