//! Sound-reactive animation.

use super::StripSink;
use crate::{Result, context::DeviceCtx};
use hestia_core::{
    Percent, Rgb, TickRng,
    constants::{
        SETTING_PERSIST_DEBOUNCE_MS, SOUNDREACT_FADE_INTERVAL_MS, SOUNDREACT_FAST_DECAY_AFTER_MS,
        SOUNDREACT_RECOLOR_MIN_MS,
    },
};
use hestia_hardware::SettingKey;
use tracing::debug;

/// Channels fade toward dark by this much per fade interval.
const FADE_STEP: u8 = 10;

/// Extra decay applied to the running maximum during sustained silence.
const SILENCE_DECAY: u16 = 2;

/// Random channel floor for non-peak colors.
const CHANNEL_MIN: u8 = 100;

/// Flashes a random color when the sound level crosses an adaptive
/// threshold, then fades it out.
///
/// The running maximum tracks the loudest recent input with the update
/// `max = (max + 4 * sample) / 5` on rising samples, so a single loud
/// event pulls the threshold up quickly while the silence decay lets the
/// strip stay lively when the room goes quiet.
#[derive(Debug, Clone)]
pub struct SoundreactMode {
    sensitivity: Percent,
    running_max: u16,
    last_change_ms: u64,
    last_fade_ms: u64,
    last_persist_ms: Option<u64>,
    rng: TickRng,
}

impl SoundreactMode {
    pub fn new(sensitivity: Percent, rng: TickRng) -> Self {
        SoundreactMode {
            sensitivity,
            running_max: 0,
            last_change_ms: 0,
            last_fade_ms: 0,
            last_persist_ms: None,
            rng,
        }
    }

    pub fn sensitivity(&self) -> Percent {
        self.sensitivity
    }

    /// Change the sensitivity, persisting under the same debounce policy
    /// as the rainbow speed.
    ///
    /// # Errors
    /// Propagates settings-store write failures.
    pub fn set_sensitivity(&mut self, ctx: &mut DeviceCtx, sensitivity: Percent) -> Result<()> {
        self.sensitivity = sensitivity;
        let due = self
            .last_persist_ms
            .is_none_or(|t| ctx.now_ms.saturating_sub(t) >= SETTING_PERSIST_DEBOUNCE_MS);
        if due {
            ctx.store
                .write(SettingKey::SoundSensitivity, &[sensitivity.as_u8()])?;
            self.last_persist_ms = Some(ctx.now_ms);
            debug!(sensitivity = sensitivity.as_u8(), "sound sensitivity persisted");
        }
        Ok(())
    }

    fn random_color(&mut self, peak: bool) -> Rgb {
        let mut color = Rgb::OFF;
        let span = 255 - CHANNEL_MIN + 1;
        for channel in [0, 1, 2] {
            if !self.rng.next_bool() {
                continue;
            }
            let value = if peak {
                255
            } else {
                CHANNEL_MIN + self.rng.next_u8_in(span)
            };
            match channel {
                0 => color.r = value,
                1 => color.g = value,
                _ => color.b = value,
            }
        }
        color
    }

    pub(super) fn activate(&mut self, sink: &mut StripSink, now_ms: u64) -> Result<()> {
        self.running_max = 0;
        self.last_change_ms = now_ms;
        self.last_fade_ms = now_ms;
        sink.write(Rgb::OFF)
    }

    pub(super) fn tick(&mut self, ctx: &mut DeviceCtx, sink: &mut StripSink) -> Result<()> {
        let now = ctx.now_ms;
        let sample = ctx.mic.read_level();

        let rising = sample > self.running_max;
        if rising {
            // Weighted average of two u16 values stays within u16 range.
            self.running_max =
                ((u32::from(self.running_max) + 4 * u32::from(sample)) / 5) as u16;
        }

        let threshold =
            u32::from(self.running_max) * u32::from(100 - self.sensitivity.as_u8()) / 100;
        let mut recolored = false;
        if self.running_max > 0
            && u32::from(sample) >= threshold
            && now.saturating_sub(self.last_change_ms) >= SOUNDREACT_RECOLOR_MIN_MS
        {
            let color = self.random_color(rising);
            sink.write(color)?;
            self.last_change_ms = now;
            recolored = true;
        }

        if now.saturating_sub(self.last_fade_ms) >= SOUNDREACT_FADE_INTERVAL_MS {
            if !recolored {
                let faded = sink.current().faded(FADE_STEP);
                if faded != sink.current() {
                    sink.write(faded)?;
                }
            }
            if now.saturating_sub(self.last_change_ms) >= SOUNDREACT_FAST_DECAY_AFTER_MS {
                self.running_max = self.running_max.saturating_sub(SILENCE_DECAY);
            }
            self.last_fade_ms = now;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DeviceCtx;
    use hestia_hardware::mock::{
        MemoryStore, MockPanel, MockStrip, RecordingHub, ScriptedMic, ScriptedMicHandle,
    };

    struct Rig {
        hub: RecordingHub,
        panel: MockPanel,
        mic: ScriptedMic,
        mic_handle: ScriptedMicHandle,
        store: MemoryStore,
    }

    impl Rig {
        fn new() -> Self {
            let (hub, _) = RecordingHub::new();
            let (panel, _) = MockPanel::new();
            let (mic, mic_handle) = ScriptedMic::new(0);
            let (store, _) = MemoryStore::new();
            Rig {
                hub,
                panel,
                mic,
                mic_handle,
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

    #[test]
    fn loud_sample_flashes_then_fades() {
        let mut rig = Rig::new();
        let (mut actuator, handle) = MockStrip::new();
        let mut color = Rgb::OFF;
        let mut mode = SoundreactMode::new(Percent::new(50), TickRng::new(42));

        {
            let mut sink = StripSink::new(&mut actuator, &mut color);
            mode.activate(&mut sink, 0).unwrap();
        }

        // Loud sample after the recolor holdoff flashes a color.
        rig.mic_handle.push(800);
        {
            let mut ctx = rig.ctx(250);
            let mut sink = StripSink::new(&mut actuator, &mut color);
            mode.tick(&mut ctx, &mut sink).unwrap();
        }
        assert_eq!(handle.write_count(), 2);
        let flashed = handle.current();

        // Silence: after a fade interval every channel moved toward zero.
        {
            let mut ctx = rig.ctx(600);
            let mut sink = StripSink::new(&mut actuator, &mut color);
            mode.tick(&mut ctx, &mut sink).unwrap();
        }
        let faded = handle.current();
        assert!(faded.r <= flashed.r && faded.g <= flashed.g && faded.b <= flashed.b);
        if !flashed.is_off() {
            assert_ne!(faded, flashed);
        }
    }

    #[test]
    fn extreme_sample_raises_the_threshold_without_wrapping() {
        let mut rig = Rig::new();
        let (mut actuator, _handle) = MockStrip::new();
        let mut color = Rgb::OFF;
        let mut mode = SoundreactMode::new(Percent::new(50), TickRng::new(3));

        {
            let mut sink = StripSink::new(&mut actuator, &mut color);
            mode.activate(&mut sink, 0).unwrap();
        }

        rig.mic_handle.push(20_000);
        {
            let mut ctx = rig.ctx(250);
            let mut sink = StripSink::new(&mut actuator, &mut color);
            mode.tick(&mut ctx, &mut sink).unwrap();
        }
        // (0 + 4 * 20000) / 5, computed without wrapping.
        assert_eq!(mode.running_max, 16_000);

        rig.mic_handle.push(u16::MAX);
        {
            let mut ctx = rig.ctx(500);
            let mut sink = StripSink::new(&mut actuator, &mut color);
            mode.tick(&mut ctx, &mut sink).unwrap();
        }
        assert_eq!(
            mode.running_max,
            ((16_000 + 4 * u32::from(u16::MAX)) / 5) as u16
        );
    }

    #[test]
    fn recolor_holdoff_limits_flash_rate() {
        let mut rig = Rig::new();
        let (mut actuator, handle) = MockStrip::new();
        let mut color = Rgb::OFF;
        let mut mode = SoundreactMode::new(Percent::new(50), TickRng::new(7));

        {
            let mut sink = StripSink::new(&mut actuator, &mut color);
            mode.activate(&mut sink, 0).unwrap();
        }

        rig.mic_handle.push_all(&[900, 900]);

        {
            let mut ctx = rig.ctx(250);
            let mut sink = StripSink::new(&mut actuator, &mut color);
            mode.tick(&mut ctx, &mut sink).unwrap();
        }
        let writes_after_first = handle.write_count();

        // 40 ms later: still inside the holdoff, no new color.
        {
            let mut ctx = rig.ctx(290);
            let mut sink = StripSink::new(&mut actuator, &mut color);
            mode.tick(&mut ctx, &mut sink).unwrap();
        }
        assert_eq!(handle.write_count(), writes_after_first);
    }

    #[test]
    fn sensitivity_persist_is_debounced() {
        let mut rig = Rig::new();
        let (store_probe, store_handle) = MemoryStore::new();
        rig.store = store_probe;
        let mut mode = SoundreactMode::new(Percent::new(50), TickRng::new(1));

        mode.set_sensitivity(&mut rig.ctx(0), Percent::new(60)).unwrap();
        mode.set_sensitivity(&mut rig.ctx(1_000), Percent::new(70)).unwrap();
        assert_eq!(store_handle.physical_writes(), 1);

        mode.set_sensitivity(&mut rig.ctx(SETTING_PERSIST_DEBOUNCE_MS), Percent::new(80))
            .unwrap();
        assert_eq!(store_handle.physical_writes(), 2);
        assert_eq!(store_handle.get(SettingKey::SoundSensitivity), Some(vec![80]));
    }
}
