//! Rainbow cycle animation.

use super::StripSink;
use crate::{Result, context::DeviceCtx};
use hestia_core::{Percent, Rgb, constants::SETTING_PERSIST_DEBOUNCE_MS};
use hestia_hardware::SettingKey;
use tracing::debug;

/// Cycles the hue R→G→B→R by stepping two channels in opposite
/// directions.
///
/// The speed percentage maps linearly onto both the step size (1..=10)
/// and the step delay (100 ms..=5 ms), so a faster setting takes larger
/// steps more often.
#[derive(Debug, Clone)]
pub struct RainbowMode {
    speed: Percent,
    /// 0: red→green, 1: green→blue, 2: blue→red.
    phase: u8,
    /// Progression of the rising channel within the current phase.
    level: u8,
    last_step_ms: u64,
    last_persist_ms: Option<u64>,
}

impl RainbowMode {
    pub fn new(speed: Percent) -> Self {
        RainbowMode {
            speed,
            phase: 0,
            level: 0,
            last_step_ms: 0,
            last_persist_ms: None,
        }
    }

    pub fn speed(&self) -> Percent {
        self.speed
    }

    /// Channel step per animation frame, 1..=10.
    pub fn increment(&self) -> u8 {
        1 + (u16::from(self.speed.as_u8()) * 9 / 100) as u8
    }

    /// Delay between frames, 100 ms..=5 ms.
    pub fn step_delay_ms(&self) -> u64 {
        100 - u64::from(self.speed.as_u8()) * 95 / 100
    }

    /// Change the animation speed.
    ///
    /// The new value is persisted at most once per debounce window; the
    /// strip keeps animating at the new speed either way.
    ///
    /// # Errors
    /// Propagates settings-store write failures.
    pub fn set_speed(&mut self, ctx: &mut DeviceCtx, speed: Percent) -> Result<()> {
        self.speed = speed;
        let due = self
            .last_persist_ms
            .is_none_or(|t| ctx.now_ms.saturating_sub(t) >= SETTING_PERSIST_DEBOUNCE_MS);
        if due {
            ctx.store.write(SettingKey::RainbowSpeed, &[speed.as_u8()])?;
            self.last_persist_ms = Some(ctx.now_ms);
            debug!(speed = speed.as_u8(), "rainbow speed persisted");
        }
        Ok(())
    }

    fn color_at(phase: u8, level: u8) -> Rgb {
        let rising = level;
        let falling = 255 - level;
        match phase {
            0 => Rgb::new(falling, rising, 0),
            1 => Rgb::new(0, falling, rising),
            _ => Rgb::new(rising, 0, falling),
        }
    }

    pub(super) fn activate(&mut self, sink: &mut StripSink, now_ms: u64) -> Result<()> {
        self.phase = 0;
        self.level = 0;
        self.last_step_ms = now_ms;
        sink.write(Self::color_at(0, 0))
    }

    pub(super) fn tick(&mut self, sink: &mut StripSink, now_ms: u64) -> Result<()> {
        if now_ms.saturating_sub(self.last_step_ms) < self.step_delay_ms() {
            return Ok(());
        }
        let next = u16::from(self.level) + u16::from(self.increment());
        if next >= 255 {
            self.phase = (self.phase + 1) % 3;
            self.level = (next - 255) as u8;
        } else {
            self.level = next as u8;
        }
        self.last_step_ms = now_ms;
        sink.write(Self::color_at(self.phase, self.level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1, 100)]
    #[case(50, 5, 52)]
    #[case(100, 10, 5)]
    fn speed_mapping(#[case] speed: u8, #[case] increment: u8, #[case] delay_ms: u64) {
        let mode = RainbowMode::new(Percent::new(speed));
        assert_eq!(mode.increment(), increment);
        assert_eq!(mode.step_delay_ms(), delay_ms);
    }

    #[test]
    fn higher_speed_steps_more_and_waits_less() {
        for lower in 0..100u8 {
            let slow = RainbowMode::new(Percent::new(lower));
            let fast = RainbowMode::new(Percent::new(100));
            assert!(fast.increment() >= slow.increment());
            assert!(fast.step_delay_ms() <= slow.step_delay_ms());
        }
    }

    #[test]
    fn cycle_wraps_through_all_three_phases() {
        use hestia_hardware::mock::MockStrip;

        let (mut actuator, handle) = MockStrip::new();
        let mut color = Rgb::OFF;
        let mut mode = RainbowMode::new(Percent::new(100));

        let mut sink = StripSink::new(&mut actuator, &mut color);
        mode.activate(&mut sink, 0).unwrap();
        assert_eq!(handle.current(), Rgb::new(255, 0, 0));

        // Drive enough frames to wrap past red->green into green->blue.
        let mut now = 0;
        for _ in 0..30 {
            now += mode.step_delay_ms();
            mode.tick(&mut sink, now).unwrap();
        }
        let c = handle.current();
        assert_eq!(c.r, 0);
        assert!(c.g > 0 || c.b > 0);
    }
}
