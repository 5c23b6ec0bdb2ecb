//! Animation modes for the RGB strip.
//!
//! A strip always holds exactly one mode. Modes never touch the actuator
//! directly: every color goes through a [`StripSink`], which keeps the
//! strip's logical color in step with the wire.

mod rainbow;
mod show;
mod soundreact;

pub use rainbow::RainbowMode;
pub use show::{ShowEffect, ShowEffectMode};
pub use soundreact::SoundreactMode;

use crate::{Result, context::DeviceCtx};
use hestia_core::{
    Rgb, StripModeKind,
    constants::{ALARM_BLINK_CYCLE_MS, ALARM_BLINK_ON_MS},
};
use hestia_hardware::StripActuator;

/// Write access to a strip's color channel.
pub struct StripSink<'a> {
    actuator: &'a mut dyn StripActuator,
    color: &'a mut Rgb,
}

impl<'a> StripSink<'a> {
    pub fn new(actuator: &'a mut dyn StripActuator, color: &'a mut Rgb) -> Self {
        StripSink { actuator, color }
    }

    /// Drive a color and record it as the strip's current color.
    ///
    /// # Errors
    /// Propagates actuator failures; the logical color is only updated on
    /// success.
    pub fn write(&mut self, color: Rgb) -> Result<()> {
        self.actuator.write(color)?;
        *self.color = color;
        Ok(())
    }

    pub fn current(&self) -> Rgb {
        *self.color
    }
}

/// Static single-color mode.
#[derive(Debug, Clone)]
pub struct ColorMode {
    color: Rgb,
}

impl ColorMode {
    pub fn new(color: Rgb) -> Self {
        ColorMode { color }
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Update the held color; writes through when a sink is supplied
    /// (strip on and this mode active).
    pub fn set_color(&mut self, color: Rgb, sink: Option<&mut StripSink>) -> Result<()> {
        self.color = color;
        if let Some(sink) = sink {
            sink.write(color)?;
        }
        Ok(())
    }
}

/// Red blink used while the alarm rings: lit for a short slice at the
/// start of each cycle.
#[derive(Debug, Clone)]
pub struct AlarmBlink {
    phase_start_ms: u64,
    lit: bool,
}

impl AlarmBlink {
    pub fn new() -> Self {
        AlarmBlink {
            phase_start_ms: 0,
            lit: false,
        }
    }

    fn activate(&mut self, sink: &mut StripSink, now_ms: u64) -> Result<()> {
        self.phase_start_ms = now_ms;
        self.lit = true;
        sink.write(Rgb::RED)
    }

    fn tick(&mut self, sink: &mut StripSink, now_ms: u64) -> Result<()> {
        if now_ms - self.phase_start_ms >= ALARM_BLINK_CYCLE_MS {
            self.phase_start_ms = now_ms;
        }
        let should_be_lit = now_ms - self.phase_start_ms < ALARM_BLINK_ON_MS;
        if should_be_lit != self.lit {
            self.lit = should_be_lit;
            sink.write(if self.lit { Rgb::RED } else { Rgb::OFF })?;
        }
        Ok(())
    }
}

impl Default for AlarmBlink {
    fn default() -> Self {
        Self::new()
    }
}

/// The mode a strip currently runs. Tagged variants, one per animation.
#[derive(Debug, Clone)]
pub enum StripMode {
    Color(ColorMode),
    Rainbow(RainbowMode),
    Soundreact(SoundreactMode),
    AlarmBlink(AlarmBlink),
    Show(ShowEffectMode),
}

impl StripMode {
    pub fn kind(&self) -> StripModeKind {
        match self {
            StripMode::Color(_) => StripModeKind::Color,
            StripMode::Rainbow(_) => StripModeKind::Rainbow,
            StripMode::Soundreact(_) => StripModeKind::Soundreact,
            StripMode::AlarmBlink(_) => StripModeKind::Alarm,
            StripMode::Show(_) => StripModeKind::ShowEffect,
        }
    }

    /// Push the mode's initial color. Called when the strip turns on or
    /// the mode is assigned while on.
    pub fn activate(&mut self, sink: &mut StripSink, now_ms: u64) -> Result<()> {
        match self {
            StripMode::Color(mode) => sink.write(mode.color()),
            StripMode::Rainbow(mode) => mode.activate(sink, now_ms),
            StripMode::Soundreact(mode) => mode.activate(sink, now_ms),
            StripMode::AlarmBlink(mode) => mode.activate(sink, now_ms),
            StripMode::Show(mode) => mode.activate(sink, now_ms),
        }
    }

    /// Stop the animation and force the strip dark.
    pub fn deactivate(&mut self, sink: &mut StripSink) -> Result<()> {
        if let StripMode::AlarmBlink(mode) = self {
            mode.lit = false;
        }
        sink.write(Rgb::OFF)
    }

    /// Advance the animation to `ctx.now_ms`.
    pub fn tick(&mut self, ctx: &mut DeviceCtx, sink: &mut StripSink) -> Result<()> {
        match self {
            StripMode::Color(_) => Ok(()),
            StripMode::Rainbow(mode) => mode.tick(sink, ctx.now_ms),
            StripMode::Soundreact(mode) => mode.tick(ctx, sink),
            StripMode::AlarmBlink(mode) => mode.tick(sink, ctx.now_ms),
            StripMode::Show(mode) => mode.tick(sink, ctx.now_ms),
        }
    }
}
