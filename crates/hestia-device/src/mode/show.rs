//! Strip effects driven by the show sequencer.

use super::StripSink;
use crate::Result;
use hestia_core::{Easing, Rgb};

/// One sequencer-addressable effect.
#[derive(Debug, Clone)]
pub enum ShowEffect {
    /// Hold a color until the next effect arrives.
    SingleColor(Rgb),
    /// Fade from one color to another over a fixed duration, then hold
    /// the terminal color.
    SmoothTransition {
        from: Rgb,
        to: Rgb,
        duration_ms: u64,
        easing: Easing,
        started_ms: u64,
    },
    /// Alternate between a color and dark at a fixed period.
    Strobe {
        color: Rgb,
        period_ms: u64,
        lit: bool,
        last_toggle_ms: u64,
    },
}

/// Mode wrapper the sequencer assigns to strips in its device pool.
#[derive(Debug, Clone)]
pub struct ShowEffectMode {
    effect: ShowEffect,
}

impl ShowEffectMode {
    pub fn new(effect: ShowEffect) -> Self {
        ShowEffectMode { effect }
    }

    pub fn effect(&self) -> &ShowEffect {
        &self.effect
    }

    /// Replace the running effect, stamping its timers with `now_ms` and
    /// pushing its first frame.
    ///
    /// # Errors
    /// Propagates actuator failures.
    pub fn set_effect(
        &mut self,
        sink: &mut StripSink,
        now_ms: u64,
        effect: ShowEffect,
    ) -> Result<()> {
        self.effect = match effect {
            ShowEffect::SingleColor(color) => {
                sink.write(color)?;
                ShowEffect::SingleColor(color)
            }
            ShowEffect::SmoothTransition {
                from,
                to,
                duration_ms,
                easing,
                ..
            } => {
                sink.write(from)?;
                ShowEffect::SmoothTransition {
                    from,
                    to,
                    duration_ms,
                    easing,
                    started_ms: now_ms,
                }
            }
            ShowEffect::Strobe {
                color, period_ms, ..
            } => {
                sink.write(color)?;
                ShowEffect::Strobe {
                    color,
                    period_ms,
                    lit: true,
                    last_toggle_ms: now_ms,
                }
            }
        };
        Ok(())
    }

    pub(super) fn activate(&mut self, sink: &mut StripSink, now_ms: u64) -> Result<()> {
        let effect = self.effect.clone();
        self.set_effect(sink, now_ms, effect)
    }

    pub(super) fn tick(&mut self, sink: &mut StripSink, now_ms: u64) -> Result<()> {
        match &mut self.effect {
            ShowEffect::SingleColor(_) => Ok(()),
            ShowEffect::SmoothTransition {
                from,
                to,
                duration_ms,
                easing,
                started_ms,
            } => {
                let elapsed = now_ms.saturating_sub(*started_ms);
                if elapsed >= *duration_ms {
                    // Transition complete; hold the terminal color.
                    let terminal = *to;
                    sink.write(terminal)?;
                    self.effect = ShowEffect::SingleColor(terminal);
                    return Ok(());
                }
                let progress = elapsed as f32 / *duration_ms as f32;
                sink.write(Rgb::lerp(*from, *to, easing.apply(progress)))
            }
            ShowEffect::Strobe {
                color,
                period_ms,
                lit,
                last_toggle_ms,
            } => {
                if now_ms.saturating_sub(*last_toggle_ms) >= *period_ms {
                    *lit = !*lit;
                    *last_toggle_ms = now_ms;
                    let frame = if *lit { *color } else { Rgb::OFF };
                    sink.write(frame)?;
                }
                Ok(())
            }
        }
    }
}
