//! Trigger-tone detection.
//!
//! Show videos open with a 1 kHz calibration tone. The detector samples
//! one microphone window per attempt and looks for the tone's periodicity
//! in the amplitude envelope: peaks above three quarters of the loudest
//! sample seen so far in the window, spaced at the target frequency.

use hestia_core::constants::{
    TONE_REQUIRED_PEAKS, TONE_TARGET_HZ, TONE_TOLERANCE_HZ, TONE_WINDOW_MS,
};
use hestia_hardware::Microphone;

/// Effective amplitude sampling rate of the microphone input.
const SAMPLE_RATE_HZ: u32 = 10_000;

/// Windowed periodicity detector for the show trigger tone.
#[derive(Debug, Clone)]
pub struct ToneDetector {
    window_samples: usize,
}

impl ToneDetector {
    pub fn new() -> Self {
        ToneDetector {
            window_samples: (u64::from(SAMPLE_RATE_HZ) * TONE_WINDOW_MS / 1_000) as usize,
        }
    }

    /// Sample one window and report whether the trigger tone was heard.
    ///
    /// A peak is a sample crossing above 75% of the running in-window
    /// maximum. Intervals between consecutive peaks map to a frequency;
    /// the tone counts as heard after five consecutive intervals within
    /// tolerance of the 1 kHz target. Returns as soon as the tone is
    /// confirmed, otherwise after the full window.
    pub fn listen(&self, mic: &mut dyn Microphone) -> bool {
        let mut window_peak: u32 = 0;
        let mut above = false;
        let mut last_crossing: Option<usize> = None;
        let mut qualifying: u8 = 0;

        for index in 0..self.window_samples {
            let sample = u32::from(mic.read_level());
            if sample > window_peak {
                window_peak = sample;
            }
            let is_above = window_peak > 0 && sample * 4 >= window_peak * 3;
            if is_above && !above {
                if let Some(previous) = last_crossing {
                    let interval = (index - previous) as u32;
                    let frequency = SAMPLE_RATE_HZ / interval;
                    if frequency.abs_diff(TONE_TARGET_HZ) <= TONE_TOLERANCE_HZ {
                        qualifying += 1;
                        if qualifying >= TONE_REQUIRED_PEAKS {
                            return true;
                        }
                    } else {
                        qualifying = 0;
                    }
                }
                last_crossing = Some(index);
            }
            above = is_above;
        }
        false
    }
}

impl Default for ToneDetector {
    fn default() -> Self {
        Self::new()
    }
}
