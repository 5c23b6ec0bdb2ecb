//! Timing and range constants for the control-box core.
//!
//! All durations are in milliseconds, re-evaluated against the injected
//! [`Clock`](crate::Clock) once per scheduler tick; there is no dedicated
//! timer service.

/// Lowest valid device identifier.
pub const MIN_DEVICE_ID: u8 = 1;

/// Highest valid device identifier.
pub const MAX_DEVICE_ID: u8 = 99;

/// How long a triggered alarm rings before switching itself off when no
/// further trigger arrives.
pub const ALARM_AUTO_OFF_MS: u64 = 5_000;

/// Cadence of the NFC card poll inside the alarm tick.
pub const CARD_POLL_INTERVAL_MS: u64 = 1_000;

/// Alarm blink animation: full cycle length and lit portion.
pub const ALARM_BLINK_CYCLE_MS: u64 = 1_000;
pub const ALARM_BLINK_ON_MS: u64 = 100;

/// Sound-react mode: minimum spacing between color changes, fade cadence,
/// and the silence threshold after which the running maximum decays faster.
pub const SOUNDREACT_RECOLOR_MIN_MS: u64 = 200;
pub const SOUNDREACT_FADE_INTERVAL_MS: u64 = 300;
pub const SOUNDREACT_FAST_DECAY_AFTER_MS: u64 = 1_000;

/// Debounce applied to persisted, frequently-changing settings (rainbow
/// speed, sound sensitivity): at most one non-volatile write per window.
pub const SETTING_PERSIST_DEBOUNCE_MS: u64 = 600_000;

/// Trigger-tone detector parameters.
pub const TONE_WINDOW_MS: u64 = 500;
pub const TONE_TARGET_HZ: u32 = 1_000;
pub const TONE_TOLERANCE_HZ: u32 = 50;
pub const TONE_REQUIRED_PEAKS: u8 = 5;
pub const TONE_DETECTION_BUDGET_TICKS: u32 = 1_000;

/// Compensation subtracted from the show start time once the trigger tone
/// is heard, covering detection latency.
pub const TONE_DETECTION_LATENCY_MS: u64 = 1_250;

/// Television volume rails and the minimum level a show ramps up to.
pub const VOLUME_MAX: u8 = 25;
pub const SHOW_MIN_VOLUME: u8 = 18;

/// Deterrent launcher: minimum base angle before firing, how long to wait
/// for the base to slew, and the burst size.
pub const LAUNCHER_MIN_BASE_ANGLE: u16 = 30;
pub const LAUNCHER_AIM_WAIT_MS: u64 = 2_000;
pub const LAUNCHER_BURST_ROUNDS: u8 = 3;
