//! Boundary traits for every peripheral the control box talks to.
//!
//! All traits are synchronous and object-safe. The firmware runs a
//! single-threaded cooperative tick loop, so every call here must return
//! promptly; drivers that need pacing (the IR transmitter's inter-command
//! gap, the NFC field settle time) handle it internally.

use crate::{
    Result,
    types::{LightCommand, RemoteCommand, SettingKey, Tone},
};
use hestia_core::{CardUid, DeviceId, Rgb, StripModeKind};

/// Outbound link to the home-automation hub.
///
/// All notifications are fire-and-forget: the control box never blocks on
/// hub acknowledgement, and a dead hub must not affect device behavior.
pub trait HubBridge {
    fn notify_availability(&mut self, id: DeviceId, available: bool);
    fn notify_state(&mut self, id: DeviceId, on: bool);
    fn notify_strip(&mut self, id: DeviceId, mode: StripModeKind, color: Rgb);
    fn notify_alarm(&mut self, id: DeviceId, triggered: bool);
    fn notify_volume(&mut self, id: DeviceId, volume: u8, muted: bool);
    /// Ask the hub to start playing a media URL on its configured player.
    fn request_playback(&mut self, url: &str);
    /// Ask the hub to announce a message on its speakers.
    fn speak(&mut self, message: &str);
}

/// Small non-volatile settings area, keyed by [`SettingKey`].
///
/// Implementations must skip physically unchanged writes: callers rely on
/// update-if-changed semantics to bound flash wear.
pub trait SettingsStore {
    /// Read the block stored under `key`, if any.
    fn read(&self, key: SettingKey) -> Option<Vec<u8>>;

    /// Write a block under `key`.
    ///
    /// # Errors
    /// Returns an error when the backing medium rejects the write.
    fn write(&mut self, key: SettingKey, data: &[u8]) -> Result<()>;
}

/// NFC badge reader.
pub trait NfcReader {
    /// One-time chip initialization.
    ///
    /// # Errors
    /// A failure here is permanent for the process lifetime; callers mark
    /// the dependent feature non-operational and never retry.
    fn setup(&mut self) -> Result<()>;

    /// Non-blocking poll for a card in the field.
    ///
    /// # Errors
    /// Returns an error on a wire-level failure; `Ok(None)` means no card.
    fn poll_card(&mut self) -> Result<Option<CardUid>>;
}

/// Sound level input for the sound-react strip mode and tone detection.
pub trait Microphone {
    /// One rectified, center-removed amplitude sample.
    fn read_level(&mut self) -> u16;
}

/// Two-state actuator (relay, beacon, indicator LED).
pub trait SwitchActuator {
    /// # Errors
    /// Returns an error when the output channel is unreachable.
    fn set(&mut self, on: bool) -> Result<()>;
}

/// Color output to an RGB strip. Real drivers apply gamma correction
/// here; the logical color upstream stays linear.
pub trait StripActuator {
    /// # Errors
    /// Returns an error when the strip data line is unreachable.
    fn write(&mut self, color: Rgb) -> Result<()>;
}

/// Command channel to a smart light.
pub trait LightActuator {
    /// # Errors
    /// Returns an error when the light rejects or never receives the command.
    fn apply(&mut self, command: LightCommand) -> Result<()>;
}

/// Infrared transmitter aimed at the television.
///
/// The transmitter paces consecutive sends itself so callers can emit a
/// volume ramp as a plain loop.
pub trait RemoteTransmitter {
    /// # Errors
    /// Returns an error when the IR diode driver fails.
    fn send(&mut self, command: RemoteCommand) -> Result<()>;
}

/// Pan/elevation projectile launcher used as the alarm deterrent.
pub trait Launcher {
    /// Begin slewing to the given base and elevation angles, in degrees.
    ///
    /// # Errors
    /// Returns an error for angles outside the mechanical range.
    fn point(&mut self, base: u16, elevation: u16) -> Result<()>;

    /// Current base angle in degrees. Updated as the base slews.
    fn base_angle(&self) -> u16;

    /// Fire a burst of `rounds` projectiles.
    ///
    /// # Errors
    /// Returns an error when the trigger motor fails.
    fn fire(&mut self, rounds: u8) -> Result<()>;
}

/// Local keypad/display side channel for the person at the box.
///
/// Purely cosmetic from the control flow's point of view: messages and
/// tones never influence device state.
pub trait OperatorPanel {
    fn show_message(&mut self, message: &str);
    fn play_tone(&mut self, tone: Tone);
}
