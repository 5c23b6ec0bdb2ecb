//! Shared data types crossing the hardware boundary.

use chrono::{DateTime, Utc};
use hestia_core::{DeviceId, Rgb, StripModeKind};
use serde::{Deserialize, Serialize};

/// Keys of the non-volatile settings area.
///
/// Each key names one small byte block; layout within a block belongs to
/// the component that owns the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    /// Enrolled NFC credentials (count byte + 5-byte records).
    Cards,
    /// Whether the alarm drives the siren relay when ringing.
    BuzzerEnabled,
    /// Rainbow animation speed, 0-100.
    RainbowSpeed,
    /// Sound-react sensitivity, 0-100.
    SoundSensitivity,
    /// Last accepted television volume.
    TvVolume,
}

/// Command applied to a smart light actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightCommand {
    Power(bool),
    /// Color temperature in kelvin.
    ColorTemperature(u16),
    /// Luminosity percentage, 0-100.
    Luminosity(u8),
    Color(Rgb),
}

/// Infrared command understood by the television remote protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteCommand {
    Power,
    VolumeUp,
    VolumeDown,
    Mute,
}

/// Feedback tone on the operator panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Confirm,
    Error,
}

/// One notification sent to the home-automation hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HubEvent {
    Availability { id: DeviceId, available: bool },
    State { id: DeviceId, on: bool },
    Strip {
        id: DeviceId,
        mode: StripModeKind,
        color: Rgb,
    },
    Alarm { id: DeviceId, triggered: bool },
    Volume { id: DeviceId, volume: u8, muted: bool },
    Playback { url: String },
    Speech { message: String },
}

/// A hub notification with the wall-clock instant it was emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubRecord {
    pub at: DateTime<Utc>,
    pub event: HubEvent,
}

impl HubRecord {
    #[must_use]
    pub fn now(event: HubEvent) -> Self {
        HubRecord {
            at: Utc::now(),
            event,
        }
    }
}
