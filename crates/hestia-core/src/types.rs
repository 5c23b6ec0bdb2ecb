use crate::{
    Result,
    constants::{MAX_DEVICE_ID, MIN_DEVICE_ID},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Device identifier (2 digits, zero-padded).
///
/// The ID is assigned at construction time, is stable for the process
/// lifetime and is the identifier the hub bridge keys every notification
/// by. Uniqueness across the registry is enforced at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(u8);

impl DeviceId {
    /// Create a new device ID with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidDeviceId` if the ID is outside 1-99.
    pub fn new(id: u8) -> Result<Self> {
        if !(MIN_DEVICE_ID..=MAX_DEVICE_ID).contains(&id) {
            return Err(Error::InvalidDeviceId(format!(
                "Device ID must be {MIN_DEVICE_ID}-{MAX_DEVICE_ID}, got {id}"
            )));
        }
        Ok(DeviceId(id))
    }

    /// Get the raw device ID as u8.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl std::str::FromStr for DeviceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u8 = s
            .parse()
            .map_err(|_| Error::InvalidDeviceId(format!("Invalid device ID: {s}")))?;
        DeviceId::new(id)
    }
}

/// An 8-bit-per-channel RGB color.
///
/// Channels are always in range by construction (`u8`); the interesting
/// invariant is behavioural: strips only ever receive colors through their
/// clamped setter, and turning a strip off always drives [`Rgb::OFF`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// All channels dark.
    pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Full red, used by the alarm blink animation.
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Clamp wider integers into a channel value.
    #[must_use]
    pub fn clamp_channel(value: i32) -> u8 {
        value.clamp(0, 255) as u8
    }

    /// Linear interpolation between two colors at `progress` in [0, 1].
    ///
    /// Each channel follows `start + floor(progress * (end - start))`, so
    /// for `progress == 0.5` the result is the exact integer midpoint
    /// (truncated toward the start channel).
    #[must_use]
    pub fn lerp(from: Rgb, to: Rgb, progress: f32) -> Rgb {
        let channel = |a: u8, b: u8| -> u8 {
            let delta = f32::from(b) - f32::from(a);
            Self::clamp_channel(i32::from(a) + (progress * delta) as i32)
        };
        Rgb {
            r: channel(from.r, to.r),
            g: channel(from.g, to.g),
            b: channel(from.b, to.b),
        }
    }

    /// Move every channel toward zero by `step`, saturating at zero.
    #[must_use]
    pub fn faded(self, step: u8) -> Rgb {
        Rgb {
            r: self.r.saturating_sub(step),
            g: self.g.saturating_sub(step),
            b: self.b.saturating_sub(step),
        }
    }

    /// True when every channel is zero.
    #[must_use]
    pub fn is_off(self) -> bool {
        self == Rgb::OFF
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{},{})", self.r, self.g, self.b)
    }
}

/// A percentage clamped to 0-100.
///
/// Used for the rainbow animation speed and the sound-react sensitivity.
/// Out-of-range inputs are clamped rather than rejected: these values come
/// from a keypad slider, not from a protocol field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Percent(u8);

impl Percent {
    #[must_use]
    pub fn new(value: u8) -> Self {
        Percent(value.min(100))
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// Fraction in [0.0, 1.0].
    #[must_use]
    pub fn fraction(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// 4-byte NFC card UID.
///
/// # Security
/// Equality is constant-time to avoid leaking, through timing, how much of
/// a presented badge matches a stored credential.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
pub struct CardUid([u8; 4]);

impl CardUid {
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        CardUid(bytes)
    }

    /// Create a UID from a byte slice.
    ///
    /// # Errors
    /// Returns `Error::InvalidCardFormat` if the slice is not exactly 4 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 4] = bytes.try_into().map_err(|_| {
            Error::InvalidCardFormat(format!("Card UID must be 4 bytes, got {}", bytes.len()))
        })?;
        Ok(CardUid(arr))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl PartialEq for CardUid {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl std::hash::Hash for CardUid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

/// Easing curve applied to smooth color transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Apply the curve to a progression in [0, 1].
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// Discriminant of the strip mode currently assigned, as reported to the
/// hub whenever the mode or its color changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripModeKind {
    Color,
    Rainbow,
    Soundreact,
    Alarm,
    ShowEffect,
}

impl fmt::Display for StripModeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            StripModeKind::Color => "Color",
            StripModeKind::Rainbow => "Rainbow",
            StripModeKind::Soundreact => "Soundreact",
            StripModeKind::Alarm => "Alarm",
            StripModeKind::ShowEffect => "ShowEffect",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("15", 15)]
    #[case("01", 1)]
    #[case("99", 99)]
    fn device_id_valid(#[case] input: &str, #[case] expected: u8) {
        let id: DeviceId = input.parse().unwrap();
        assert_eq!(id.as_u8(), expected);
        assert_eq!(id.to_string(), format!("{expected:02}"));
    }

    #[rstest]
    #[case("00")]
    #[case("100")]
    #[case("abc")]
    fn device_id_invalid(#[case] input: &str) {
        let result: Result<DeviceId> = input.parse();
        assert!(result.is_err());
    }

    #[test]
    fn lerp_linear_midpoint_is_exact() {
        let from = Rgb::new(0, 100, 200);
        let to = Rgb::new(100, 0, 250);
        let mid = Rgb::lerp(from, to, 0.5);
        assert_eq!(mid, Rgb::new(50, 50, 225));
    }

    #[test]
    fn lerp_endpoints() {
        let from = Rgb::new(10, 20, 30);
        let to = Rgb::new(200, 150, 100);
        assert_eq!(Rgb::lerp(from, to, 0.0), from);
        assert_eq!(Rgb::lerp(from, to, 1.0), to);
    }

    #[test]
    fn lerp_truncates_toward_start() {
        // 0 -> 255 at 0.5 is 127.5, floored to 127
        let mid = Rgb::lerp(Rgb::OFF, Rgb::new(255, 255, 255), 0.5);
        assert_eq!(mid, Rgb::new(127, 127, 127));
    }

    #[test]
    fn faded_saturates_at_zero() {
        let c = Rgb::new(5, 100, 0);
        assert_eq!(c.faded(10), Rgb::new(0, 90, 0));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(50, 50)]
    #[case(100, 100)]
    #[case(200, 100)]
    fn percent_clamps(#[case] input: u8, #[case] expected: u8) {
        assert_eq!(Percent::new(input).as_u8(), expected);
    }

    #[test]
    fn card_uid_round_trip() {
        let uid = CardUid::from_bytes(&[0x04, 0xAB, 0xCD, 0xEF]).unwrap();
        assert_eq!(uid.to_string(), "04ABCDEF");
        assert_eq!(uid, CardUid::new([0x04, 0xAB, 0xCD, 0xEF]));
    }

    #[test]
    fn card_uid_wrong_length_rejected() {
        assert!(CardUid::from_bytes(&[1, 2, 3]).is_err());
        assert!(CardUid::from_bytes(&[1, 2, 3, 4, 5]).is_err());
    }

    #[rstest]
    #[case(Easing::Linear, 0.5, 0.5)]
    #[case(Easing::EaseInCubic, 0.5, 0.125)]
    #[case(Easing::EaseOutCubic, 0.5, 0.875)]
    #[case(Easing::EaseInOutCubic, 0.5, 0.5)]
    fn easing_known_points(#[case] easing: Easing, #[case] t: f32, #[case] expected: f32) {
        assert!((easing.apply(t) - expected).abs() < 1e-6);
    }

    #[test]
    fn easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn strip_mode_kind_serialization() {
        let serialized = serde_json::to_string(&StripModeKind::Soundreact).unwrap();
        assert_eq!(serialized, "\"soundreact\"");
    }
}
