//! Show scripts and the fixed-width action command codec.
//!
//! Every scripted action is a digit string: two digits of device ID, two
//! digits of command category, then a category-specific payload. Fixed
//! widths keep the scripts trivially seekable and the parser free of any
//! delimiter handling.
//!
//! Categories:
//!
//! | category | meaning            | payload                                      |
//! |----------|--------------------|----------------------------------------------|
//! | `00`     | power              | `0` off, `1` on, `2` toggle                  |
//! | `01`     | strip effect       | `0rrrgggbbb`, `1` smooth, `2` strobe         |
//! | `02`     | temperature light  | `0kkkk` kelvin, `1lll` luminosity            |
//! | `03`     | color light        | `0` color, `1` kelvin, `2` luminosity        |
//!
//! The smooth payload is `rrrgggbbb` from, `rrrgggbbb` to, `ddddd`
//! duration in ms and one easing digit; strobe is `rrrgggbbb` plus a
//! `pppp` period in ms.

use crate::{Result, ShowError};
use hestia_core::{DeviceId, Easing, Error, Percent, Rgb};
use hestia_device::ShowEffect;

/// What a power action does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Off,
    On,
    Toggle,
}

/// One decoded device command.
///
/// Light commands are flattened across the two light categories: which
/// concrete device type they land on is resolved at execution time, not
/// in the codec.
#[derive(Debug, Clone)]
pub enum DeviceCommand {
    Power(PowerAction),
    StripEffect(ShowEffect),
    ColorTemperature(u16),
    Luminosity(Percent),
    LightColor(Rgb),
}

/// Decode one `[device:2][category:2][payload]` command string.
///
/// # Errors
/// Returns `InvalidCommandFormat` for anything that is not a well-formed
/// command, and `InvalidDeviceId` for a device field outside 1-99.
pub fn parse_command(raw: &str) -> Result<(DeviceId, DeviceCommand)> {
    if raw.len() < 5 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(raw, "expected digits [device:2][category:2][payload]"));
    }
    let device: DeviceId = raw[..2].parse()?;
    let payload = &raw[4..];
    let command = match &raw[2..4] {
        "00" => parse_power(raw, payload)?,
        "01" => DeviceCommand::StripEffect(parse_strip_effect(raw, payload)?),
        "02" => parse_temperature_light(raw, payload)?,
        "03" => parse_color_light(raw, payload)?,
        category => return Err(malformed(raw, &format!("unknown category {category}"))),
    };
    Ok((device, command))
}

fn malformed(raw: &str, detail: &str) -> ShowError {
    Error::InvalidCommandFormat(format!("{raw:?}: {detail}")).into()
}

fn parse_power(raw: &str, payload: &str) -> Result<DeviceCommand> {
    let action = match payload {
        "0" => PowerAction::Off,
        "1" => PowerAction::On,
        "2" => PowerAction::Toggle,
        _ => return Err(malformed(raw, "power payload must be 0, 1 or 2")),
    };
    Ok(DeviceCommand::Power(action))
}

fn parse_strip_effect(raw: &str, payload: &str) -> Result<ShowEffect> {
    let (selector, rest) = payload.split_at(1);
    match selector {
        "0" if rest.len() == 9 => Ok(ShowEffect::SingleColor(field_color(raw, rest)?)),
        "1" if rest.len() == 24 => Ok(ShowEffect::SmoothTransition {
            from: field_color(raw, &rest[..9])?,
            to: field_color(raw, &rest[9..18])?,
            duration_ms: u64::from(field_number(raw, &rest[18..23])?),
            easing: field_easing(raw, &rest[23..])?,
            started_ms: 0,
        }),
        "2" if rest.len() == 13 => Ok(ShowEffect::Strobe {
            color: field_color(raw, &rest[..9])?,
            period_ms: u64::from(field_number(raw, &rest[9..])?),
            lit: false,
            last_toggle_ms: 0,
        }),
        _ => Err(malformed(raw, "bad strip effect payload")),
    }
}

fn parse_temperature_light(raw: &str, payload: &str) -> Result<DeviceCommand> {
    let (selector, rest) = payload.split_at(1);
    match selector {
        "0" if rest.len() == 4 => Ok(DeviceCommand::ColorTemperature(
            field_number(raw, rest)? as u16,
        )),
        "1" if rest.len() == 3 => Ok(DeviceCommand::Luminosity(field_percent(raw, rest)?)),
        _ => Err(malformed(raw, "bad temperature light payload")),
    }
}

fn parse_color_light(raw: &str, payload: &str) -> Result<DeviceCommand> {
    let (selector, rest) = payload.split_at(1);
    match selector {
        "0" if rest.len() == 9 => Ok(DeviceCommand::LightColor(field_color(raw, rest)?)),
        "1" if rest.len() == 4 => Ok(DeviceCommand::ColorTemperature(
            field_number(raw, rest)? as u16,
        )),
        "2" if rest.len() == 3 => Ok(DeviceCommand::Luminosity(field_percent(raw, rest)?)),
        _ => Err(malformed(raw, "bad color light payload")),
    }
}

fn field_number(raw: &str, field: &str) -> Result<u32> {
    field
        .parse()
        .map_err(|_| malformed(raw, &format!("bad numeric field {field:?}")))
}

/// Three digits per channel, clamped to the 8-bit channel range.
fn field_color(raw: &str, field: &str) -> Result<Rgb> {
    let channel = |range: std::ops::Range<usize>| -> Result<u8> {
        let value = field_number(raw, &field[range])?;
        Ok(Rgb::clamp_channel(value as i32))
    };
    Ok(Rgb::new(channel(0..3)?, channel(3..6)?, channel(6..9)?))
}

fn field_percent(raw: &str, field: &str) -> Result<Percent> {
    let value = field_number(raw, field)?;
    Ok(Percent::new(value.min(100) as u8))
}

fn field_easing(raw: &str, field: &str) -> Result<Easing> {
    match field {
        "0" => Ok(Easing::Linear),
        "1" => Ok(Easing::EaseInCubic),
        "2" => Ok(Easing::EaseOutCubic),
        "3" => Ok(Easing::EaseInOutCubic),
        _ => Err(malformed(raw, "easing digit must be 0-3")),
    }
}

/// One scripted step: when, who, what.
#[derive(Debug, Clone)]
pub struct Action {
    pub timecode_ms: u64,
    pub device: DeviceId,
    pub command: DeviceCommand,
}

impl Action {
    /// Decode a raw command string into an action at `timecode_ms`.
    ///
    /// # Errors
    /// Same contract as [`parse_command`].
    pub fn parse(timecode_ms: u64, raw: &str) -> Result<Self> {
        let (device, command) = parse_command(raw)?;
        Ok(Action {
            timecode_ms,
            device,
            command,
        })
    }
}

/// A named show: a video URL plus a time-ordered action script.
///
/// The device pool is derived from the script at construction; it is the
/// set of devices the television seizes for the duration of the show.
#[derive(Debug, Clone)]
pub struct Show {
    name: String,
    video_url: String,
    actions: Vec<Action>,
    pool: Vec<DeviceId>,
}

impl Show {
    /// Build a show, checking that timecodes never decrease.
    ///
    /// # Errors
    /// Returns `NonMonotonicTimecode` naming the first offending action.
    pub fn new(
        name: impl Into<String>,
        video_url: impl Into<String>,
        actions: Vec<Action>,
    ) -> Result<Self> {
        for (index, pair) in actions.windows(2).enumerate() {
            if pair[1].timecode_ms < pair[0].timecode_ms {
                return Err(ShowError::NonMonotonicTimecode { index: index + 1 });
            }
        }
        let mut pool = Vec::new();
        for action in &actions {
            if !pool.contains(&action.device) {
                pool.push(action.device);
            }
        }
        Ok(Show {
            name: name.into(),
            video_url: video_url.into(),
            actions,
            pool,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Devices this show drives, in first-appearance order.
    pub fn pool(&self) -> &[DeviceId] {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn id(n: u8) -> DeviceId {
        DeviceId::new(n).unwrap()
    }

    #[test]
    fn power_commands() {
        let (device, command) = parse_command("05001").unwrap();
        assert_eq!(device, id(5));
        assert!(matches!(command, DeviceCommand::Power(PowerAction::On)));

        let (_, command) = parse_command("05000").unwrap();
        assert!(matches!(command, DeviceCommand::Power(PowerAction::Off)));

        let (_, command) = parse_command("05002").unwrap();
        assert!(matches!(command, DeviceCommand::Power(PowerAction::Toggle)));
    }

    #[test]
    fn single_color_effect_clamps_channels() {
        let (device, command) = parse_command("03010999000128").unwrap();
        assert_eq!(device, id(3));
        let DeviceCommand::StripEffect(ShowEffect::SingleColor(color)) = command else {
            panic!("expected single color effect");
        };
        assert_eq!(color, Rgb::new(255, 0, 128));
    }

    #[test]
    fn smooth_transition_effect() {
        let (device, command) = parse_command("12011255128000000255000030001").unwrap();
        assert_eq!(device, id(12));
        let DeviceCommand::StripEffect(ShowEffect::SmoothTransition {
            from,
            to,
            duration_ms,
            easing,
            started_ms,
        }) = command
        else {
            panic!("expected smooth transition");
        };
        assert_eq!(from, Rgb::new(255, 128, 0));
        assert_eq!(to, Rgb::new(0, 255, 0));
        assert_eq!(duration_ms, 3_000);
        assert_eq!(easing, Easing::EaseInCubic);
        assert_eq!(started_ms, 0);
    }

    #[test]
    fn strobe_effect() {
        let (_, command) = parse_command("070122552552550100").unwrap();
        let DeviceCommand::StripEffect(ShowEffect::Strobe {
            color, period_ms, ..
        }) = command
        else {
            panic!("expected strobe");
        };
        assert_eq!(color, Rgb::new(255, 255, 255));
        assert_eq!(period_ms, 100);
    }

    #[test]
    fn light_commands() {
        let (_, command) = parse_command("040203500").unwrap();
        assert!(matches!(command, DeviceCommand::ColorTemperature(3_500)));

        let (_, command) = parse_command("04021075").unwrap();
        assert!(matches!(
            command,
            DeviceCommand::Luminosity(p) if p.as_u8() == 75
        ));

        let (_, command) = parse_command("06030128064255").unwrap();
        assert!(matches!(
            command,
            DeviceCommand::LightColor(c) if c == Rgb::new(128, 64, 255)
        ));

        let (_, command) = parse_command("060314000").unwrap();
        assert!(matches!(command, DeviceCommand::ColorTemperature(4_000)));

        let (_, command) = parse_command("06032100").unwrap();
        assert!(matches!(
            command,
            DeviceCommand::Luminosity(p) if p.as_u8() == 100
        ));
    }

    #[rstest]
    #[case::too_short("0500")]
    #[case::non_digit("05x01")]
    #[case::unknown_category("05041")]
    #[case::bad_power_payload("05003")]
    #[case::device_zero("00001")]
    #[case::truncated_color("030125512")]
    #[case::bad_easing("12011255128000000255000030009")]
    fn malformed_commands_are_rejected(#[case] raw: &str) {
        assert!(parse_command(raw).is_err());
    }

    #[test]
    fn show_rejects_decreasing_timecodes() {
        let actions = vec![
            Action::parse(0, "05001").unwrap(),
            Action::parse(2_000, "05000").unwrap(),
            Action::parse(1_000, "05001").unwrap(),
        ];
        let err = Show::new("demo", "http://media/demo.mp4", actions).unwrap_err();
        assert!(matches!(err, ShowError::NonMonotonicTimecode { index: 2 }));
    }

    #[test]
    fn pool_is_deduplicated_in_first_appearance_order() {
        let actions = vec![
            Action::parse(0, "05001").unwrap(),
            Action::parse(0, "03001").unwrap(),
            Action::parse(500, "05000").unwrap(),
        ];
        let show = Show::new("demo", "http://media/demo.mp4", actions).unwrap();
        assert_eq!(show.pool(), &[id(5), id(3)]);
    }

    #[test]
    fn equal_timecodes_are_allowed() {
        let actions = vec![
            Action::parse(100, "05001").unwrap(),
            Action::parse(100, "03001").unwrap(),
        ];
        assert!(Show::new("demo", "http://media/demo.mp4", actions).is_ok());
    }
}
