//! Alarm state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// States of the intrusion alarm.
///
/// Ringing is a sub-state of being armed: a ringing alarm is still armed,
/// and stopping the ring returns to `Armed`, never to `Disarmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmState {
    /// Not watching; enrollment may start from here.
    Disarmed,
    /// Watching for triggers.
    Armed,
    /// A trigger fired; sirens and effects are running.
    Ringing,
    /// Waiting for a badge to enroll.
    Enrollment,
}

impl AlarmState {
    /// Whether a transition to `target` is valid.
    pub fn can_transition_to(&self, target: AlarmState) -> bool {
        use AlarmState::*;
        matches!(
            (self, target),
            (Disarmed, Armed)
                | (Disarmed, Enrollment)
                | (Armed, Disarmed)
                | (Armed, Ringing)
                | (Ringing, Armed)
                | (Ringing, Disarmed)
                | (Enrollment, Disarmed)
        )
    }

    /// True for `Armed` and `Ringing`.
    pub fn is_armed(&self) -> bool {
        matches!(self, AlarmState::Armed | AlarmState::Ringing)
    }
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AlarmState::Disarmed => "disarmed",
            AlarmState::Armed => "armed",
            AlarmState::Ringing => "ringing",
            AlarmState::Enrollment => "enrollment",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AlarmState::Disarmed, AlarmState::Armed, true)]
    #[case(AlarmState::Disarmed, AlarmState::Enrollment, true)]
    #[case(AlarmState::Disarmed, AlarmState::Ringing, false)]
    #[case(AlarmState::Armed, AlarmState::Ringing, true)]
    #[case(AlarmState::Armed, AlarmState::Enrollment, false)]
    #[case(AlarmState::Ringing, AlarmState::Armed, true)]
    #[case(AlarmState::Ringing, AlarmState::Enrollment, false)]
    #[case(AlarmState::Enrollment, AlarmState::Disarmed, true)]
    #[case(AlarmState::Enrollment, AlarmState::Armed, false)]
    fn transition_table(
        #[case] from: AlarmState,
        #[case] to: AlarmState,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn ringing_implies_armed() {
        assert!(AlarmState::Ringing.is_armed());
        assert!(AlarmState::Armed.is_armed());
        assert!(!AlarmState::Disarmed.is_armed());
        assert!(!AlarmState::Enrollment.is_armed());
    }

    #[test]
    fn no_self_transitions() {
        for state in [
            AlarmState::Disarmed,
            AlarmState::Armed,
            AlarmState::Ringing,
            AlarmState::Enrollment,
        ] {
            assert!(!state.can_transition_to(state));
        }
    }
}
