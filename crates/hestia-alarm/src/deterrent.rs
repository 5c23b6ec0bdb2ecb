//! Deterrent launcher choreography.
//!
//! When the alarm rings, the launcher slews toward a preset aim point and
//! fires a short burst, fire-and-forget: the ring does not wait for it,
//! and a launcher fault never affects the alarm itself.

use crate::Result;
use hestia_core::constants::{
    LAUNCHER_AIM_WAIT_MS, LAUNCHER_BURST_ROUNDS, LAUNCHER_MIN_BASE_ANGLE,
};
use hestia_hardware::Launcher;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeterrentPhase {
    Idle,
    Aiming { started_ms: u64 },
}

/// Per-tick launcher state machine.
pub struct Deterrent {
    launcher: Box<dyn Launcher>,
    aim_base: u16,
    aim_elevation: u16,
    phase: DeterrentPhase,
}

impl Deterrent {
    pub fn new(launcher: Box<dyn Launcher>, aim_base: u16, aim_elevation: u16) -> Self {
        Deterrent {
            launcher,
            aim_base,
            aim_elevation,
            phase: DeterrentPhase::Idle,
        }
    }

    /// Start slewing toward the aim point. A second engage while already
    /// aiming is ignored, so re-triggers never restart the choreography.
    ///
    /// # Errors
    /// Propagates launcher faults.
    pub fn engage(&mut self, now_ms: u64) -> Result<()> {
        if matches!(self.phase, DeterrentPhase::Aiming { .. }) {
            return Ok(());
        }
        self.launcher.point(self.aim_base, self.aim_elevation)?;
        self.phase = DeterrentPhase::Aiming { started_ms: now_ms };
        info!(base = self.aim_base, elevation = self.aim_elevation, "deterrent aiming");
        Ok(())
    }

    /// Advance the choreography: fire the burst once the base cleared the
    /// minimum angle, or once the aim wait elapsed regardless.
    ///
    /// # Errors
    /// Propagates launcher faults.
    pub fn tick(&mut self, now_ms: u64) -> Result<()> {
        let DeterrentPhase::Aiming { started_ms } = self.phase else {
            return Ok(());
        };
        let angle = self.launcher.base_angle();
        if angle >= LAUNCHER_MIN_BASE_ANGLE
            || now_ms.saturating_sub(started_ms) >= LAUNCHER_AIM_WAIT_MS
        {
            self.launcher.fire(LAUNCHER_BURST_ROUNDS)?;
            self.phase = DeterrentPhase::Idle;
            info!(angle, "deterrent burst fired");
        }
        Ok(())
    }

    pub fn is_aiming(&self) -> bool {
        matches!(self.phase, DeterrentPhase::Aiming { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_hardware::mock::MockLauncher;

    #[test]
    fn fires_once_base_clears_minimum_angle() {
        let (launcher, handle) = MockLauncher::new(20);
        let mut deterrent = Deterrent::new(Box::new(launcher), 90, 15);

        deterrent.engage(0).unwrap();
        deterrent.tick(100).unwrap(); // base at 20, below minimum
        assert!(handle.bursts().is_empty());

        deterrent.tick(200).unwrap(); // base at 40
        assert_eq!(handle.bursts(), vec![LAUNCHER_BURST_ROUNDS]);
        assert!(!deterrent.is_aiming());
    }

    #[test]
    fn fires_after_aim_wait_even_if_base_is_stuck() {
        let (launcher, handle) = MockLauncher::new(0);
        let mut deterrent = Deterrent::new(Box::new(launcher), 90, 15);

        deterrent.engage(0).unwrap();
        deterrent.tick(1_999).unwrap();
        assert!(handle.bursts().is_empty());

        deterrent.tick(2_000).unwrap();
        assert_eq!(handle.bursts().len(), 1);
    }

    #[test]
    fn re_engage_while_aiming_is_ignored() {
        let (launcher, handle) = MockLauncher::new(0);
        let mut deterrent = Deterrent::new(Box::new(launcher), 90, 15);

        deterrent.engage(0).unwrap();
        deterrent.engage(500).unwrap();
        // One aim, one burst at the original schedule.
        deterrent.tick(2_000).unwrap();
        assert_eq!(handle.bursts().len(), 1);
        assert_eq!(handle.target_base(), 90);
    }
}
