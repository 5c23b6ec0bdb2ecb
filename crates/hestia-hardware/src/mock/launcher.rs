//! Mock deterrent launcher with configurable slew behavior.

use crate::{HardwareError, Result, traits::Launcher};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct LauncherState {
    base: u16,
    elevation: u16,
    /// Degrees the base moves per `base_angle` read, simulating slew.
    slew_per_read: u16,
    target_base: u16,
    fired: Vec<u8>,
}

/// Launcher whose base slews gradually toward the last pointed angle.
///
/// Each `base_angle` read advances the simulated slew by a configurable
/// number of degrees, so a test controls exactly how many polls the aim
/// phase takes.
#[derive(Debug)]
pub struct MockLauncher {
    state: Arc<Mutex<LauncherState>>,
}

impl MockLauncher {
    pub fn new(slew_per_read: u16) -> (Self, MockLauncherHandle) {
        let state = Arc::new(Mutex::new(LauncherState {
            base: 0,
            elevation: 0,
            slew_per_read,
            target_base: 0,
            fired: Vec::new(),
        }));
        (
            MockLauncher {
                state: Arc::clone(&state),
            },
            MockLauncherHandle { state },
        )
    }
}

impl Launcher for MockLauncher {
    fn point(&mut self, base: u16, elevation: u16) -> Result<()> {
        if base > 180 || elevation > 90 {
            return Err(HardwareError::out_of_range(format!(
                "point({base}, {elevation}) outside 0-180 / 0-90"
            )));
        }
        let mut state = self.state.lock().unwrap();
        state.target_base = base;
        state.elevation = elevation;
        Ok(())
    }

    fn base_angle(&self) -> u16 {
        let mut state = self.state.lock().unwrap();
        if state.base < state.target_base {
            state.base = (state.base + state.slew_per_read).min(state.target_base);
        } else if state.base > state.target_base {
            state.base = state.base.saturating_sub(state.slew_per_read).max(state.target_base);
        }
        state.base
    }

    fn fire(&mut self, rounds: u8) -> Result<()> {
        self.state.lock().unwrap().fired.push(rounds);
        Ok(())
    }
}

/// Inspection handle for a [`MockLauncher`].
#[derive(Debug, Clone)]
pub struct MockLauncherHandle {
    state: Arc<Mutex<LauncherState>>,
}

impl MockLauncherHandle {
    /// Burst sizes fired so far, oldest first.
    pub fn bursts(&self) -> Vec<u8> {
        self.state.lock().unwrap().fired.clone()
    }

    pub fn target_base(&self) -> u16 {
        self.state.lock().unwrap().target_base
    }

    pub fn elevation(&self) -> u16 {
        self.state.lock().unwrap().elevation
    }
}
