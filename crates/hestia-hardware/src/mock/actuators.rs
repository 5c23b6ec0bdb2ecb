//! Recording output actuators: switch, strip and light.

use crate::{Result, traits::{LightActuator, StripActuator, SwitchActuator}, types::LightCommand};
use hestia_core::Rgb;
use std::sync::{Arc, Mutex};

/// Switch actuator recording every level it was driven to.
#[derive(Debug, Default)]
pub struct MockSwitch {
    levels: Arc<Mutex<Vec<bool>>>,
}

impl MockSwitch {
    pub fn new() -> (Self, MockSwitchHandle) {
        let levels = Arc::new(Mutex::new(Vec::new()));
        (
            MockSwitch {
                levels: Arc::clone(&levels),
            },
            MockSwitchHandle { levels },
        )
    }
}

impl SwitchActuator for MockSwitch {
    fn set(&mut self, on: bool) -> Result<()> {
        self.levels.lock().unwrap().push(on);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MockSwitchHandle {
    levels: Arc<Mutex<Vec<bool>>>,
}

impl MockSwitchHandle {
    /// Level the switch currently sits at, `false` before any drive.
    pub fn current(&self) -> bool {
        self.levels.lock().unwrap().last().copied().unwrap_or(false)
    }

    /// Every level ever driven, oldest first.
    pub fn history(&self) -> Vec<bool> {
        self.levels.lock().unwrap().clone()
    }

    /// Number of physical drives, regardless of level.
    pub fn drive_count(&self) -> usize {
        self.levels.lock().unwrap().len()
    }
}

/// Strip actuator recording every color written to the data line.
#[derive(Debug, Default)]
pub struct MockStrip {
    colors: Arc<Mutex<Vec<Rgb>>>,
}

impl MockStrip {
    pub fn new() -> (Self, MockStripHandle) {
        let colors = Arc::new(Mutex::new(Vec::new()));
        (
            MockStrip {
                colors: Arc::clone(&colors),
            },
            MockStripHandle { colors },
        )
    }
}

impl StripActuator for MockStrip {
    fn write(&mut self, color: Rgb) -> Result<()> {
        self.colors.lock().unwrap().push(color);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MockStripHandle {
    colors: Arc<Mutex<Vec<Rgb>>>,
}

impl MockStripHandle {
    /// Last color on the wire, `Rgb::OFF` before any write.
    pub fn current(&self) -> Rgb {
        self.colors.lock().unwrap().last().copied().unwrap_or(Rgb::OFF)
    }

    pub fn history(&self) -> Vec<Rgb> {
        self.colors.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.colors.lock().unwrap().len()
    }
}

/// Light actuator recording every command applied.
#[derive(Debug, Default)]
pub struct MockLight {
    commands: Arc<Mutex<Vec<LightCommand>>>,
}

impl MockLight {
    pub fn new() -> (Self, MockLightHandle) {
        let commands = Arc::new(Mutex::new(Vec::new()));
        (
            MockLight {
                commands: Arc::clone(&commands),
            },
            MockLightHandle { commands },
        )
    }
}

impl LightActuator for MockLight {
    fn apply(&mut self, command: LightCommand) -> Result<()> {
        self.commands.lock().unwrap().push(command);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MockLightHandle {
    commands: Arc<Mutex<Vec<LightCommand>>>,
}

impl MockLightHandle {
    pub fn history(&self) -> Vec<LightCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<LightCommand> {
        self.commands.lock().unwrap().last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_records_drives() {
        let (mut switch, handle) = MockSwitch::new();
        switch.set(true).unwrap();
        switch.set(true).unwrap();
        switch.set(false).unwrap();

        assert!(!handle.current());
        assert_eq!(handle.history(), vec![true, true, false]);
        assert_eq!(handle.drive_count(), 3);
    }

    #[test]
    fn strip_defaults_to_off() {
        let (mut strip, handle) = MockStrip::new();
        assert_eq!(handle.current(), Rgb::OFF);

        strip.write(Rgb::new(10, 20, 30)).unwrap();
        assert_eq!(handle.current(), Rgb::new(10, 20, 30));
    }

    #[test]
    fn light_records_commands() {
        let (mut light, handle) = MockLight::new();
        light.apply(LightCommand::Power(true)).unwrap();
        light.apply(LightCommand::Luminosity(80)).unwrap();

        assert_eq!(handle.last(), Some(LightCommand::Luminosity(80)));
        assert_eq!(handle.history().len(), 2);
    }
}
