//! Shared on/off, lock and health bookkeeping for output devices.

use crate::Result;
use hestia_core::{DeviceId, Error};

/// State common to every output device.
///
/// Concrete devices embed an `OutputCore` and funnel every mutator
/// through [`OutputCore::transition_allowed`] /
/// [`OutputCore::commit`], which together enforce the guard order:
/// operational first, then unlocked, then a genuine state change.
#[derive(Debug)]
pub struct OutputCore {
    id: DeviceId,
    name: String,
    operational: bool,
    on: bool,
    locked: bool,
}

impl OutputCore {
    pub fn new(id: DeviceId, name: impl Into<String>) -> Self {
        OutputCore {
            id,
            name: name.into(),
            operational: true,
            on: false,
            locked: false,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Mark the device permanently failed for this process lifetime.
    pub fn mark_failed(&mut self) {
        self.operational = false;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Check the mutation guards without a target state.
    ///
    /// # Errors
    /// `NotOperational` before `Locked`, matching the guard order.
    pub fn check_mutable(&self) -> Result<()> {
        if !self.operational {
            return Err(Error::NotOperational(self.name.clone()).into());
        }
        if self.locked {
            return Err(Error::Locked(self.name.clone()).into());
        }
        Ok(())
    }

    /// Run the full guard chain for a transition to `on`.
    ///
    /// Returns `Ok(false)` for a redundant command (already in the target
    /// state): the caller must then skip actuation and notification.
    ///
    /// # Errors
    /// Same contract as [`OutputCore::check_mutable`].
    pub fn transition_allowed(&self, on: bool) -> Result<bool> {
        self.check_mutable()?;
        Ok(self.on != on)
    }

    /// Record a state change after successful actuation.
    pub fn commit(&mut self, on: bool) {
        self.on = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_core::DeviceId;

    fn core() -> OutputCore {
        OutputCore::new(DeviceId::new(10).unwrap(), "relay")
    }

    #[test]
    fn redundant_transition_is_not_allowed_through() {
        let mut core = core();
        assert!(core.transition_allowed(true).unwrap());
        core.commit(true);
        assert!(!core.transition_allowed(true).unwrap());
        assert!(core.transition_allowed(false).unwrap());
    }

    #[test]
    fn non_operational_wins_over_locked() {
        let mut core = core();
        core.lock();
        core.mark_failed();
        let err = core.transition_allowed(true).unwrap_err();
        assert!(matches!(
            err,
            crate::DeviceError::Core(Error::NotOperational(_))
        ));
    }

    #[test]
    fn locked_core_rejects_transitions_without_state_change() {
        let mut core = core();
        core.commit(true);
        core.lock();
        assert!(core.transition_allowed(false).is_err());
        assert!(core.is_on());

        core.unlock();
        // Unlocking restores nothing.
        assert!(core.is_on());
    }
}
