//! Capability traits for control-box devices.
//!
//! Devices compose small capabilities instead of inheriting from a deep
//! device hierarchy: everything has an identity, switchable things can be
//! driven on and off, lockable things can be reserved by a controlling
//! component, and tickable things advance their animations once per
//! scheduler pass.

use crate::{Result, context::DeviceCtx};
use hestia_core::DeviceId;

/// Identity and health of a device.
pub trait Identifiable {
    fn id(&self) -> DeviceId;
    fn name(&self) -> &str;

    /// False once the device's setup failed; never becomes true again
    /// within the same process lifetime.
    fn is_operational(&self) -> bool;
}

/// A device with a binary on/off state.
///
/// All mutators apply the same guard order: the device must be
/// operational, then unlocked, and only a genuine transition actuates.
/// Redundant commands succeed silently without touching hardware or the
/// hub. `share` selects whether the operator panel shows feedback; it
/// never affects the logical transition.
pub trait Switchable: Identifiable {
    fn is_on(&self) -> bool;

    /// # Errors
    /// Fails when the device is non-operational, locked, or actuation
    /// fails.
    fn turn_on(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()>;

    /// # Errors
    /// Same guard contract as [`Switchable::turn_on`].
    fn turn_off(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()>;

    /// Dispatch to the opposite mutator for the current state.
    ///
    /// # Errors
    /// Same guard contract as [`Switchable::turn_on`].
    fn toggle(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        if self.is_on() {
            self.turn_off(ctx, share)
        } else {
            self.turn_on(ctx, share)
        }
    }
}

/// A device that a controlling component (alarm, show sequencer) can
/// reserve.
///
/// Locking is pure bookkeeping: it never changes the on/off state, and
/// unlocking never restores a prior state.
pub trait Lockable {
    fn lock(&mut self);
    fn unlock(&mut self);
    fn is_locked(&self) -> bool;
}

/// A device with time-driven behavior.
pub trait Tickable {
    /// Advance animations and timers to `ctx.now_ms`.
    ///
    /// # Errors
    /// Fails only on actuation errors; pure bookkeeping never fails.
    fn tick(&mut self, ctx: &mut DeviceCtx) -> Result<()>;
}
