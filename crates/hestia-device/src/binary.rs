//! Plain two-state output: relay, beacon, door LED, siren.

use crate::{
    Result,
    capability::{Identifiable, Lockable, Switchable, Tickable},
    context::DeviceCtx,
    output::OutputCore,
};
use hestia_core::DeviceId;
use hestia_hardware::SwitchActuator;
use tracing::debug;

/// An output driven through a [`SwitchActuator`].
pub struct BinaryOutput {
    core: OutputCore,
    actuator: Box<dyn SwitchActuator>,
}

impl BinaryOutput {
    pub fn new(id: DeviceId, name: impl Into<String>, actuator: Box<dyn SwitchActuator>) -> Self {
        BinaryOutput {
            core: OutputCore::new(id, name),
            actuator,
        }
    }

    fn set_state(&mut self, ctx: &mut DeviceCtx, on: bool, share: bool) -> Result<()> {
        if !self.core.transition_allowed(on)? {
            return Ok(());
        }
        self.actuator.set(on)?;
        self.core.commit(on);
        ctx.hub.notify_state(self.core.id(), on);
        if share {
            ctx.panel
                .show_message(&format!("{} {}", self.core.name(), if on { "ON" } else { "OFF" }));
        }
        debug!(device = %self.core.id(), on, "output switched");
        Ok(())
    }
}

impl Identifiable for BinaryOutput {
    fn id(&self) -> DeviceId {
        self.core.id()
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn is_operational(&self) -> bool {
        self.core.is_operational()
    }
}

impl Switchable for BinaryOutput {
    fn is_on(&self) -> bool {
        self.core.is_on()
    }

    fn turn_on(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        self.set_state(ctx, true, share)
    }

    fn turn_off(&mut self, ctx: &mut DeviceCtx, share: bool) -> Result<()> {
        self.set_state(ctx, false, share)
    }
}

impl Lockable for BinaryOutput {
    fn lock(&mut self) {
        self.core.lock();
    }

    fn unlock(&mut self) {
        self.core.unlock();
    }

    fn is_locked(&self) -> bool {
        self.core.is_locked()
    }
}

impl Tickable for BinaryOutput {
    fn tick(&mut self, _ctx: &mut DeviceCtx) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_hardware::mock::{
        MemoryStore, MockPanel, MockSwitch, RecordingHub, ScriptedMic,
    };
    use hestia_hardware::HubEvent;

    struct Rig {
        hub: RecordingHub,
        hub_handle: hestia_hardware::mock::RecordingHubHandle,
        panel: MockPanel,
        panel_handle: hestia_hardware::mock::MockPanelHandle,
        mic: ScriptedMic,
        store: MemoryStore,
    }

    impl Rig {
        fn new() -> Self {
            let (hub, hub_handle) = RecordingHub::new();
            let (panel, panel_handle) = MockPanel::new();
            let (mic, _) = ScriptedMic::new(0);
            let (store, _) = MemoryStore::new();
            Rig {
                hub,
                hub_handle,
                panel,
                panel_handle,
                mic,
                store,
            }
        }

        fn ctx(&mut self, now_ms: u64) -> DeviceCtx<'_> {
            DeviceCtx {
                hub: &mut self.hub,
                panel: &mut self.panel,
                mic: &mut self.mic,
                store: &mut self.store,
                now_ms,
            }
        }
    }

    fn output() -> (BinaryOutput, hestia_hardware::mock::MockSwitchHandle) {
        let (switch, handle) = MockSwitch::new();
        let out = BinaryOutput::new(DeviceId::new(21).unwrap(), "garage relay", Box::new(switch));
        (out, handle)
    }

    #[test]
    fn turn_on_is_idempotent() {
        let mut rig = Rig::new();
        let (mut out, switch) = output();

        out.turn_on(&mut rig.ctx(0), false).unwrap();
        out.turn_on(&mut rig.ctx(10), false).unwrap();

        // One actuation, one hub notification, no panel feedback.
        assert_eq!(switch.drive_count(), 1);
        assert_eq!(rig.hub_handle.event_count(), 1);
        assert!(rig.panel_handle.outputs().is_empty());
        assert!(out.is_on());
    }

    #[test]
    fn locked_output_is_inert() {
        let mut rig = Rig::new();
        let (mut out, switch) = output();

        out.turn_on(&mut rig.ctx(0), false).unwrap();
        out.lock();
        assert!(out.turn_off(&mut rig.ctx(10), false).is_err());
        assert!(out.toggle(&mut rig.ctx(20), false).is_err());

        assert!(out.is_on());
        assert_eq!(switch.drive_count(), 1);

        out.unlock();
        // Unlock restores nothing; the device stays where it was.
        assert!(out.is_on());
    }

    #[test]
    fn share_flag_only_drives_the_panel() {
        let mut rig = Rig::new();
        let (mut out, _switch) = output();

        out.turn_on(&mut rig.ctx(0), true).unwrap();
        assert_eq!(
            rig.panel_handle.messages(),
            vec!["garage relay ON".to_string()]
        );
        assert_eq!(
            rig.hub_handle.last_event(),
            Some(HubEvent::State {
                id: out.id(),
                on: true
            })
        );
    }

    #[test]
    fn toggle_dispatches_to_opposite_state() {
        let mut rig = Rig::new();
        let (mut out, switch) = output();

        out.toggle(&mut rig.ctx(0), false).unwrap();
        assert!(out.is_on());
        out.toggle(&mut rig.ctx(10), false).unwrap();
        assert!(!out.is_on());
        assert_eq!(switch.history(), vec![true, false]);
    }
}
