//! Per-tick context threaded through device operations.

use hestia_hardware::{HubBridge, Microphone, OperatorPanel, SettingsStore};

/// Shared peripherals every device operation may need, plus the current
/// tick instant.
///
/// The station constructs one of these per tick (or per command) from the
/// peripherals it owns; devices never hold references to the hub, panel,
/// microphone or settings store themselves.
pub struct DeviceCtx<'a> {
    pub hub: &'a mut dyn HubBridge,
    pub panel: &'a mut dyn OperatorPanel,
    pub mic: &'a mut dyn Microphone,
    pub store: &'a mut dyn SettingsStore,
    /// Milliseconds from the injected clock at the start of this tick.
    pub now_ms: u64,
}
