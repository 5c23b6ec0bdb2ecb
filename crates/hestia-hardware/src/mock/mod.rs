//! Mock peripherals for tests and the emulated station.
//!
//! Every mock comes in a `(Mock, Handle)` pair: the mock implements the
//! boundary trait and is handed to the component under test, while the
//! handle shares the same interior state and lets the test script inputs
//! and inspect recorded outputs.

mod actuators;
mod hub;
mod launcher;
mod mic;
mod nfc;
mod panel;
mod remote;
mod store;

pub use actuators::{
    MockLight, MockLightHandle, MockStrip, MockStripHandle, MockSwitch, MockSwitchHandle,
};
pub use hub::{RecordingHub, RecordingHubHandle};
pub use launcher::{MockLauncher, MockLauncherHandle};
pub use mic::{ScriptedMic, ScriptedMicHandle};
pub use nfc::{MockNfc, MockNfcHandle};
pub use panel::{MockPanel, MockPanelHandle, PanelOutput};
pub use remote::{MockRemote, MockRemoteHandle};
pub use store::{MemoryStore, MemoryStoreHandle};
