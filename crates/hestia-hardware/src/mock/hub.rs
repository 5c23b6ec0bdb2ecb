//! Recording hub bridge for tests.

use crate::{
    traits::HubBridge,
    types::{HubEvent, HubRecord},
};
use hestia_core::{DeviceId, Rgb, StripModeKind};
use std::sync::{Arc, Mutex};

/// Hub bridge that records every notification instead of sending it.
///
/// # Examples
///
/// ```
/// use hestia_hardware::mock::RecordingHub;
/// use hestia_hardware::{HubBridge, HubEvent};
/// use hestia_core::DeviceId;
///
/// let (mut hub, handle) = RecordingHub::new();
/// let id = DeviceId::new(7).unwrap();
/// hub.notify_state(id, true);
///
/// assert_eq!(handle.events(), vec![HubEvent::State { id, on: true }]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingHub {
    records: Arc<Mutex<Vec<HubRecord>>>,
}

impl RecordingHub {
    pub fn new() -> (Self, RecordingHubHandle) {
        let records = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingHub {
                records: Arc::clone(&records),
            },
            RecordingHubHandle { records },
        )
    }

    fn push(&mut self, event: HubEvent) {
        self.records.lock().unwrap().push(HubRecord::now(event));
    }
}

impl HubBridge for RecordingHub {
    fn notify_availability(&mut self, id: DeviceId, available: bool) {
        self.push(HubEvent::Availability { id, available });
    }

    fn notify_state(&mut self, id: DeviceId, on: bool) {
        self.push(HubEvent::State { id, on });
    }

    fn notify_strip(&mut self, id: DeviceId, mode: StripModeKind, color: Rgb) {
        self.push(HubEvent::Strip { id, mode, color });
    }

    fn notify_alarm(&mut self, id: DeviceId, triggered: bool) {
        self.push(HubEvent::Alarm { id, triggered });
    }

    fn notify_volume(&mut self, id: DeviceId, volume: u8, muted: bool) {
        self.push(HubEvent::Volume { id, volume, muted });
    }

    fn request_playback(&mut self, url: &str) {
        self.push(HubEvent::Playback {
            url: url.to_string(),
        });
    }

    fn speak(&mut self, message: &str) {
        self.push(HubEvent::Speech {
            message: message.to_string(),
        });
    }
}

/// Inspection handle for a [`RecordingHub`].
#[derive(Debug, Clone)]
pub struct RecordingHubHandle {
    records: Arc<Mutex<Vec<HubRecord>>>,
}

impl RecordingHubHandle {
    /// All recorded events, oldest first.
    pub fn events(&self) -> Vec<HubEvent> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.event.clone())
            .collect()
    }

    /// Full records including emission timestamps.
    pub fn records(&self) -> Vec<HubRecord> {
        self.records.lock().unwrap().clone()
    }

    /// The most recent event, if any.
    pub fn last_event(&self) -> Option<HubEvent> {
        self.records.lock().unwrap().last().map(|r| r.event.clone())
    }

    pub fn event_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_emission_order() {
        let (mut hub, handle) = RecordingHub::new();
        let id = DeviceId::new(3).unwrap();

        hub.notify_state(id, true);
        hub.notify_alarm(id, true);
        hub.request_playback("http://media/shows/1.mp4");

        let events = handle.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], HubEvent::State { id, on: true });
        assert_eq!(events[1], HubEvent::Alarm { id, triggered: true });
        assert_eq!(
            events[2],
            HubEvent::Playback {
                url: "http://media/shows/1.mp4".to_string()
            }
        );
    }

    #[test]
    fn clear_resets_the_log() {
        let (mut hub, handle) = RecordingHub::new();
        hub.speak("armed");
        handle.clear();
        assert_eq!(handle.event_count(), 0);
        assert!(handle.last_event().is_none());
    }
}
