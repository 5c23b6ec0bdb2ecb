//! End-to-end intrusion scenario against a fully assembled station.

use hestia_alarm::{Alarm, AlarmDevices, AlarmState, Deterrent};
use hestia_core::{DeviceId, ManualClock, Percent, Rgb};
use hestia_device::{BinaryOutput, OutputDevice, RainbowMode, RgbStrip, StripMode};
use hestia_hardware::HubEvent;
use hestia_hardware::mock::{
    MemoryStore, MockLauncher, MockNfc, MockPanel, MockRemote, MockStrip, MockStripHandle,
    MockSwitch, MockSwitchHandle, RecordingHub, RecordingHubHandle, ScriptedMic,
};
use hestia_show::Television;
use hestia_station::{Station, StationBuilder};
use std::sync::Arc;

const DOOR_LED: u8 = 1;
const BEACON: u8 = 2;
const STRIP: u8 = 3;
const SIREN: u8 = 4;
const ALARM: u8 = 9;
const TV: u8 = 20;

fn id(n: u8) -> DeviceId {
    DeviceId::new(n).unwrap()
}

struct Handles {
    hub: RecordingHubHandle,
    door_led: MockSwitchHandle,
    beacon: MockSwitchHandle,
    siren: MockSwitchHandle,
    strip: MockStripHandle,
    clock: Arc<ManualClock>,
}

fn station() -> (Station, Handles) {
    let (hub, hubh) = RecordingHub::new();
    let (panel, _) = MockPanel::new();
    let (mic, _) = ScriptedMic::new(0);
    let (store, _) = MemoryStore::new();
    let (nfc, _) = MockNfc::new();
    let (remote, _) = MockRemote::new();
    let (launcher, _) = MockLauncher::new(45);
    let clock = Arc::new(ManualClock::new());

    let (door_switch, doorh) = MockSwitch::new();
    let (beacon_switch, beaconh) = MockSwitch::new();
    let (siren_switch, sirenh) = MockSwitch::new();
    let (strip_actuator, striph) = MockStrip::new();

    let alarm = Alarm::new(
        id(ALARM),
        "perimeter alarm",
        AlarmDevices {
            door_led: id(DOOR_LED),
            beacon: id(BEACON),
            strip: id(STRIP),
            siren: id(SIREN),
        },
        Box::new(nfc),
        Deterrent::new(Box::new(launcher), 90, 15),
    );
    let television = Television::new(id(TV), "living room tv", Box::new(remote));

    let station = StationBuilder::new()
        .device(OutputDevice::Binary(BinaryOutput::new(
            id(DOOR_LED),
            "door led",
            Box::new(door_switch),
        )))
        .unwrap()
        .device(OutputDevice::Binary(BinaryOutput::new(
            id(BEACON),
            "beacon",
            Box::new(beacon_switch),
        )))
        .unwrap()
        .device(OutputDevice::Strip(RgbStrip::new(
            id(STRIP),
            "sofa strip",
            StripMode::Rainbow(RainbowMode::new(Percent::new(50))),
            Box::new(strip_actuator),
        )))
        .unwrap()
        .device(OutputDevice::Binary(BinaryOutput::new(
            id(SIREN),
            "siren relay",
            Box::new(siren_switch),
        )))
        .unwrap()
        .alarm(alarm)
        .television(television)
        .hub(hub)
        .panel(panel)
        .microphone(mic)
        .store(store)
        .clock(Arc::clone(&clock))
        .build()
        .unwrap();

    (
        station,
        Handles {
            hub: hubh,
            door_led: doorh,
            beacon: beaconh,
            siren: sirenh,
            strip: striph,
            clock,
        },
    )
}

#[test]
fn armed_door_trigger_rings_then_auto_stops() {
    let (mut station, h) = station();
    station.setup();

    station.arm().unwrap();
    assert_eq!(station.alarm().state(), AlarmState::Armed);
    assert!(h.door_led.current());

    h.clock.advance(100);
    station.trigger_alarm().unwrap();

    assert_eq!(station.alarm().state(), AlarmState::Ringing);
    assert!(h.siren.current());
    assert!(h.beacon.current());
    assert_eq!(h.strip.current(), Rgb::RED);
    assert!(h.hub.events().contains(&HubEvent::Alarm {
        id: id(ALARM),
        triggered: true,
    }));

    // Partway through the blink cycle the strip goes dark.
    h.clock.advance(150);
    station.tick();
    assert_eq!(h.strip.current(), Rgb::OFF);
    assert!(h.siren.current());

    // Five seconds after the trigger the ring stops by itself: everything
    // quiet and dark, the alarm back to armed, the hub told.
    h.clock.set(5_100);
    station.tick();
    assert_eq!(station.alarm().state(), AlarmState::Armed);
    assert!(!h.siren.current());
    assert!(!h.beacon.current());
    assert_eq!(h.strip.current(), Rgb::OFF);
    assert!(h.door_led.current());
    assert!(h.hub.events().contains(&HubEvent::Alarm {
        id: id(ALARM),
        triggered: false,
    }));
}

#[test]
fn trigger_while_disarmed_arms_first_and_still_rings() {
    let (mut station, h) = station();
    station.setup();
    assert_eq!(station.alarm().state(), AlarmState::Disarmed);

    station.trigger_alarm().unwrap();

    assert_eq!(station.alarm().state(), AlarmState::Ringing);
    assert!(h.door_led.current());
    assert!(h.siren.current());
}

#[test]
fn repeated_triggers_extend_the_ring_instead_of_restarting_it() {
    let (mut station, h) = station();
    station.setup();
    station.arm().unwrap();

    station.trigger_alarm().unwrap();
    h.clock.set(4_000);
    station.trigger_alarm().unwrap();

    // The original deadline has passed, the extended one has not.
    h.clock.set(5_500);
    station.tick();
    assert_eq!(station.alarm().state(), AlarmState::Ringing);

    h.clock.set(9_000);
    station.tick();
    assert_eq!(station.alarm().state(), AlarmState::Armed);
    assert!(!h.siren.current());
}
