//! Scripted microphone.

use crate::traits::Microphone;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Microphone that replays a scripted sequence of amplitude samples.
///
/// When the script runs out it keeps returning `idle_level`, which keeps
/// long ticking tests quiet instead of panicking on exhaustion.
#[derive(Debug)]
pub struct ScriptedMic {
    samples: Arc<Mutex<VecDeque<u16>>>,
    idle_level: u16,
}

impl ScriptedMic {
    pub fn new(idle_level: u16) -> (Self, ScriptedMicHandle) {
        let samples = Arc::new(Mutex::new(VecDeque::new()));
        (
            ScriptedMic {
                samples: Arc::clone(&samples),
                idle_level,
            },
            ScriptedMicHandle { samples },
        )
    }
}

impl Microphone for ScriptedMic {
    fn read_level(&mut self) -> u16 {
        self.samples
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.idle_level)
    }
}

/// Scripting handle for a [`ScriptedMic`].
#[derive(Debug, Clone)]
pub struct ScriptedMicHandle {
    samples: Arc<Mutex<VecDeque<u16>>>,
}

impl ScriptedMicHandle {
    pub fn push(&self, sample: u16) {
        self.samples.lock().unwrap().push_back(sample);
    }

    pub fn push_all(&self, samples: &[u16]) {
        self.samples.lock().unwrap().extend(samples.iter().copied());
    }
}
