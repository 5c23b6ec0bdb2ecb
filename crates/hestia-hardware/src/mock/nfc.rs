//! Mock NFC reader.

use crate::{HardwareError, Result, traits::NfcReader};
use hestia_core::CardUid;
use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

/// NFC reader fed from a scripted queue of card presentations.
///
/// The handle can also mark the chip dead, which makes `setup` fail the
/// way a missing or miswired reader does on real hardware.
#[derive(Debug, Default)]
pub struct MockNfc {
    queue: Arc<Mutex<VecDeque<CardUid>>>,
    dead: Arc<AtomicBool>,
}

impl MockNfc {
    pub fn new() -> (Self, MockNfcHandle) {
        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let dead = Arc::new(AtomicBool::new(false));
        (
            MockNfc {
                queue: Arc::clone(&queue),
                dead: Arc::clone(&dead),
            },
            MockNfcHandle { queue, dead },
        )
    }
}

impl NfcReader for MockNfc {
    fn setup(&mut self) -> Result<()> {
        if self.dead.load(Ordering::SeqCst) {
            return Err(HardwareError::initialization_failed(
                "NFC chip did not answer version request",
            ));
        }
        Ok(())
    }

    fn poll_card(&mut self) -> Result<Option<CardUid>> {
        if self.dead.load(Ordering::SeqCst) {
            return Err(HardwareError::disconnected("NFC reader"));
        }
        Ok(self.queue.lock().unwrap().pop_front())
    }
}

/// Scripting handle for a [`MockNfc`].
#[derive(Debug, Clone)]
pub struct MockNfcHandle {
    queue: Arc<Mutex<VecDeque<CardUid>>>,
    dead: Arc<AtomicBool>,
}

impl MockNfcHandle {
    /// Queue a badge presentation for the next poll.
    pub fn present_card(&self, uid: CardUid) {
        self.queue.lock().unwrap().push_back(uid);
    }

    /// Simulate a dead or disconnected chip.
    pub fn kill(&self) {
        self.dead.store(true, Ordering::SeqCst);
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}
