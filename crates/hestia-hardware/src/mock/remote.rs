//! Recording IR transmitter.

use crate::{Result, traits::RemoteTransmitter, types::RemoteCommand};
use std::sync::{Arc, Mutex};

/// IR transmitter that records every command instead of keying a diode.
#[derive(Debug, Default)]
pub struct MockRemote {
    sent: Arc<Mutex<Vec<RemoteCommand>>>,
}

impl MockRemote {
    pub fn new() -> (Self, MockRemoteHandle) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        (
            MockRemote {
                sent: Arc::clone(&sent),
            },
            MockRemoteHandle { sent },
        )
    }
}

impl RemoteTransmitter for MockRemote {
    fn send(&mut self, command: RemoteCommand) -> Result<()> {
        self.sent.lock().unwrap().push(command);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MockRemoteHandle {
    sent: Arc<Mutex<Vec<RemoteCommand>>>,
}

impl MockRemoteHandle {
    pub fn sent(&self) -> Vec<RemoteCommand> {
        self.sent.lock().unwrap().clone()
    }

    /// How many times `command` was transmitted.
    pub fn count_of(&self, command: RemoteCommand) -> usize {
        self.sent.lock().unwrap().iter().filter(|&&c| c == command).count()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}
