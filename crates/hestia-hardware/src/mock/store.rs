//! In-memory settings store with a physical-write counter.

use crate::{Result, traits::SettingsStore, types::SettingKey};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct StoreState {
    blocks: HashMap<SettingKey, Vec<u8>>,
    physical_writes: usize,
}

/// Settings store backed by a hash map.
///
/// Counts physical writes so tests can assert the update-if-changed and
/// debounce policies actually bound wear.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn new() -> (Self, MemoryStoreHandle) {
        let state = Arc::new(Mutex::new(StoreState::default()));
        (
            MemoryStore {
                state: Arc::clone(&state),
            },
            MemoryStoreHandle { state },
        )
    }
}

impl SettingsStore for MemoryStore {
    fn read(&self, key: SettingKey) -> Option<Vec<u8>> {
        self.state.lock().unwrap().blocks.get(&key).cloned()
    }

    fn write(&mut self, key: SettingKey, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.blocks.get(&key).is_some_and(|held| held == data) {
            return Ok(());
        }
        state.blocks.insert(key, data.to_vec());
        state.physical_writes += 1;
        Ok(())
    }
}

/// Inspection handle for a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryStoreHandle {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStoreHandle {
    /// Number of writes that actually hit the medium.
    pub fn physical_writes(&self) -> usize {
        self.state.lock().unwrap().physical_writes
    }

    /// Preload a block before the component under test boots.
    pub fn seed(&self, key: SettingKey, data: &[u8]) {
        self.state.lock().unwrap().blocks.insert(key, data.to_vec());
    }

    pub fn get(&self, key: SettingKey) -> Option<Vec<u8>> {
        self.state.lock().unwrap().blocks.get(&key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_write_is_skipped() {
        let (mut store, handle) = MemoryStore::new();

        store.write(SettingKey::RainbowSpeed, &[70]).unwrap();
        store.write(SettingKey::RainbowSpeed, &[70]).unwrap();
        assert_eq!(handle.physical_writes(), 1);

        store.write(SettingKey::RainbowSpeed, &[71]).unwrap();
        assert_eq!(handle.physical_writes(), 2);
    }

    #[test]
    fn seed_then_read() {
        let (store, handle) = MemoryStore::new();
        handle.seed(SettingKey::TvVolume, &[12]);
        assert_eq!(store.read(SettingKey::TvVolume), Some(vec![12]));
        assert_eq!(store.read(SettingKey::Cards), None);
    }
}
