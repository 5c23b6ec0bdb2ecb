//! Enrolled NFC credential store.
//!
//! Cards live in one settings block: a count byte followed by 5-byte
//! records (4 UID bytes plus one reserved byte for a future per-card
//! flag). The store is append-only apart from the bulk erase.

use crate::Result;
use hestia_core::{CardUid, Error};
use hestia_hardware::{SettingKey, SettingsStore};
use tracing::{info, warn};

/// Record width in the persisted block.
const RECORD_LEN: usize = 5;

/// Hard cap on enrolled cards, bounded by the settings block size.
pub const MAX_CARDS: usize = 20;

/// In-memory view of the enrolled cards, backed by the settings store.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    cards: Vec<CardUid>,
}

impl CardStore {
    /// Load the card list from the settings store. A missing or
    /// malformed block yields an empty store.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let Some(block) = store.read(SettingKey::Cards) else {
            return CardStore::default();
        };
        let Some((&count, records)) = block.split_first() else {
            return CardStore::default();
        };
        let count = usize::from(count).min(MAX_CARDS);
        if records.len() < count * RECORD_LEN {
            warn!("card block shorter than its count byte, ignoring");
            return CardStore::default();
        }
        let cards = records
            .chunks_exact(RECORD_LEN)
            .take(count)
            .filter_map(|record| CardUid::from_bytes(&record[..4]).ok())
            .collect();
        CardStore { cards }
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn contains(&self, uid: CardUid) -> bool {
        self.cards.iter().any(|known| *known == uid)
    }

    /// Enroll a new card and persist the updated block.
    ///
    /// # Errors
    /// `DuplicateCard` when the UID is already enrolled (the stored list
    /// is unchanged), `OutOfRange` when the store is full.
    pub fn enroll(&mut self, store: &mut dyn SettingsStore, uid: CardUid) -> Result<()> {
        if self.contains(uid) {
            return Err(Error::DuplicateCard(uid.to_string()).into());
        }
        if self.cards.len() >= MAX_CARDS {
            return Err(Error::OutOfRange(format!("card store full ({MAX_CARDS})")).into());
        }
        self.cards.push(uid);
        self.persist(store)?;
        info!(card = %uid, count = self.cards.len(), "card enrolled");
        Ok(())
    }

    /// Erase every enrolled card. Irreversible.
    ///
    /// # Errors
    /// Propagates settings-store write failures.
    pub fn erase_all(&mut self, store: &mut dyn SettingsStore) -> Result<()> {
        self.cards.clear();
        self.persist(store)?;
        info!("all cards erased");
        Ok(())
    }

    fn persist(&self, store: &mut dyn SettingsStore) -> Result<()> {
        let mut block = Vec::with_capacity(1 + self.cards.len() * RECORD_LEN);
        block.push(self.cards.len() as u8);
        for card in &self.cards {
            block.extend_from_slice(card.as_bytes());
            block.push(0);
        }
        store.write(SettingKey::Cards, &block)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_hardware::mock::MemoryStore;

    #[test]
    fn enroll_persists_and_reloads() {
        let (mut store, _) = MemoryStore::new();
        let mut cards = CardStore::default();
        let a = CardUid::new([1, 2, 3, 4]);
        let b = CardUid::new([5, 6, 7, 8]);

        cards.enroll(&mut store, a).unwrap();
        cards.enroll(&mut store, b).unwrap();

        let reloaded = CardStore::load(&store);
        assert_eq!(reloaded.count(), 2);
        assert!(reloaded.contains(a));
        assert!(reloaded.contains(b));
    }

    #[test]
    fn duplicate_enrollment_leaves_count_unchanged() {
        let (mut store, handle) = MemoryStore::new();
        let mut cards = CardStore::default();
        let uid = CardUid::new([1, 2, 3, 4]);

        cards.enroll(&mut store, uid).unwrap();
        let writes = handle.physical_writes();

        let err = cards.enroll(&mut store, uid).unwrap_err();
        assert!(matches!(
            err,
            crate::AlarmError::Core(Error::DuplicateCard(_))
        ));
        assert_eq!(cards.count(), 1);
        assert_eq!(handle.physical_writes(), writes);
    }

    #[test]
    fn erase_all_is_final() {
        let (mut store, _) = MemoryStore::new();
        let mut cards = CardStore::default();
        cards.enroll(&mut store, CardUid::new([1, 2, 3, 4])).unwrap();

        cards.erase_all(&mut store).unwrap();
        assert_eq!(cards.count(), 0);
        assert_eq!(CardStore::load(&store).count(), 0);
    }

    #[test]
    fn malformed_block_loads_empty() {
        let (store, handle) = MemoryStore::new();
        // Count byte claims 3 cards but no records follow.
        handle.seed(SettingKey::Cards, &[3]);
        assert_eq!(CardStore::load(&store).count(), 0);
    }
}
