//! In-memory store. Same contract as `DirStore`, no filesystem.

use super::KioskStore;
use crate::{
    error::{SimError, SimResult},
    registry::KioskRegistry,
    transaction::TransactionLog,
    types::KioskId,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct Entry {
    registry: Option<KioskRegistry>,
    ledgers: BTreeMap<NaiveDate, TransactionLog>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    kiosks: BTreeMap<KioskId, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kiosk key with no registry, as if its files had gone
    /// missing. Loading it yields `MissingRegistry`.
    pub fn add_empty_kiosk(&mut self, kiosk_id: &str) {
        self.kiosks.entry(kiosk_id.to_string()).or_default();
    }

    pub fn ledger(&self, kiosk_id: &str, date: NaiveDate) -> Option<&TransactionLog> {
        self.kiosks.get(kiosk_id)?.ledgers.get(&date)
    }
}

impl KioskStore for MemoryStore {
    fn location(&self) -> String {
        "memory".into()
    }

    fn list_kiosks(&self) -> SimResult<Vec<KioskId>> {
        Ok(self.kiosks.keys().cloned().collect())
    }

    fn save_registry(&mut self, registry: &KioskRegistry) -> SimResult<()> {
        self.kiosks
            .entry(registry.kiosk_id().to_string())
            .or_default()
            .registry = Some(registry.clone());
        Ok(())
    }

    fn load_registry(&self, kiosk_id: &str) -> SimResult<KioskRegistry> {
        self.kiosks
            .get(kiosk_id)
            .and_then(|e| e.registry.clone())
            .ok_or_else(|| SimError::MissingRegistry {
                kiosk_id: kiosk_id.to_string(),
                path: PathBuf::from(format!("memory://kiosk_{kiosk_id}")),
            })
    }

    fn save_transactions(&mut self, kiosk_id: &str, log: &TransactionLog) -> SimResult<()> {
        self.kiosks
            .entry(kiosk_id.to_string())
            .or_default()
            .ledgers
            .insert(log.date, log.clone());
        Ok(())
    }

    fn load_transactions(&self, kiosk_id: &str) -> SimResult<Vec<TransactionLog>> {
        Ok(self
            .kiosks
            .get(kiosk_id)
            .map(|e| e.ledgers.values().cloned().collect())
            .unwrap_or_default())
    }
}
