//! In-memory account store
//!
//! Backing medium for tests and single-process deployments. A single mutex
//! serializes all record access, which satisfies the per-card exclusion the
//! port requires when several terminals share one store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::result::{Error, Result};
use crate::domain::CardRecord;
use crate::ports::AccountStore;

/// In-memory `AccountStore` adapter
pub struct MemoryStore {
    records: Mutex<HashMap<String, CardRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, CardRecord>>> {
        self.records
            .lock()
            .map_err(|e| Error::store(format!("Lock poisoned: {}", e)))
    }

    /// Number of records in the store
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for MemoryStore {
    fn find(&self, card_id: &str) -> Result<CardRecord> {
        let records = self.lock()?;
        records
            .get(card_id)
            .cloned()
            .ok_or_else(|| Error::not_found(card_id))
    }

    fn save(&self, card_id: &str, mut record: CardRecord) -> Result<()> {
        record.updated_at = Utc::now();
        let mut records = self.lock()?;
        records.insert(card_id.to_string(), record);
        Ok(())
    }

    fn update(
        &self,
        card_id: &str,
        op: &mut dyn FnMut(&mut CardRecord) -> Result<()>,
    ) -> Result<()> {
        let mut records = self.lock()?;
        let record = records
            .get_mut(card_id)
            .ok_or_else(|| Error::not_found(card_id))?;
        let outcome = op(record);
        record.updated_at = Utc::now();
        outcome
    }
}
