// 🗃️ Record Store - in-memory typed collection
//
// Owned by the caller and passed explicitly, never ambient state. Maps the
// remote service verbs: create → insert, update → mutate by id, delete →
// remove by id. Changes only reach disk through `save_json`.

use crate::aggregate;
use crate::config::PartialPairPolicy;
use crate::dispatch::{dispatch_indexed, parse_json_array, Rejected};
use crate::error::{DispatchError, Result, StoreError};
use crate::records::TypedRecord;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct RecordStore<R: TypedRecord> {
    records: Vec<R>,
}

impl<R: TypedRecord> RecordStore<R> {
    pub fn new() -> Self {
        RecordStore {
            records: Vec::new(),
        }
    }

    /// Build from already-typed records, rejecting duplicate ids
    pub fn from_records(records: Vec<R>) -> Result<Self> {
        let mut store = RecordStore::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Dispatch a JSON array into a store
    ///
    /// Entries that could not be typed and entries repeating an earlier id come
    /// back in the rejected list; the store holds everything else in input order.
    pub fn from_json(text: &str, policy: PartialPairPolicy) -> Result<(Self, Vec<Rejected>)> {
        let values = parse_json_array(text)?;
        let (indexed, mut rejected) = dispatch_indexed::<R>(&values, policy);
        let mut store = RecordStore::new();

        for (index, record) in indexed {
            let id = record.id();
            if store.contains(id) {
                tracing::warn!(id, index, family = R::FAMILY, "duplicate id in input");
                rejected.push(Rejected::new(index, DispatchError::DuplicateId(id)));
                continue;
            }
            store.records.push(record);
        }

        rejected.sort_by_key(|r| r.index);
        Ok((store, rejected))
    }

    pub fn load_json<P: AsRef<Path>>(path: P, policy: PartialPairPolicy) -> Result<(Self, Vec<Rejected>)> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&text, policy)
    }

    pub fn to_json(&self) -> Result<String> {
        let values: Vec<Value> = self
            .records
            .iter()
            .map(|r| Value::Object(r.to_fields()))
            .collect();
        Ok(serde_json::to_string_pretty(&values)?)
    }

    /// Write the whole collection back out (the only way deletes persist)
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), count = self.records.len(), "store saved");
        Ok(())
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    pub fn insert(&mut self, record: R) -> Result<()> {
        if self.contains(record.id()) {
            return Err(StoreError::DuplicateId(record.id()));
        }
        self.records.push(record);
        Ok(())
    }

    /// Replace the record with this id; the stored id is kept
    pub fn update(&mut self, id: i64, mut record: R) -> Result<()> {
        let slot = self.get_mut(id).ok_or(StoreError::NotFound(id))?;
        record.set_id(id);
        *slot = record;
        Ok(())
    }

    /// Edit a record in place
    pub fn update_with<F: FnOnce(&mut R)>(&mut self, id: i64, edit: F) -> Result<()> {
        let slot = self.get_mut(id).ok_or(StoreError::NotFound(id))?;
        edit(slot);
        slot.set_id(id);
        Ok(())
    }

    pub fn remove(&mut self, id: i64) -> Result<R> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(self.records.remove(index))
    }

    pub fn get(&self, id: i64) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut R> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// One past the highest id, 1 for an empty store
    pub fn next_id(&self) -> i64 {
        self.records.iter().map(|r| r.id()).max().map_or(1, |max| max + 1)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Records of one variant ("land", "customer", ...)
    pub fn filter_kind(&self, kind: &str) -> Vec<&R> {
        self.records.iter().filter(|r| r.kind() == kind).collect()
    }

    /// Mean of a numeric attribute, 0 when empty
    pub fn mean_of<F: Fn(&R) -> f64>(&self, accessor: F) -> f64 {
        aggregate::mean(&self.records, accessor)
    }
}

impl<R: TypedRecord> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
