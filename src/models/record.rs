use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use serde::Deserialize;
use serde_json::{Map, Value};

/// A persisted record that a model-backed slide is built from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub model_type: String,
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// String field, empty if missing.
    pub fn field_str(&self, key: &str) -> String {
        match self.fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn field_i64(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Parse(e) => write!(f, "Parse error: {e}"),
            StoreError::Backend(msg) => write!(f, "Backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Parse(e)
    }
}

/// Model-backed record store.
pub trait RecordStore: Send + Sync {
    /// Fetch one record by type and primary key. `Ok(None)` means the record does not exist.
    fn fetch(&self, model_type: &str, id: i64) -> Result<Option<Record>, StoreError>;

    /// All records of one type, ordered by id.
    fn list(&self, model_type: &str) -> Result<Vec<Record>, StoreError>;
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    records: Vec<Record>,
}

/// In-process record store keyed by (model type, id).
#[derive(Debug, Default)]
pub struct MemoryRecords {
    records: RwLock<BTreeMap<(String, i64), Record>>,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records from a JSON seed document of the form `{"records": [...]}`.
    pub fn from_seed(json: &str) -> Result<Self, StoreError> {
        let seed: SeedFile = serde_json::from_str(json)?;
        let store = Self::new();
        for record in seed.records {
            store.insert(record);
        }
        Ok(store)
    }

    pub fn from_seed_file(path: &str) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_seed(&json)?;
        log::info!("Loaded {} record(s) from {path}", store.len());
        Ok(store)
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: Record) {
        let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
        records.insert((record.model_type.clone(), record.id), record);
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for MemoryRecords {
    fn fetch(&self, model_type: &str, id: i64) -> Result<Option<Record>, StoreError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(&(model_type.to_string(), id)).cloned())
    }

    fn list(&self, model_type: &str) -> Result<Vec<Record>, StoreError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records
            .values()
            .filter(|r| r.model_type == model_type)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "records": [
            {"model_type": "motion", "id": 2, "title": "Budget", "fields": {"number": "A2"}},
            {"model_type": "item", "id": 1, "title": "Opening"},
            {"model_type": "motion", "id": 1, "title": "Statutes"}
        ]
    }"#;

    #[test]
    fn seed_loads_all_records() {
        let store = MemoryRecords::from_seed(SEED).unwrap();
        assert_eq!(store.len(), 3);

        let motion = store.fetch("motion", 2).unwrap().expect("motion 2");
        assert_eq!(motion.title, "Budget");
        assert_eq!(motion.field_str("number"), "A2");
        assert!(store.fetch("motion", 3).unwrap().is_none());
        assert!(store.fetch("item", 2).unwrap().is_none());
    }

    #[test]
    fn list_filters_by_type_in_id_order() {
        let store = MemoryRecords::from_seed(SEED).unwrap();
        let ids: Vec<i64> = store.list("motion").unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn bad_seed_is_a_parse_error() {
        let err = MemoryRecords::from_seed("{\"records\": 5}").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }
}
