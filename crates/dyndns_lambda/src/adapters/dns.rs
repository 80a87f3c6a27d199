use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordChange {
    pub zone_id: String,
    pub record_name: String,
    pub address: String,
    pub ttl: i64,
}

/// Single-shot UPSERT of one A record. Implementations submit exactly one
/// change and report the provider's receipt; retry policy belongs to the
/// invoking platform.
pub trait RecordUpserter {
    fn upsert_address_record(&self, change: &RecordChange) -> Result<String, String>;
}
