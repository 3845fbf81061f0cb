use anomaly_watch_core::{PriceRecord, RecordTable};
use async_trait::async_trait;

use crate::error::{Result, StoreError};

/// Source of the fully materialized record table.
///
/// Implementations are created once per process and passed explicitly to
/// whatever drives the pipeline.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Loads every record. Dates are already timezone-naive calendar dates.
    async fn load(&self) -> Result<RecordTable>;

    fn name(&self) -> &str;
}

/// Store over records already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Vec<PriceRecord>,
}

impl InMemoryRecordStore {
    #[must_use]
    pub const fn new(records: Vec<PriceRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn load(&self) -> Result<RecordTable> {
        if self.records.is_empty() {
            return Err(StoreError::Empty);
        }
        Ok(RecordTable::new(self.records.clone()))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_in_memory_store_returns_copy() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let store = InMemoryRecordStore::new(vec![PriceRecord::new(date, "ABC", 10.0, 5)]);

        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_in_memory_store_is_an_error() {
        let store = InMemoryRecordStore::default();
        assert!(matches!(store.load().await, Err(StoreError::Empty)));
    }
}
