use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("homecook");

/// RedbStore is a KVStore backed by redb, a pure-Rust embedded key-value
/// database. Every write is its own committed transaction.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(KVError::storage)?;

        // Create the table up front so readers never see a missing table.
        let txn = db.begin_write().map_err(KVError::storage)?;
        txn.open_table(TABLE).map_err(KVError::storage)?;
        txn.commit().map_err(KVError::storage)?;

        tracing::debug!("opened redb store at {}", path.display());
        Ok(Self { db })
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = txn.open_table(TABLE).map_err(KVError::storage)?;
        let value = table.get(key).map_err(KVError::storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let txn = self.db.begin_write().map_err(KVError::storage)?;
        {
            let mut table = txn.open_table(TABLE).map_err(KVError::storage)?;
            table.insert(key, value).map_err(KVError::storage)?;
        }
        txn.commit().map_err(KVError::storage)
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.take(key).map(|_| ())
    }

    fn take(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let txn = self.db.begin_write().map_err(KVError::storage)?;
        let previous = {
            let mut table = txn.open_table(TABLE).map_err(KVError::storage)?;
            let removed = table.remove(key).map_err(KVError::storage)?;
            removed.map(|v| v.value().to_vec())
        };
        txn.commit().map_err(KVError::storage)?;
        Ok(previous)
    }
}
