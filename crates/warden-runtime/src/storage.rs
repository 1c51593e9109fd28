//! RocksDB ledger store.
//!
//! Production implementation of the core's `KeyValueStore` port. Write
//! durability (fsync per write) is on by default and relaxed for tests.

use rocksdb::{IteratorMode, Options, WriteBatch, WriteOptions, DB};
use std::path::Path;
use warden_core::{BatchOperation, KeyValueStore, StoreError};

/// RocksDB tuning for the warden's small-row workload.
#[derive(Debug, Clone)]
pub struct RocksConfig {
    /// Database directory.
    pub path: String,
    /// Write buffer size in bytes.
    pub write_buffer_size: usize,
    /// fsync after each write.
    pub sync_writes: bool,
}

impl RocksConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 8 * 1024 * 1024,
            sync_writes: true,
        }
    }

    /// Smaller buffers, no fsync.
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            write_buffer_size: 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// Durable `KeyValueStore` over RocksDB.
pub struct RocksStore {
    db: DB,
    config: RocksConfig,
}

impl RocksStore {
    /// Open or create the database directory.
    pub fn open(config: RocksConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let db = DB::open(&opts, &config.path)
            .map_err(|e| StoreError::Io(format!("failed to open RocksDB: {e}")))?;
        Ok(Self { db, config })
    }

    fn write_opts(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.config.sync_writes);
        opts
    }
}

impl KeyValueStore for RocksStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.db
            .get(key)
            .map_err(|e| StoreError::Io(format!("get failed: {e}")))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db
            .put_opt(key, value, &self.write_opts())
            .map_err(|e| StoreError::Io(format!("put failed: {e}")))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, StoreError> {
        self.db
            .get_pinned(key)
            .map(|v| v.is_some())
            .map_err(|e| StoreError::Io(format!("exists check failed: {e}")))
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put(&key, &value),
                BatchOperation::Delete { key } => batch.delete(&key),
            }
        }
        self.db
            .write_opt(batch, &self.write_opts())
            .map_err(|e| StoreError::Io(format!("batch write failed: {e}")))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut results = Vec::new();
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, rocksdb::Direction::Forward));
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Io(format!("scan failed: {e}")))?;
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> RocksStore {
        RocksStore::open(RocksConfig::for_testing(
            dir.path().to_string_lossy().to_string(),
        ))
        .unwrap()
    }

    #[test]
    fn basic_operations() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.put(b"k1", b"v1").unwrap();
        assert_eq!(store.get(b"k1").unwrap(), Some(b"v1".to_vec()));
        assert!(store.exists(b"k1").unwrap());
        assert!(!store.exists(b"missing").unwrap());
    }

    #[test]
    fn batch_and_prefix_scan() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store
            .atomic_batch_write(vec![
                BatchOperation::put(b"member:o/r:alice".to_vec(), b"1".to_vec()),
                BatchOperation::put(b"member:o/r:bob".to_vec(), b"2".to_vec()),
                BatchOperation::put(b"claim:o/r:U1".to_vec(), b"alice".to_vec()),
            ])
            .unwrap();

        let members = store.prefix_scan(b"member:o/r:").unwrap();
        assert_eq!(members.len(), 2);

        store
            .atomic_batch_write(vec![BatchOperation::delete(b"claim:o/r:U1".to_vec())])
            .unwrap();
        assert!(!store.exists(b"claim:o/r:U1").unwrap());
    }

    #[test]
    fn survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir);
            store.put(b"durable", b"yes").unwrap();
        }
        let store = open_store(&dir);
        assert_eq!(store.get(b"durable").unwrap(), Some(b"yes".to_vec()));
    }
}
