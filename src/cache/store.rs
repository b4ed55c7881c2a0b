//! Mtime-validated key-value stores.
//!
//! Strategy: cache a per-file value keyed by (path, mtime). On a hit with
//! matching mtime, skip the collaborator call entirely; a changed mtime
//! silently evicts the entry.
//!
//! Two backends implement the same [`KeyValueStore`] contract:
//! - [`RedbStore`]: persistent, survives process restarts
//!   (`.repomap.cache/<name>.redb`, bincode-serialized entries)
//! - [`MemoryStore`]: process-local HashMap, used in tests and by callers
//!   that don't want on-disk state

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use anyhow::{Context, Result};
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Single table per database file. Key = absolute file path,
/// value = bincode-serialized `CacheEntry<T>`.
const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");

/// Mtime-validated store contract shared by both backends.
///
/// `get` returns the cached value only when the stored mtime matches;
/// `set` overwrites any previous entry for the key.
pub trait KeyValueStore<T> {
    fn get(&self, key: &str, mtime: SystemTime) -> Option<T>;
    fn set(&self, key: &str, mtime: SystemTime, value: &T) -> Result<()>;
}

/// Cache entry: mtime validation data + the cached value.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry<T> {
    mtime_secs: u64,
    mtime_nanos: u32,
    value: T,
}

impl<T> CacheEntry<T> {
    fn new(mtime: SystemTime, value: T) -> Result<Self> {
        let duration = mtime
            .duration_since(SystemTime::UNIX_EPOCH)
            .context("file mtime is before UNIX_EPOCH")?;

        Ok(Self {
            mtime_secs: duration.as_secs(),
            mtime_nanos: duration.subsec_nanos(),
            value,
        })
    }

    fn is_valid(&self, mtime: SystemTime) -> bool {
        let Ok(duration) = mtime.duration_since(SystemTime::UNIX_EPOCH) else {
            return false;
        };

        self.mtime_secs == duration.as_secs() && self.mtime_nanos == duration.subsec_nanos()
    }
}

/// Persistent store backed by redb.
///
/// Each instance owns one database file under `<root>/.repomap.cache/`,
/// so independent caches (symbols, identifiers) never share a table.
pub struct RedbStore<T> {
    db: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> RedbStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open or create `<root>/.repomap.cache/<name>.redb`.
    pub fn open(root: &Path, name: &str) -> Result<Self> {
        let cache_dir = root.join(".repomap.cache");
        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("failed to create cache directory: {}", cache_dir.display()))?;

        let db_path: PathBuf = cache_dir.join(format!("{name}.redb"));
        let db = Database::create(&db_path)
            .with_context(|| format!("failed to open cache database: {}", db_path.display()))?;

        Ok(Self {
            db,
            _marker: std::marker::PhantomData,
        })
    }
}

impl<T> KeyValueStore<T> for RedbStore<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    fn get(&self, key: &str, mtime: SystemTime) -> Option<T> {
        let read_txn = self.db.begin_read().ok()?;
        let table = read_txn.open_table(ENTRIES).ok()?;

        let guard = table.get(key).ok()??;
        let entry: CacheEntry<T> = bincode::deserialize(guard.value()).ok()?;

        // A corrupt or stale entry behaves like a miss
        if entry.is_valid(mtime) {
            Some(entry.value)
        } else {
            None
        }
    }

    fn set(&self, key: &str, mtime: SystemTime, value: &T) -> Result<()> {
        let entry = CacheEntry::new(mtime, value.clone())?;
        let bytes = bincode::serialize(&entry).context("failed to serialize cache entry")?;

        let write_txn = self
            .db
            .begin_write()
            .context("failed to begin cache write transaction")?;

        {
            let mut table = write_txn
                .open_table(ENTRIES)
                .context("failed to open cache table")?;
            table
                .insert(key, bytes.as_slice())
                .with_context(|| format!("failed to insert cache entry for {key}"))?;
        }

        write_txn.commit().context("failed to commit cache write")?;
        Ok(())
    }
}

/// In-memory store with the same mtime validation semantics.
pub struct MemoryStore<T> {
    entries: Mutex<HashMap<String, (u64, u32, T)>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> KeyValueStore<T> for MemoryStore<T> {
    fn get(&self, key: &str, mtime: SystemTime) -> Option<T> {
        let duration = mtime.duration_since(SystemTime::UNIX_EPOCH).ok()?;
        let entries = self.entries.lock().ok()?;
        let (secs, nanos, value) = entries.get(key)?;

        if *secs == duration.as_secs() && *nanos == duration.subsec_nanos() {
            Some(value.clone())
        } else {
            None
        }
    }

    fn set(&self, key: &str, mtime: SystemTime, value: &T) -> Result<()> {
        let duration = mtime
            .duration_since(SystemTime::UNIX_EPOCH)
            .context("file mtime is before UNIX_EPOCH")?;

        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("cache lock poisoned"))?;
        entries.insert(
            key.to_string(),
            (duration.as_secs(), duration.subsec_nanos(), value.clone()),
        );
        Ok(())
    }
}
