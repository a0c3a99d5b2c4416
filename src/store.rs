//! Read-only store access.
//!
//! The scan engine only needs two things from a store: a forward iterator
//! positioned at the first key >= some seek key, and point lookups, both
//! served from one consistent snapshot. [`KvStore`] and [`KvSnapshot`] are
//! that contract. [`RocksStore`] serves it from an on-disk RocksDB opened
//! read-only; [`MemStore`] serves it from memory for tests and benches.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use rocksdb::{Direction, IteratorMode, Options, DB};

use crate::error::{EdgeScanError, EdgeScanResult};

/// One stored key/value pair.
pub type Entry = (Bytes, Bytes);

/// Forward iterator over entries in ascending key order.
pub type EntryIter<'a> = Box<dyn Iterator<Item = EdgeScanResult<Entry>> + 'a>;

/// A point-in-time read view.
pub trait KvSnapshot {
    /// Iterate forward from the first key that is >= `from`.
    fn seek(&self, from: &[u8]) -> EntryIter<'_>;

    /// Point lookup.
    fn get(&self, key: &[u8]) -> EdgeScanResult<Option<Bytes>>;
}

/// A store that can hand out snapshots.
pub trait KvStore {
    type Snapshot<'a>: KvSnapshot
    where
        Self: 'a;

    fn snapshot(&self) -> EdgeScanResult<Self::Snapshot<'_>>;
}

/// RocksDB directory opened read-only. Closed on drop.
pub struct RocksStore {
    db: DB,
    path: PathBuf,
}

impl RocksStore {
    /// Open the store at `path` without requesting write access.
    ///
    /// # Errors
    /// * `EdgeScanError::StoreUnavailable` - path missing or RocksDB refused to open it
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> EdgeScanResult<Self> {
        let path = path.as_ref();
        let unavailable = |cause: String| EdgeScanError::StoreUnavailable {
            path: path.display().to_string(),
            cause,
        };
        if !path.exists() {
            return Err(unavailable("no such directory".to_string()));
        }
        if !path.is_dir() {
            return Err(unavailable("not a directory".to_string()));
        }

        let opts = Options::default();
        let db = DB::open_for_read_only(&opts, path, false)
            .map_err(|e| unavailable(e.to_string()))?;
        tracing::debug!(path = %path.display(), "store opened read-only");

        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for RocksStore {
    type Snapshot<'a> = RocksSnapshot<'a>;

    fn snapshot(&self) -> EdgeScanResult<RocksSnapshot<'_>> {
        Ok(RocksSnapshot {
            snap: self.db.snapshot(),
        })
    }
}

/// Consistent view over a [`RocksStore`]. Released on drop.
pub struct RocksSnapshot<'a> {
    snap: rocksdb::Snapshot<'a>,
}

impl KvSnapshot for RocksSnapshot<'_> {
    fn seek(&self, from: &[u8]) -> EntryIter<'_> {
        let iter = self.snap.iterator(IteratorMode::From(from, Direction::Forward));
        Box::new(iter.map(|item| -> EdgeScanResult<Entry> {
            let (k, v) = item?;
            Ok((Bytes::from(k), Bytes::from(v)))
        }))
    }

    fn get(&self, key: &[u8]) -> EdgeScanResult<Option<Bytes>> {
        Ok(self.snap.get(key)?.map(Bytes::from))
    }
}

/// In-memory ordered store.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    map: BTreeMap<Bytes, Bytes>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.map.insert(key.into(), value.into());
    }
}

impl KvStore for MemStore {
    type Snapshot<'a> = MemSnapshot<'a>;

    fn snapshot(&self) -> EdgeScanResult<MemSnapshot<'_>> {
        Ok(MemSnapshot { map: &self.map })
    }
}

/// Borrowed view of a [`MemStore`]; the borrow keeps it immutable.
pub struct MemSnapshot<'a> {
    map: &'a BTreeMap<Bytes, Bytes>,
}

impl KvSnapshot for MemSnapshot<'_> {
    fn seek(&self, from: &[u8]) -> EntryIter<'_> {
        let range = self
            .map
            .range::<[u8], _>((Bound::Included(from), Bound::Unbounded));
        Box::new(range.map(|(k, v)| -> EdgeScanResult<Entry> { Ok((k.clone(), v.clone())) }))
    }

    fn get(&self, key: &[u8]) -> EdgeScanResult<Option<Bytes>> {
        Ok(self.map.get(key).cloned())
    }
}
