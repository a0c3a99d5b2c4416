//! Prefix scanner.
//!
//! [`scan`] seeks a snapshot to `prefix` and yields entries until the first
//! key that no longer starts with it. The engine may hand back keys past the
//! prefix range; the scan stops there instead of walking the rest of the
//! keyspace.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{EdgeScanError, EdgeScanResult};
use crate::store::{Entry, EntryIter, KvSnapshot};

/// Shared flag for cooperative cancellation, checked between iterator advances.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Single-pass iterator over the entries under one prefix.
pub struct PrefixScan<'a> {
    inner: EntryIter<'a>,
    prefix: Bytes,
    cancel: Option<CancelToken>,
    done: bool,
}

/// Start a prefix scan over `snapshot`.
///
/// # Errors
/// * `EdgeScanError::EmptyPrefix` - `prefix` is empty
///
/// ```
/// use edgescan::{scan, KvStore, MemStore};
/// let mut store = MemStore::new();
/// store.put(vec![0x1Cu8, 0x01], &b""[..]);
/// store.put(vec![0x1Du8, 0x00], &b""[..]);
/// let snap = store.snapshot().unwrap();
/// assert_eq!(scan(&snap, &[0x1C]).unwrap().count(), 1);
/// ```
pub fn scan<'a, S>(snapshot: &'a S, prefix: &[u8]) -> EdgeScanResult<PrefixScan<'a>>
where
    S: KvSnapshot + ?Sized,
{
    if prefix.is_empty() {
        return Err(EdgeScanError::EmptyPrefix);
    }
    Ok(PrefixScan {
        inner: snapshot.seek(prefix),
        prefix: Bytes::copy_from_slice(prefix),
        cancel: None,
        done: false,
    })
}

impl PrefixScan<'_> {
    /// Check `token` before every advance.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Iterator for PrefixScan<'_> {
    type Item = EdgeScanResult<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            self.done = true;
            return Some(Err(EdgeScanError::Cancelled));
        }
        match self.inner.next() {
            Some(Ok((key, value))) if key.starts_with(&self.prefix) => Some(Ok((key, value))),
            Some(Err(e)) => {
                self.done = true;
                Some(Err(e))
            }
            // past the prefix range, or exhausted
            _ => {
                self.done = true;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for PrefixScan<'_> {}
