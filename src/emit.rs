//! Output emitter: drives a follow-namespace scan through the decoder and
//! writes one line per edge.

use std::io::{BufWriter, Write};

use crate::config::DumpConfig;
use crate::decode::EdgeDecoder;
use crate::error::EdgeScanResult;
use crate::key::Namespace;
use crate::scan::{scan, CancelToken};
use crate::store::KvSnapshot;

/// Counters for one dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    /// Entries read under the follow prefix.
    pub scanned: u64,
    pub emitted: u64,
    /// Soft-deleted edges left out.
    pub filtered: u64,
    /// Records dropped after a record-level error.
    pub skipped: u64,
}

/// Scan the follow namespace of `snapshot` and write `<follower> <followed>`
/// lines to `out` in key order.
///
/// Record-level failures go to the `tracing` diagnostic channel and are
/// skipped unless `config` makes them fatal. Scan-level failures return
/// immediately; lines already written stay written.
pub fn dump_edges<S, W>(
    snapshot: &S,
    config: &DumpConfig,
    cancel: Option<CancelToken>,
    out: W,
) -> EdgeScanResult<DumpSummary>
where
    S: KvSnapshot + ?Sized,
    W: Write,
{
    let decoder = EdgeDecoder::from_config(config);
    let mut out = BufWriter::new(out);
    let mut summary = DumpSummary::default();

    let mut entries = scan(snapshot, Namespace::Follow.prefix_key().as_bytes())?;
    if let Some(token) = cancel {
        entries = entries.with_cancel(token);
    }

    tracing::debug!(strategy = %decoder.strategy(), "scanning follow namespace");

    for entry in entries {
        let (key, value) = entry?;
        summary.scanned += 1;

        match decoder.decode(&key, &value, snapshot) {
            Ok(Some(edge)) => {
                writeln!(out, "{edge}")?;
                summary.emitted += 1;
            }
            Ok(None) => summary.filtered += 1,
            Err(e) if e.is_record_level() && !config.is_fatal(&e) => {
                tracing::warn!(error = %e, "skipping record");
                summary.skipped += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "aborting scan");
                out.flush()?;
                return Err(e);
            }
        }
    }

    out.flush()?;
    if summary.skipped > 0 {
        tracing::warn!(
            scanned = summary.scanned,
            emitted = summary.emitted,
            filtered = summary.filtered,
            skipped = summary.skipped,
            "scan complete with skipped records"
        );
    } else {
        tracing::info!(
            scanned = summary.scanned,
            emitted = summary.emitted,
            filtered = summary.filtered,
            skipped = summary.skipped,
            "scan complete"
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Strategy;
    use crate::error::EdgeScanError;
    use crate::key::{FollowKey, ProfileKey};
    use crate::pkid::Pkid;
    use crate::record::ProfileRecord;
    use crate::store::{KvStore, MemStore};

    fn pk(b: u8) -> Pkid {
        Pkid::from_bytes([b; Pkid::LEN])
    }

    fn key_config() -> DumpConfig {
        DumpConfig {
            strategy: Strategy::KeyDecode,
            ..DumpConfig::default()
        }
    }

    #[test]
    fn should_write_one_line_per_edge_in_key_order() {
        let mut store = MemStore::new();
        store.put(FollowKey::new(pk(2), pk(1)).encode().into_bytes(), Vec::<u8>::new());
        store.put(FollowKey::new(pk(1), pk(2)).encode().into_bytes(), Vec::<u8>::new());
        let snap = store.snapshot().unwrap();
        let mut out = Vec::new();

        let summary = dump_edges(&snap, &key_config(), None, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = format!("{} {}\n{} {}\n", pk(1), pk(2), pk(2), pk(1));
        assert_eq!(text, expected);
        assert_eq!(summary.emitted, 2);
    }

    #[test]
    fn should_skip_malformed_keys_and_continue() {
        let mut store = MemStore::new();
        store.put(vec![0x1Cu8, 0x00], Vec::<u8>::new());
        store.put(FollowKey::new(pk(1), pk(2)).encode().into_bytes(), Vec::<u8>::new());
        let snap = store.snapshot().unwrap();
        let mut out = Vec::new();

        let summary = dump_edges(&snap, &key_config(), None, &mut out).unwrap();

        assert_eq!(summary.scanned, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.emitted, 1);
    }

    #[test]
    fn should_abort_on_malformed_key_in_strict_mode() {
        let mut store = MemStore::new();
        store.put(vec![0x1Cu8, 0x00], Vec::<u8>::new());
        let snap = store.snapshot().unwrap();
        let config = DumpConfig {
            strict: true,
            ..key_config()
        };

        let err = dump_edges(&snap, &config, None, Vec::new()).unwrap_err();

        assert!(matches!(err, EdgeScanError::MalformedKey { .. }));
    }

    #[test]
    fn should_abort_on_malformed_value_in_strict_mode() {
        let mut store = MemStore::new();
        let key = FollowKey::new(pk(1), pk(2)).encode();
        store.put(key.into_bytes(), vec![0xFFu8; 4]);
        let snap = store.snapshot().unwrap();
        let config = DumpConfig {
            strategy: Strategy::ValueDecode,
            strict: true,
            ..DumpConfig::default()
        };
        let mut out = Vec::new();

        let err = dump_edges(&snap, &config, None, &mut out).unwrap_err();

        assert!(matches!(
            err,
            EdgeScanError::MalformedValue { namespace: "follow", len: 4, .. }
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn should_keep_one_line_per_emitted_edge_with_hostile_usernames() {
        let mut store = MemStore::new();
        for (b, name) in [(1, "mallory\nfake"), (2, "bob"), (3, "carol")] {
            let value = ProfileRecord::with_username(name).encode().unwrap();
            store.put(ProfileKey::new(pk(b)).encode().into_bytes(), value);
        }
        for (a, b) in [(1, 2), (2, 1), (2, 3), (3, 2)] {
            store.put(FollowKey::new(pk(a), pk(b)).encode().into_bytes(), Vec::<u8>::new());
        }
        let snap = store.snapshot().unwrap();
        let mut out = Vec::new();

        let summary = dump_edges(&snap, &DumpConfig::default(), None, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "bob carol\ncarol bob\n");
        assert_eq!(summary.skipped, 2);
        assert_eq!(text.lines().count() as u64, summary.emitted);
    }

    #[test]
    fn should_stop_with_cancelled_when_token_is_set() {
        let mut store = MemStore::new();
        store.put(FollowKey::new(pk(1), pk(2)).encode().into_bytes(), Vec::<u8>::new());
        let snap = store.snapshot().unwrap();
        let token = CancelToken::new();
        token.cancel();

        let err = dump_edges(&snap, &key_config(), Some(token), Vec::new()).unwrap_err();

        assert!(matches!(err, EdgeScanError::Cancelled));
    }
}
