//! Edgescan: dump "who follows whom" from an ordered key-value store.
//!
//! The store keeps relational data behind fixed binary key layouts:
//!
//! - follow edges: `[0x1C][follower Pkid:33][followed Pkid:33]`
//! - profiles: `[0x17][Pkid:33]` -> record with a username
//!
//! There is no query language, so edges are recovered with a prefix scan over
//! the follow namespace plus, optionally, point lookups into the profile
//! namespace. The pieces:
//!
//! - [`scan`]: ordered, single-pass iteration over one key prefix of a snapshot.
//! - [`EdgeDecoder`]: turns an entry into a [`DisplayEdge`] with one of three
//!   [`Strategy`] values (value decode, key decode, key decode + join).
//! - [`dump_edges`]: streams decoded edges as text lines and isolates
//!   record-level failures.
//!
//! Quick start
//!
//! ```
//! use edgescan::{dump_edges, DumpConfig, FollowKey, KvStore, MemStore, Pkid, ProfileKey,
//!     ProfileRecord};
//!
//! let alice = Pkid::from_bytes([0xA1; Pkid::LEN]);
//! let bob = Pkid::from_bytes([0xB0; Pkid::LEN]);
//!
//! let mut store = MemStore::new();
//! store.put(FollowKey::new(alice, bob).encode().into_bytes(), Vec::<u8>::new());
//! for (id, name) in [(alice, "alice"), (bob, "bob")] {
//!     let value = ProfileRecord::with_username(name).encode().unwrap();
//!     store.put(ProfileKey::new(id).encode().into_bytes(), value);
//! }
//!
//! let mut out = Vec::new();
//! let snap = store.snapshot().unwrap();
//! dump_edges(&snap, &DumpConfig::default(), None, &mut out).unwrap();
//! assert_eq!(out, b"alice bob\n");
//! ```
pub mod config;
pub mod decode;
pub mod emit;
pub mod encoder;
pub mod error;
pub mod key;
pub mod pkid;
pub mod record;
pub mod scan;
pub mod store;

use std::io::Write;
use std::path::Path;

pub use config::{DanglingPolicy, DumpConfig, Strategy};
pub use decode::{DisplayEdge, EdgeDecoder};
pub use emit::{dump_edges, DumpSummary};
pub use encoder::KeyEncoder;
pub use error::{EdgeScanError, EdgeScanResult};
pub use key::{FollowKey, Namespace, ProfileKey, StoreKey};
pub use pkid::Pkid;
pub use record::{FollowRecord, ProfileRecord};
pub use scan::{scan, CancelToken, PrefixScan};
pub use store::{KvSnapshot, KvStore, MemStore, RocksStore};

/// Open the RocksDB store at `path` read-only and dump its follow edges to `out`.
///
/// The store handle and its snapshot are released when this returns, on every
/// path.
pub fn dump_store<P, W>(path: P, config: &DumpConfig, out: W) -> EdgeScanResult<DumpSummary>
where
    P: AsRef<Path>,
    W: Write,
{
    let store = RocksStore::open_read_only(path)?;
    let snapshot = store.snapshot()?;
    dump_edges(&snapshot, config, None, out)
}
