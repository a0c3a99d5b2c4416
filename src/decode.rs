//! Edge decoder.
//!
//! Turns one scanned follow entry into a [`DisplayEdge`] using the configured
//! [`Strategy`]:
//!
//! - `ValueDecode` trusts the value: it must decode as a [`FollowRecord`].
//!   Survives key layout changes, fails on bad values.
//! - `KeyDecode` trusts the key layout: both ids are sliced out of the 67-byte
//!   key. No deserialization, but tied to the layout.
//! - `KeyDecodeWithJoin` adds one profile lookup per id to print usernames.
//!   Lookups dominate the cost on large graphs.

use std::fmt;

use crate::config::{DumpConfig, Strategy};
use crate::error::{EdgeScanError, EdgeScanResult};
use crate::key::{FollowKey, Namespace, ProfileKey};
use crate::pkid::Pkid;
use crate::record::{FollowRecord, ProfileRecord};
use crate::store::KvSnapshot;

/// A directed edge ready for output: `follower` follows `followed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEdge {
    pub follower: String,
    pub followed: String,
}

impl DisplayEdge {
    fn from_ids(follower: &Pkid, followed: &Pkid) -> Self {
        Self {
            follower: follower.to_hex_string(),
            followed: followed.to_hex_string(),
        }
    }
}

impl fmt::Display for DisplayEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.follower, self.followed)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeDecoder {
    strategy: Strategy,
    include_deleted: bool,
}

impl EdgeDecoder {
    pub fn new(strategy: Strategy, include_deleted: bool) -> Self {
        Self {
            strategy,
            include_deleted,
        }
    }

    pub fn from_config(config: &DumpConfig) -> Self {
        Self::new(config.strategy, config.include_deleted)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Decode one follow entry.
    ///
    /// Returns `Ok(None)` when the edge is soft-deleted and deleted edges are
    /// excluded.
    ///
    /// # Errors
    /// * `MalformedKey` - key is not a 67-byte follow key (key strategies)
    /// * `MalformedValue` - follow value (value strategy) or profile value (join) undecodable
    /// * `DanglingReference` - join found no profile for an id
    pub fn decode<S>(
        &self,
        key: &[u8],
        value: &[u8],
        snapshot: &S,
    ) -> EdgeScanResult<Option<DisplayEdge>>
    where
        S: KvSnapshot + ?Sized,
    {
        match self.strategy {
            Strategy::ValueDecode => {
                let record = FollowRecord::decode(value)
                    .map_err(|e| malformed_value(Namespace::Follow, key, value, e))?;
                if record.is_deleted && !self.include_deleted {
                    return Ok(None);
                }
                Ok(Some(DisplayEdge::from_ids(&record.follower, &record.followed)))
            }
            Strategy::KeyDecode => {
                let fk = FollowKey::decode(key)?;
                if self.is_filtered(value) {
                    return Ok(None);
                }
                Ok(Some(DisplayEdge::from_ids(&fk.follower, &fk.followed)))
            }
            Strategy::KeyDecodeWithJoin => {
                let fk = FollowKey::decode(key)?;
                if self.is_filtered(value) {
                    return Ok(None);
                }
                Ok(Some(DisplayEdge {
                    follower: resolve_username(snapshot, key, &fk.follower)?,
                    followed: resolve_username(snapshot, key, &fk.followed)?,
                }))
            }
        }
    }

    // Key strategies don't need the value, but a present follow record still
    // carries the soft-delete marker. Empty or foreign values count as live.
    fn is_filtered(&self, value: &[u8]) -> bool {
        if self.include_deleted || value.is_empty() {
            return false;
        }
        FollowRecord::decode(value).is_ok_and(|r| r.is_deleted)
    }
}

fn resolve_username<S>(snapshot: &S, edge_key: &[u8], id: &Pkid) -> EdgeScanResult<String>
where
    S: KvSnapshot + ?Sized,
{
    let profile_key = ProfileKey::new(*id).encode();
    let Some(value) = snapshot.get(profile_key.as_bytes())? else {
        return Err(EdgeScanError::DanglingReference {
            namespace: Namespace::Profile.name(),
            key: hex::encode(edge_key),
            missing: id.to_hex_string(),
        });
    };
    let profile = ProfileRecord::decode(&value)
        .map_err(|e| malformed_value(Namespace::Profile, profile_key.as_bytes(), &value, e))?;

    // Output is one line per edge with space-separated fields, so a username
    // must be a single printable token. Invalid UTF-8 is shown as U+FFFD.
    let username = String::from_utf8_lossy(&profile.username);
    if !is_single_token(&username) {
        let cause = format!("username {username:?} is empty or not a single printable token");
        return Err(malformed_value(
            Namespace::Profile,
            profile_key.as_bytes(),
            &value,
            cause,
        ));
    }
    Ok(username.into_owned())
}

fn is_single_token(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c.is_control())
}

fn malformed_value(
    ns: Namespace,
    key: &[u8],
    value: &[u8],
    cause: impl fmt::Display,
) -> EdgeScanError {
    EdgeScanError::MalformedValue {
        namespace: ns.name(),
        key: hex::encode(key),
        len: value.len(),
        cause: cause.to_string(),
    }
}
