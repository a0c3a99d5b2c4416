use bytes::Bytes;
use std::cmp::Ordering;
use std::fmt;

use crate::encoder::KeyEncoder;
use crate::error::{EdgeScanError, EdgeScanResult};
use crate::pkid::Pkid;

/// Key namespaces this crate reads. The discriminant is the prefix byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Namespace {
    /// `[0x17][Pkid]` -> profile record.
    Profile = 0x17,
    /// `[0x1C][follower Pkid][followed Pkid]` -> follow record or empty.
    Follow = 0x1C,
}

impl Namespace {
    #[inline]
    pub const fn prefix(self) -> u8 {
        self as u8
    }

    /// Short name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Follow => "follow",
        }
    }

    /// The one-byte key every entry of this namespace starts with.
    pub fn prefix_key(self) -> StoreKey {
        StoreKey::from_static(match self {
            Self::Profile => &PROFILE_PREFIX,
            Self::Follow => &FOLLOW_PREFIX,
        })
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static PROFILE_PREFIX: [u8; 1] = [Namespace::Profile as u8];
static FOLLOW_PREFIX: [u8; 1] = [Namespace::Follow as u8];

/// Raw store key, compared by its bytes.
///
/// ```
/// use edgescan::{Namespace, StoreKey};
/// let a = StoreKey::from(&[0x17u8, 0x00][..]);
/// let b = Namespace::Follow.prefix_key();
/// assert!(a < b);
/// assert_eq!(b.to_hex_string(), "1c");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    bytes: Bytes,
}

impl StoreKey {
    #[inline]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    #[inline]
    pub fn from_static(bytes: &'static [u8]) -> Self {
        Self {
            bytes: Bytes::from_static(bytes),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex, used in diagnostics.
    #[inline]
    pub fn to_hex_string(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl PartialOrd for StoreKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StoreKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl From<&[u8]> for StoreKey {
    #[inline]
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(bytes),
        }
    }
}

/// Composite key of the follow namespace: `[0x1C][follower][followed]`.
///
/// Because both ids are fixed-width, byte order over encoded keys is
/// follower-major, followed-minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FollowKey {
    pub follower: Pkid,
    pub followed: Pkid,
}

impl FollowKey {
    /// Total encoded width: prefix byte plus two Pkids.
    pub const LEN: usize = 1 + 2 * Pkid::LEN;
    const FOLLOWER: std::ops::Range<usize> = 1..1 + Pkid::LEN;
    const FOLLOWED: std::ops::Range<usize> = 1 + Pkid::LEN..Self::LEN;

    pub fn new(follower: Pkid, followed: Pkid) -> Self {
        Self { follower, followed }
    }

    pub fn encode(&self) -> StoreKey {
        let mut enc = KeyEncoder::with_capacity(Self::LEN);
        self.encode_into(&mut enc);
        StoreKey::from_bytes(enc.freeze())
    }

    /// Append the encoded key to `enc` and return the width written.
    pub fn encode_into(&self, enc: &mut KeyEncoder) -> usize {
        enc.push_byte(Namespace::Follow.prefix());
        1 + enc.encode_pkid_into(&self.follower) + enc.encode_pkid_into(&self.followed)
    }

    /// Recover both ids from raw key bytes.
    ///
    /// The length and prefix byte are checked before any slicing.
    pub fn decode(key: &[u8]) -> EdgeScanResult<Self> {
        check_layout(Namespace::Follow, key, Self::LEN)?;
        let bad = |_| malformed(Namespace::Follow, key, Self::LEN);
        let follower = Pkid::try_from(&key[Self::FOLLOWER]).map_err(bad)?;
        let followed = Pkid::try_from(&key[Self::FOLLOWED]).map_err(bad)?;
        Ok(Self { follower, followed })
    }
}

/// Key of the profile namespace: `[0x17][pkid]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileKey {
    pub pkid: Pkid,
}

impl ProfileKey {
    pub const LEN: usize = 1 + Pkid::LEN;

    pub fn new(pkid: Pkid) -> Self {
        Self { pkid }
    }

    pub fn encode(&self) -> StoreKey {
        let mut enc = KeyEncoder::with_capacity(Self::LEN);
        enc.push_byte(Namespace::Profile.prefix());
        enc.encode_pkid_into(&self.pkid);
        StoreKey::from_bytes(enc.freeze())
    }

    pub fn decode(key: &[u8]) -> EdgeScanResult<Self> {
        check_layout(Namespace::Profile, key, Self::LEN)?;
        let pkid = Pkid::try_from(&key[1..])
            .map_err(|_| malformed(Namespace::Profile, key, Self::LEN))?;
        Ok(Self { pkid })
    }
}

fn check_layout(ns: Namespace, key: &[u8], expected: usize) -> EdgeScanResult<()> {
    if key.len() != expected || key[0] != ns.prefix() {
        return Err(malformed(ns, key, expected));
    }
    Ok(())
}

fn malformed(ns: Namespace, key: &[u8], expected: usize) -> EdgeScanError {
    EdgeScanError::MalformedKey {
        namespace: ns.name(),
        key: hex::encode(key),
        len: key.len(),
        expected,
    }
}
