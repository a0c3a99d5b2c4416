//! Stored record payloads.
//!
//! Values are bincode-encoded serde structs. This crate only decodes them;
//! the `encode` helpers exist so fixtures and tools can write compatible
//! values.

use serde::{Deserialize, Serialize};

use crate::pkid::Pkid;

/// Value stored under a follow key: "`follower` follows `followed`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowRecord {
    pub follower: Pkid,
    pub followed: Pkid,
    /// Soft-delete marker. A deleted edge stays in the store.
    pub is_deleted: bool,
}

impl FollowRecord {
    pub fn new(follower: Pkid, followed: Pkid) -> Self {
        Self {
            follower,
            followed,
            is_deleted: false,
        }
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    pub fn decode(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }

    pub fn encode(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }
}

/// Value stored under a profile key. Only `username` is read by the join.
///
/// The username is raw bytes as written by the producer; nothing guarantees
/// UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub public_key: Vec<u8>,
    pub username: Vec<u8>,
    pub description: String,
    pub is_hidden: bool,
}

impl ProfileRecord {
    pub fn with_username(username: impl Into<Vec<u8>>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn decode(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }

    pub fn encode(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(b: u8) -> Pkid {
        Pkid::from_bytes([b; Pkid::LEN])
    }

    #[test]
    fn should_decode_encoded_follow_record() {
        let rec = FollowRecord::new(pk(1), pk(2)).deleted();
        let bytes = rec.encode().unwrap();
        assert_eq!(FollowRecord::decode(&bytes).unwrap(), rec);
    }

    #[test]
    fn should_fail_on_truncated_follow_record() {
        let bytes = FollowRecord::new(pk(1), pk(2)).encode().unwrap();
        assert!(FollowRecord::decode(&bytes[..bytes.len() - 10]).is_err());
        assert!(FollowRecord::decode(&[]).is_err());
    }

    #[test]
    fn should_keep_username_through_encoding() {
        let rec = ProfileRecord::with_username("alice");
        let back = ProfileRecord::decode(&rec.encode().unwrap()).unwrap();
        assert_eq!(back.username, b"alice");
        assert!(!back.is_hidden);
    }

    #[test]
    fn should_keep_non_utf8_username_bytes() {
        let rec = ProfileRecord::with_username(vec![0x61, 0xFF, 0x62]);
        let back = ProfileRecord::decode(&rec.encode().unwrap()).unwrap();
        assert_eq!(back.username, [0x61u8, 0xFF, 0x62]);
    }
}
