#![allow(dead_code)]

use std::path::Path;

use edgescan::{FollowKey, FollowRecord, Pkid, ProfileKey, ProfileRecord};

pub fn pk(b: u8) -> Pkid {
    Pkid::from_bytes([b; Pkid::LEN])
}

/// Writes fixture entries into a fresh RocksDB directory, then closes it so
/// the code under test can open it read-only.
pub struct Fixture {
    db: rocksdb::DB,
}

impl Fixture {
    pub fn create(path: &Path) -> Self {
        let db = rocksdb::DB::open_default(path).expect("create fixture store");
        Self { db }
    }

    pub fn raw(&self, key: &[u8], value: &[u8]) -> &Self {
        self.db.put(key, value).expect("fixture put");
        self
    }

    pub fn follow(&self, follower: Pkid, followed: Pkid) -> &Self {
        let value = FollowRecord::new(follower, followed).encode().unwrap();
        self.raw(FollowKey::new(follower, followed).encode().as_bytes(), &value)
    }

    pub fn deleted_follow(&self, follower: Pkid, followed: Pkid) -> &Self {
        let value = FollowRecord::new(follower, followed)
            .deleted()
            .encode()
            .unwrap();
        self.raw(FollowKey::new(follower, followed).encode().as_bytes(), &value)
    }

    pub fn bare_follow(&self, follower: Pkid, followed: Pkid) -> &Self {
        self.raw(FollowKey::new(follower, followed).encode().as_bytes(), &[])
    }

    pub fn profile(&self, id: Pkid, username: &str) -> &Self {
        let value = ProfileRecord::with_username(username).encode().unwrap();
        self.raw(ProfileKey::new(id).encode().as_bytes(), &value)
    }

    pub fn close(self) {
        self.db.flush().expect("fixture flush");
    }
}
