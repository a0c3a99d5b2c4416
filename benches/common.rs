#![allow(dead_code)]

use std::time::Duration;

use criterion::Criterion;
use edgescan::{FollowKey, MemStore, Pkid, ProfileKey, ProfileRecord};

/// Short criterion runs for local iteration; `EDGESCAN_BENCH_FULL` restores
/// criterion's defaults.
pub fn bench_config() -> Criterion {
    match std::env::var_os("EDGESCAN_BENCH_FULL") {
        Some(_) => Criterion::default(),
        None => Criterion::default()
            .sample_size(10)
            .measurement_time(Duration::from_secs(1))
            .warm_up_time(Duration::from_millis(250)),
    }
}

/// Pkid with `n` in its leading bytes, so ids sort by `n`.
pub fn pkid(n: u32) -> Pkid {
    let mut bytes = [0u8; Pkid::LEN];
    bytes[..4].copy_from_slice(&n.to_be_bytes());
    Pkid::from_bytes(bytes)
}

/// Ring of `users` accounts with profiles, each following the next `fanout`.
pub fn ring(users: u32, fanout: u32) -> MemStore {
    let mut store = MemStore::new();
    for u in 0..users {
        let value = ProfileRecord::with_username(format!("user{u}"))
            .encode()
            .expect("encode profile");
        store.put(ProfileKey::new(pkid(u)).encode().into_bytes(), value);
        for step in 1..=fanout {
            let key = FollowKey::new(pkid(u), pkid((u + step) % users)).encode();
            store.put(key.into_bytes(), Vec::<u8>::new());
        }
    }
    store
}
