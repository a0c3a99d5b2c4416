//! Error taxonomy for scanning and decoding.
//!
//! Errors fall into two classes. Scan-level errors (store, config, output I/O,
//! cancellation) abort the whole run. Record-level errors describe one bad
//! entry and can be skipped; whether they are is decided by [`crate::DumpConfig`].

use thiserror::Error;

/// Result alias used throughout the crate.
pub type EdgeScanResult<T> = Result<T, EdgeScanError>;

#[derive(Error, Debug)]
pub enum EdgeScanError {
    /// The store directory could not be opened, or no snapshot could be taken.
    #[error("store unavailable at {path}: {cause}")]
    StoreUnavailable { path: String, cause: String },

    /// The storage engine failed while iterating or during a point lookup.
    #[error("store read failed: {0}")]
    StoreRead(String),

    /// Prefix scans require at least one prefix byte.
    #[error("prefix scan requires a non-empty prefix")]
    EmptyPrefix,

    #[error("malformed key in {namespace} namespace: key={key} len={len}, expected {expected} bytes")]
    MalformedKey {
        namespace: &'static str,
        key: String,
        len: usize,
        expected: usize,
    },

    #[error("malformed value in {namespace} namespace: key={key} len={len}: {cause}")]
    MalformedValue {
        namespace: &'static str,
        key: String,
        len: usize,
        cause: String,
    },

    /// A join lookup found no record for a referenced id.
    #[error("dangling reference from key={key}: no {namespace} record for {missing}")]
    DanglingReference {
        namespace: &'static str,
        key: String,
        missing: String,
    },

    #[error("scan cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl EdgeScanError {
    /// True for errors that concern a single record and leave the rest of the
    /// scan intact.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::MalformedKey { .. } | Self::MalformedValue { .. } | Self::DanglingReference { .. }
        )
    }
}

impl From<rocksdb::Error> for EdgeScanError {
    fn from(e: rocksdb::Error) -> Self {
        Self::StoreRead(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_classify_record_level_errors() {
        let key = EdgeScanError::MalformedKey {
            namespace: "follow",
            key: "1c".into(),
            len: 1,
            expected: 67,
        };
        let dangling = EdgeScanError::DanglingReference {
            namespace: "profile",
            key: "1c".into(),
            missing: "00".into(),
        };
        assert!(key.is_record_level());
        assert!(dangling.is_record_level());
        assert!(!EdgeScanError::Cancelled.is_record_level());
        assert!(!EdgeScanError::StoreRead("boom".into()).is_record_level());
    }

    #[test]
    fn should_carry_key_length_and_namespace_in_message() {
        let err = EdgeScanError::MalformedKey {
            namespace: "follow",
            key: "1cff".into(),
            len: 2,
            expected: 67,
        };
        let msg = err.to_string();
        assert!(msg.contains("follow"));
        assert!(msg.contains("1cff"));
        assert!(msg.contains("len=2"));
    }
}
