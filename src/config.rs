//! Dump configuration, read from `EDGESCAN_*` environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{EdgeScanError, EdgeScanResult};

pub const ENV_STRATEGY: &str = "EDGESCAN_STRATEGY";
pub const ENV_INCLUDE_DELETED: &str = "EDGESCAN_INCLUDE_DELETED";
pub const ENV_DANGLING: &str = "EDGESCAN_DANGLING";
pub const ENV_STRICT: &str = "EDGESCAN_STRICT";

/// Where an edge's identity is recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Decode the value as a follow record.
    ValueDecode,
    /// Slice both ids out of the key; never look at the value's ids.
    KeyDecode,
    /// Like `KeyDecode`, then resolve each id to a username.
    #[default]
    KeyDecodeWithJoin,
}

impl FromStr for Strategy {
    type Err = EdgeScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(Self::ValueDecode),
            "key" => Ok(Self::KeyDecode),
            "join" => Ok(Self::KeyDecodeWithJoin),
            other => Err(EdgeScanError::Config(format!(
                "{ENV_STRATEGY}: unknown strategy {other:?}, expected value, key or join"
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ValueDecode => "value",
            Self::KeyDecode => "key",
            Self::KeyDecodeWithJoin => "join",
        })
    }
}

/// What to do when a join lookup misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingPolicy {
    /// Log the miss, drop the edge, keep scanning.
    #[default]
    Skip,
    /// Stop the scan with the error.
    Abort,
}

impl FromStr for DanglingPolicy {
    type Err = EdgeScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(EdgeScanError::Config(format!(
                "{ENV_DANGLING}: unknown policy {other:?}, expected skip or abort"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DumpConfig {
    pub strategy: Strategy,
    /// Emit soft-deleted edges too.
    pub include_deleted: bool,
    pub dangling: DanglingPolicy,
    /// Treat malformed keys and values as fatal.
    pub strict: bool,
}

impl DumpConfig {
    pub fn from_env() -> EdgeScanResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source. Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> EdgeScanResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = lookup(ENV_STRATEGY) {
            cfg.strategy = v.parse()?;
        }
        if let Some(v) = lookup(ENV_INCLUDE_DELETED) {
            cfg.include_deleted = parse_flag(ENV_INCLUDE_DELETED, &v)?;
        }
        if let Some(v) = lookup(ENV_DANGLING) {
            cfg.dangling = v.parse()?;
        }
        if let Some(v) = lookup(ENV_STRICT) {
            cfg.strict = parse_flag(ENV_STRICT, &v)?;
        }
        Ok(cfg)
    }

    /// Whether a record-level error should end the scan.
    pub fn is_fatal(&self, err: &EdgeScanError) -> bool {
        match err {
            EdgeScanError::DanglingReference { .. } => self.dangling == DanglingPolicy::Abort,
            EdgeScanError::MalformedKey { .. } | EdgeScanError::MalformedValue { .. } => self.strict,
            _ => true,
        }
    }
}

fn parse_flag(name: &str, v: &str) -> EdgeScanResult<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(EdgeScanError::Config(format!(
            "{name}: expected a boolean, got {other:?}"
        ))),
    }
}
