//! Diagnostic channels.
//!
//! The engine emits structured `tracing` events on three targets. Whether a
//! channel emits at all is decided by the [`TraceChannels`] value handed to the
//! engine; the installed subscriber then filters by level as usual.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const SEARCH_TARGET: &str = "fuzzweight::search";
pub const CLUSTER_TARGET: &str = "fuzzweight::cluster";
pub const BASE_TARGET: &str = "fuzzweight::base";

/// Which diagnostic channels emit events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceChannels {
    /// Position search: runs, candidates, conflicts
    pub search: bool,
    /// Cluster detection, order analysis, teardown
    pub cluster: bool,
    /// Pipeline milestones and the final weight
    pub base: bool,
}

impl TraceChannels {
    #[must_use]
    pub fn all() -> Self {
        Self {
            search: true,
            cluster: true,
            base: true,
        }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.search || self.cluster || self.base
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown trace channel '{0}' (expected search, cluster, base or all)")]
pub struct UnknownChannel(pub String);

impl FromStr for TraceChannels {
    type Err = UnknownChannel;

    /// Parse a comma-separated channel list, e.g. `search,cluster`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut channels = Self::default();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match name.to_lowercase().as_str() {
                "search" => channels.search = true,
                "cluster" => channels.cluster = true,
                "base" => channels.base = true,
                "all" => channels = Self::all(),
                _ => return Err(UnknownChannel(name.to_string())),
            }
        }
        Ok(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channels() {
        let c: TraceChannels = "search, base".parse().unwrap();
        assert!(c.search);
        assert!(!c.cluster);
        assert!(c.base);
        assert_eq!("all".parse::<TraceChannels>().unwrap(), TraceChannels::all());
        assert_eq!("".parse::<TraceChannels>().unwrap(), TraceChannels::default());
        assert!("verbose".parse::<TraceChannels>().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let c: TraceChannels = serde_json::from_str(r#"{"cluster": true}"#).unwrap();
        assert!(c.cluster);
        assert!(!c.search);
        assert!(c.any());
        assert!(!TraceChannels::default().any());
    }
}
