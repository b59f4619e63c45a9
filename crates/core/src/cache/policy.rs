use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a repository is wrapped when it is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Every call goes straight to the backing store.
    #[default]
    Passthrough,
    /// Reads are served from a cache; writes invalidate the collection.
    Cached,
}

impl CachePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CachePolicy::Passthrough => "passthrough",
            CachePolicy::Cached => "cached",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" | "none" => Ok(CachePolicy::Passthrough),
            "cached" => Ok(CachePolicy::Cached),
            other => Err(format!(
                "unknown cache policy '{other}' (expected 'passthrough' or 'cached')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cache_policy() {
        assert_eq!("cached".parse(), Ok(CachePolicy::Cached));
        assert_eq!(" Passthrough ".parse(), Ok(CachePolicy::Passthrough));
        assert_eq!("none".parse(), Ok(CachePolicy::Passthrough));
        assert!("redis".parse::<CachePolicy>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for policy in [CachePolicy::Passthrough, CachePolicy::Cached] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }
}
