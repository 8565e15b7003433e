//! Cart aggregation policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How repeated adds of the same product are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    /// One line per product id with a running quantity.
    #[default]
    Merge,
    /// One line per add; duplicate ids are kept as separate lines.
    Append,
}

impl AggregationPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Append => "append",
        }
    }
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown aggregation policy {0:?} (expected \"merge\" or \"append\")")]
pub struct UnknownPolicy(pub String);

impl FromStr for AggregationPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "append" => Ok(Self::Append),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy_names() {
        assert_eq!(
            "merge".parse::<AggregationPolicy>().unwrap(),
            AggregationPolicy::Merge
        );
        assert_eq!(
            "Append".parse::<AggregationPolicy>().unwrap(),
            AggregationPolicy::Append
        );
        assert!("sum".parse::<AggregationPolicy>().is_err());
    }

    #[test]
    fn test_default_is_merge() {
        assert_eq!(AggregationPolicy::default(), AggregationPolicy::Merge);
    }
}
