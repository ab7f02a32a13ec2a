//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog product.
///
/// Persisted as a plain JSON string. Seed data may carry numeric ids; those
/// are converted with [`ProductId::from_number`] during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Identifier derived from a millisecond timestamp.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    pub fn from_number(n: i64) -> Self {
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value when the identifier is an integer (as timestamp ids are).
    pub fn as_millis(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DomainError::invalid_id("ProductId: empty"));
        }
        Ok(Self(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_blank() {
        assert!(matches!(
            "  ".parse::<ProductId>(),
            Err(DomainError::InvalidId(_))
        ));
    }

    #[test]
    fn millis_round_trip() {
        let id = ProductId::from_millis(1_700_000_000_123);
        assert_eq!(id.as_str(), "1700000000123");
        assert_eq!(id.as_millis(), Some(1_700_000_000_123));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id: ProductId = "abc".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
