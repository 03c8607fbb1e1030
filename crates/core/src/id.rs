//! Strongly-typed product identifier.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a product row in the catalog store.
///
/// Always strictly positive. Deserialization goes through [`TryFrom<i64>`], so a
/// payload carrying `0` or a negative id is rejected at decode time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(raw: i64) -> Result<Self, DomainError> {
        if raw <= 0 {
            return Err(DomainError::invalid_id(format!(
                "ProductId must be positive, got {raw}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i64> for ProductId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for i64 {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("ProductId: {e}")))?;
        Self::new(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_zero_and_negative_ids() {
        assert!(ProductId::new(0).is_err());
        assert!(ProductId::new(-3).is_err());
        assert_eq!(ProductId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn parses_from_path_segment() {
        assert_eq!("42".parse::<ProductId>().unwrap().get(), 42);
        assert!(matches!("abc".parse::<ProductId>(), Err(DomainError::InvalidId(_))));
        assert!(matches!("-1".parse::<ProductId>(), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn serializes_as_bare_integer() {
        let id = ProductId::new(7).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        assert!(serde_json::from_str::<ProductId>("0").is_err());
    }

    proptest! {
        #[test]
        fn every_positive_integer_is_a_valid_id(raw in 1i64..=i64::MAX) {
            let id = ProductId::new(raw).unwrap();
            prop_assert_eq!(i64::from(id), raw);
            prop_assert_eq!(id.to_string().parse::<ProductId>().unwrap(), id);
        }
    }
}
