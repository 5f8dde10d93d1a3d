//! Transaction numbers: `{prefix}{period_count:02}/{sequence:04}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A parsed transaction number such as `CN01/0001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionNumber {
    /// Type prefix.
    pub prefix: String,
    /// Ordinal of the reporting period.
    pub period_count: u32,
    /// 1-based position within the (type, period) series.
    pub sequence: u32,
}

impl TransactionNumber {
    /// Creates a number from its parts.
    #[must_use]
    pub fn new(prefix: impl Into<String>, period_count: u32, sequence: u32) -> Self {
        Self {
            prefix: prefix.into(),
            period_count,
            sequence,
        }
    }
}

impl fmt::Display for TransactionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}/{:04}", self.prefix, self.period_count, self.sequence)
    }
}

/// Error returned when a string is not a transaction number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid transaction number: {0}")]
pub struct ParseTransactionNumberError(pub String);

impl FromStr for TransactionNumber {
    type Err = ParseTransactionNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTransactionNumberError(s.to_string());
        let (head, sequence) = s.split_once('/').ok_or_else(invalid)?;
        let split = head.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let (prefix, period) = head.split_at(split);
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(invalid());
        }
        Ok(Self {
            prefix: prefix.to_string(),
            period_count: period.parse().map_err(|_| invalid())?,
            sequence: sequence.parse().map_err(|_| invalid())?,
        })
    }
}
