//! Balance checks over a batch of ledger rows.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;
use folio_shared::types::CurrencyId;

use super::entry::{EntryType, LedgerEntry};

/// Validation errors for ledger batches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerValidationError {
    /// Entries do not balance in the reporting currency.
    #[error("Transaction is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Entries do not balance in one of the transaction currencies.
    #[error("Transaction is unbalanced in currency {currency}: debits ({debits}) != credits ({credits})")]
    UnbalancedCurrency {
        /// Offending currency.
        currency: CurrencyId,
        /// Total debit amount in that currency.
        debits: Decimal,
        /// Total credit amount in that currency.
        credits: Decimal,
    },

    /// Transaction has no entries.
    #[error("Transaction must have at least one entry")]
    NoEntries,

    /// Transaction has only one side (all debits or all credits).
    #[error("Transaction must have both debit and credit entries")]
    SingleSided,

    /// Entry amount is negative.
    #[error("Entry amount cannot be negative")]
    InvalidAmount,
}

#[derive(Default)]
struct Totals {
    debits: Decimal,
    credits: Decimal,
}

impl Totals {
    fn add(&mut self, entry_type: EntryType, amount: Decimal) {
        match entry_type {
            EntryType::Debit => self.debits += amount,
            EntryType::Credit => self.credits += amount,
        }
    }
}

/// Validates that a batch balances in the reporting currency and in every
/// transaction currency it touches.
///
/// # Errors
///
/// Returns an error if the entries are empty, one-sided, carry a negative
/// amount, or do not balance.
pub fn validate_entries(entries: &[LedgerEntry]) -> Result<(), LedgerValidationError> {
    if entries.is_empty() {
        return Err(LedgerValidationError::NoEntries);
    }

    let mut reporting = Totals::default();
    let mut per_currency: HashMap<CurrencyId, Totals> = HashMap::new();
    let mut has_debit = false;
    let mut has_credit = false;

    for entry in entries {
        if entry.amount < Decimal::ZERO || entry.transaction_currency_amount < Decimal::ZERO {
            return Err(LedgerValidationError::InvalidAmount);
        }
        match entry.entry_type {
            EntryType::Debit => has_debit = true,
            EntryType::Credit => has_credit = true,
        }
        reporting.add(entry.entry_type, entry.amount);
        per_currency
            .entry(entry.currency_id)
            .or_default()
            .add(entry.entry_type, entry.transaction_currency_amount);
    }

    if !has_debit || !has_credit {
        return Err(LedgerValidationError::SingleSided);
    }

    if reporting.debits != reporting.credits {
        return Err(LedgerValidationError::Unbalanced {
            debits: reporting.debits,
            credits: reporting.credits,
        });
    }

    for (currency, totals) in per_currency {
        if totals.debits != totals.credits {
            return Err(LedgerValidationError::UnbalancedCurrency {
                currency,
                debits: totals.debits,
                credits: totals.credits,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use folio_shared::types::{AccountId, LedgerEntryId, TransactionId};

    fn entry(entry_type: EntryType, amount: Decimal, currency: CurrencyId) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::new(),
            transaction_id: TransactionId::new(),
            line_item_id: None,
            entry_type,
            folio_account: AccountId::new(),
            post_account: AccountId::new(),
            amount,
            transaction_currency_amount: amount,
            currency_id: currency,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_balanced_entries() {
        let usd = CurrencyId::new();
        let entries = vec![
            entry(EntryType::Debit, dec!(100), usd),
            entry(EntryType::Credit, dec!(100), usd),
        ];
        assert!(validate_entries(&entries).is_ok());
    }

    #[test]
    fn test_unbalanced_entries() {
        let usd = CurrencyId::new();
        let entries = vec![
            entry(EntryType::Debit, dec!(100), usd),
            entry(EntryType::Credit, dec!(50), usd),
        ];
        assert_eq!(
            validate_entries(&entries),
            Err(LedgerValidationError::Unbalanced {
                debits: dec!(100),
                credits: dec!(50)
            })
        );
    }

    #[test]
    fn test_unbalanced_in_transaction_currency() {
        let usd = CurrencyId::new();
        let mut debit = entry(EntryType::Debit, dec!(100), usd);
        debit.transaction_currency_amount = dec!(90);
        let entries = vec![debit, entry(EntryType::Credit, dec!(100), usd)];
        assert!(matches!(
            validate_entries(&entries),
            Err(LedgerValidationError::UnbalancedCurrency { .. })
        ));
    }

    #[test]
    fn test_empty_entries() {
        assert_eq!(validate_entries(&[]), Err(LedgerValidationError::NoEntries));
    }

    #[test]
    fn test_single_sided() {
        let usd = CurrencyId::new();
        let entries = vec![entry(EntryType::Debit, dec!(100), usd)];
        assert_eq!(validate_entries(&entries), Err(LedgerValidationError::SingleSided));
    }

    #[test]
    fn test_negative_amount() {
        let usd = CurrencyId::new();
        let entries = vec![
            entry(EntryType::Debit, dec!(-100), usd),
            entry(EntryType::Credit, dec!(-100), usd),
        ];
        assert_eq!(validate_entries(&entries), Err(LedgerValidationError::InvalidAmount));
    }
}
