//! Ledger row generation.

use rust_decimal::Decimal;
use folio_shared::types::{AccountId, LedgerEntryId, LineItemId};

use super::entry::{EntryType, LedgerEntry};
use super::error::PostingError;
use super::validation::validate_entries;
use crate::account::Account;
use crate::currency::CurrencyService;
use crate::transaction::{Transaction, ValidationError};

/// Rate and precision resolved for one posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingContext {
    /// Transaction currency → reporting currency.
    pub rate: Decimal,
    /// Precision of the transaction currency.
    pub transaction_decimal_places: u32,
    /// Precision of the reporting currency.
    pub reporting_decimal_places: u32,
}

/// Stateless posting rules.
pub struct PostingEngine;

impl PostingEngine {
    /// Checks everything that can be checked without the store.
    ///
    /// `line_accounts` holds the resolved account of each line item, in order.
    ///
    /// # Errors
    ///
    /// `AlreadyPosted`, `MissingLineItems`, `MainAccount`, `LineItemAccount`
    /// or `NegativeAmount`.
    pub fn validate(
        transaction: &Transaction,
        main_account: &Account,
        line_accounts: &[&Account],
    ) -> Result<(), PostingError> {
        if transaction.posted {
            return Err(PostingError::AlreadyPosted(transaction.id));
        }
        if transaction.line_items.is_empty() {
            return Err(PostingError::MissingLineItems(transaction.id));
        }
        transaction.validate_main_account(main_account)?;
        for (item, account) in transaction.line_items.iter().zip(line_accounts) {
            transaction.validate_line_item_account(account)?;
            if item.amount <= Decimal::ZERO {
                return Err(ValidationError::NegativeAmount(item.amount).into());
            }
        }
        Ok(())
    }

    /// Produces the ledger rows for `transaction` and checks they balance.
    ///
    /// Each line item yields a debit/credit pair between the main account
    /// and the line item account, followed by a pair between the main
    /// account and the VAT account when VAT is non-zero. The main account
    /// sits on the side given by `credited`.
    ///
    /// # Errors
    ///
    /// Returns `PostingError::Unbalanced` if the rows do not balance, or
    /// `ValidationError::AmountOverflow` if an amount is not representable.
    pub fn entries(transaction: &Transaction, ctx: PostingContext) -> Result<Vec<LedgerEntry>, PostingError> {
        let tx_dp = ctx.transaction_decimal_places;
        let mut entries = Vec::with_capacity(transaction.line_items.len() * 4);

        for item in &transaction.line_items {
            let total = item.total(tx_dp)?;
            Self::push_pair(&mut entries, transaction, item.id, item.account_id, total, ctx)?;

            if let Some(vat) = item.vat {
                let vat_amount = vat.amount(total, tx_dp)?;
                if !vat_amount.is_zero() {
                    Self::push_pair(&mut entries, transaction, item.id, vat.account_id, vat_amount, ctx)?;
                }
            }
        }

        validate_entries(&entries)?;
        Ok(entries)
    }

    /// Emits the debit row, then the credit row.
    fn push_pair(
        entries: &mut Vec<LedgerEntry>,
        transaction: &Transaction,
        line_item: LineItemId,
        other_account: AccountId,
        amount: Decimal,
        ctx: PostingContext,
    ) -> Result<(), ValidationError> {
        let main_side = transaction.main_entry_side();
        let converted = CurrencyService::convert(amount, ctx.rate, ctx.reporting_decimal_places)
            .ok_or(ValidationError::AmountOverflow)?;

        for entry_type in [EntryType::Debit, EntryType::Credit] {
            let (post_account, folio_account) = if entry_type == main_side {
                (transaction.account_id, other_account)
            } else {
                (other_account, transaction.account_id)
            };
            entries.push(LedgerEntry {
                id: LedgerEntryId::new(),
                transaction_id: transaction.id,
                line_item_id: Some(line_item),
                entry_type,
                folio_account,
                post_account,
                amount: converted,
                transaction_currency_amount: amount,
                currency_id: transaction.currency_id,
                date: transaction.date,
            });
        }
        Ok(())
    }
}
