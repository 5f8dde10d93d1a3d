//! Transaction lifecycle: create, edit, post, unpost and query.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};
use folio_shared::types::{AccountId, LineItemId, Money, TransactionId};

use super::Ledger;
use crate::context::{Clock, EntityContext};
use crate::ledger::{AccountBalance, LedgerEntry, PostingContext, PostingEngine, PostingError};
use crate::lock::LockKey;
use crate::period::ensure_open;
use crate::store::{LedgerStore, PostingBatch, SequenceClaim, StoreError};
use crate::transaction::{
    LineItem, LineItemInput, NewTransaction, Transaction, TransactionNumber, TransactionQuery,
    TransactionUpdate,
};

impl<S: LedgerStore, C: Clock> Ledger<S, C> {
    /// Creates an unposted transaction.
    ///
    /// The main account is checked against the type here and again on post.
    pub fn new_transaction(&self, ctx: &EntityContext, input: NewTransaction) -> Result<Transaction, PostingError> {
        let main = self.live_account(ctx, input.account_id)?;
        self.live_currency(ctx, input.currency_id.unwrap_or(ctx.reporting_currency))?;
        let transaction = Transaction::new(ctx.entity_id, input, ctx.reporting_currency, self.clock.now())?;
        transaction.validate_main_account(&main)?;
        if transaction.exchange_rate_id.is_some() {
            self.resolve_rate(ctx, &transaction)?;
        }
        self.ensure_period_open(ctx, transaction.date)?;

        self.store.save_transaction(&transaction)?;
        info!(
            entity_id = %ctx.entity_id,
            transaction_id = %transaction.id,
            transaction_type = %transaction.transaction_type,
            "Transaction created"
        );
        Ok(transaction)
    }

    /// Adds a line item, snapshotting its VAT.
    pub fn add_line_item(
        &self,
        ctx: &EntityContext,
        transaction_id: TransactionId,
        input: LineItemInput,
    ) -> Result<Transaction, PostingError> {
        self.locks.with_locks([LockKey::Transaction(transaction_id)], || {
            let mut transaction = self.live_transaction(ctx, transaction_id)?;
            transaction.ensure_editable()?;
            self.ensure_period_open(ctx, transaction.date)?;

            let account = self.live_account(ctx, input.account_id)?;
            transaction.validate_line_item_account(&account)?;
            let vat = match input.vat_id {
                Some(vat_id) => Some(
                    self.store
                        .vat(ctx.entity_id, vat_id)?
                        .filter(crate::vat::Vat::is_active)
                        .ok_or_else(|| PostingError::NotFound(vat_id.into()))?
                        .snapshot(),
                ),
                None => None,
            };

            transaction.add_line_item(LineItem {
                id: LineItemId::new(),
                transaction_id,
                account_id: account.id,
                narration: input.narration,
                amount: input.amount,
                quantity: input.quantity,
                vat,
            })?;
            transaction.updated_at = self.clock.now();
            self.store.save_transaction(&transaction)?;
            debug!(transaction_id = %transaction_id, line_items = transaction.line_items.len(), "Line item added");
            Ok(transaction)
        })
    }

    /// Removes a line item.
    pub fn remove_line_item(
        &self,
        ctx: &EntityContext,
        transaction_id: TransactionId,
        line_item_id: LineItemId,
    ) -> Result<Transaction, PostingError> {
        self.locks.with_locks([LockKey::Transaction(transaction_id)], || {
            let mut transaction = self.live_transaction(ctx, transaction_id)?;
            transaction.ensure_editable()?;
            self.ensure_period_open(ctx, transaction.date)?;
            transaction.remove_line_item(line_item_id)?;
            transaction.updated_at = self.clock.now();
            self.store.save_transaction(&transaction)?;
            debug!(transaction_id = %transaction_id, line_item_id = %line_item_id, "Line item removed");
            Ok(transaction)
        })
    }

    /// Changes date, narration or reference of an unposted transaction.
    ///
    /// Both the current and the new date must fall in writable periods.
    pub fn update_transaction(
        &self,
        ctx: &EntityContext,
        transaction_id: TransactionId,
        update: TransactionUpdate,
    ) -> Result<Transaction, PostingError> {
        self.locks.with_locks([LockKey::Transaction(transaction_id)], || {
            let mut transaction = self.live_transaction(ctx, transaction_id)?;
            transaction.ensure_editable()?;
            self.ensure_period_open(ctx, transaction.date)?;
            if let Some(date) = update.date {
                self.ensure_period_open(ctx, date)?;
            }
            transaction.apply_update(update, self.clock.now())?;
            self.store.save_transaction(&transaction)?;
            debug!(transaction_id = %transaction_id, "Transaction updated");
            Ok(transaction)
        })
    }

    /// Posts a transaction: validates it, writes balanced rows and assigns
    /// its number, all or nothing.
    ///
    /// Every check runs before the reporting period is created, so a rejected
    /// post leaves the period numbering untouched.
    pub fn post(&self, ctx: &EntityContext, transaction_id: TransactionId) -> Result<Transaction, PostingError> {
        let peek = self.live_transaction(ctx, transaction_id)?;
        if peek.posted {
            return Err(PostingError::AlreadyPosted(transaction_id));
        }
        self.prepare_entries(ctx, &peek)?;
        self.ensure_period_open(ctx, peek.date)?;

        let prefix = peek.transaction_type.prefix();
        let period = self
            .store
            .get_or_create_reporting_period(ctx.entity_id, peek.date.year())?;
        debug!(year = period.year, period_count = period.period_count, "Reporting period resolved");

        let keys = [
            LockKey::Transaction(transaction_id),
            LockKey::Sequence {
                entity: ctx.entity_id,
                period: period.id,
                prefix,
            },
        ];
        self.locks.with_locks(keys, || {
            let mut transaction = self.live_transaction(ctx, transaction_id)?;
            if transaction.posted {
                return Err(PostingError::AlreadyPosted(transaction_id));
            }
            if transaction.date.year() != period.year {
                return Err(StoreError::Conflict(format!(
                    "transaction {transaction_id} moved out of {} while posting",
                    period.year
                ))
                .into());
            }
            let (entries, posting_ctx) = self.prepare_entries(ctx, &transaction)?;
            self.ensure_period_open(ctx, transaction.date)?;

            let sequence = if transaction.transaction_no.is_some() {
                None
            } else {
                let next = self.store.last_sequence(ctx.entity_id, period.id, prefix)? + 1;
                transaction.transaction_no =
                    Some(TransactionNumber::new(prefix, period.period_count, next).to_string());
                Some(SequenceClaim {
                    period_id: period.id,
                    prefix,
                    sequence: next,
                })
            };
            transaction.posted = true;
            transaction.updated_at = self.clock.now();

            let entry_count = entries.len();
            let amount = transaction.amount(posting_ctx.transaction_decimal_places)?;
            self.store.commit_posting(PostingBatch {
                transaction: transaction.clone(),
                sequence,
                entries,
            })?;
            info!(
                entity_id = %ctx.entity_id,
                transaction_id = %transaction_id,
                transaction_no = transaction.transaction_no.as_deref().unwrap_or_default(),
                amount = %amount,
                entries = entry_count,
                "Transaction posted"
            );
            Ok(transaction)
        })
    }

    /// Deletes a transaction's ledger rows and reopens it for editing.
    pub fn unpost(&self, ctx: &EntityContext, transaction_id: TransactionId) -> Result<Transaction, PostingError> {
        self.locks.with_locks([LockKey::Transaction(transaction_id)], || {
            let mut transaction = self.live_transaction(ctx, transaction_id)?;
            if !transaction.posted {
                return Err(PostingError::NotPosted(transaction_id));
            }
            self.ensure_period_open(ctx, transaction.date)?;
            let clearances = self.store.clearances_for(ctx.entity_id, transaction_id)?;
            if !clearances.is_empty() {
                warn!(transaction_id = %transaction_id, count = clearances.len(), "Unpost rejected: hanging clearances");
                return Err(PostingError::HangingClearances {
                    transaction: transaction_id,
                    count: clearances.len(),
                });
            }

            transaction.posted = false;
            transaction.updated_at = self.clock.now();
            self.store.commit_unposting(&transaction)?;
            info!(
                entity_id = %ctx.entity_id,
                transaction_id = %transaction_id,
                transaction_no = transaction.transaction_no.as_deref().unwrap_or_default(),
                "Transaction unposted"
            );
            Ok(transaction)
        })
    }

    /// Total of line items plus VAT, in transaction currency.
    pub fn amount(&self, ctx: &EntityContext, transaction_id: TransactionId) -> Result<Money, PostingError> {
        let transaction = self.live_transaction(ctx, transaction_id)?;
        let dp = self.decimal_places(ctx, transaction.currency_id)?;
        Ok(Money::new(transaction.amount(dp)?, transaction.currency_id))
    }

    /// Loads a live transaction.
    pub fn transaction(&self, ctx: &EntityContext, transaction_id: TransactionId) -> Result<Transaction, PostingError> {
        self.live_transaction(ctx, transaction_id)
    }

    /// Transactions matching `query`, ordered by date.
    ///
    /// The currency filter defaults to the reporting currency.
    pub fn fetch(
        &self,
        ctx: &EntityContext,
        query: &TransactionQuery,
    ) -> Result<std::vec::IntoIter<Transaction>, StoreError> {
        let mut query = query.clone();
        query.currency_id.get_or_insert(ctx.reporting_currency);
        Ok(self.store.transactions(ctx.entity_id, &query)?.into_iter())
    }

    /// Rows written for one transaction. Empty while unposted.
    pub fn ledger_entries(
        &self,
        ctx: &EntityContext,
        transaction_id: TransactionId,
    ) -> Result<Vec<LedgerEntry>, PostingError> {
        self.live_transaction(ctx, transaction_id)?;
        Ok(self.store.ledger_entries(ctx.entity_id, transaction_id)?)
    }

    /// Rows posted to `account_id`, excluding those of deleted transactions.
    pub fn ledger_rows(&self, ctx: &EntityContext, account_id: AccountId) -> Result<Vec<LedgerEntry>, PostingError> {
        self.live_account(ctx, account_id)?;
        Ok(self.store.account_ledger(ctx.entity_id, account_id)?)
    }

    /// Debit and credit totals of `account_id` in the reporting currency.
    pub fn account_balance(&self, ctx: &EntityContext, account_id: AccountId) -> Result<AccountBalance, PostingError> {
        let account = self.live_account(ctx, account_id)?;
        let rows = self.store.account_ledger(ctx.entity_id, account_id)?;
        Ok(AccountBalance::from_entries(
            account.id,
            account.account_type.normal_balance(),
            &rows,
        ))
    }

    /// Account checks, rate resolution and row generation for `post`.
    fn prepare_entries(
        &self,
        ctx: &EntityContext,
        transaction: &Transaction,
    ) -> Result<(Vec<LedgerEntry>, PostingContext), PostingError> {
        let main = self.live_account(ctx, transaction.account_id)?;
        let line_accounts = transaction
            .line_items
            .iter()
            .map(|item| self.live_account(ctx, item.account_id))
            .collect::<Result<Vec<_>, _>>()?;
        let line_refs: Vec<_> = line_accounts.iter().collect();
        PostingEngine::validate(transaction, &main, &line_refs)?;

        let posting_ctx = PostingContext {
            rate: self.resolve_rate(ctx, transaction)?,
            transaction_decimal_places: self.decimal_places(ctx, transaction.currency_id)?,
            reporting_decimal_places: self.decimal_places(ctx, ctx.reporting_currency)?,
        };
        let entries = PostingEngine::entries(transaction, posting_ctx)?;
        Ok((entries, posting_ctx))
    }

    /// Rejects changes dated in a closed period. Years without a period pass.
    pub(super) fn ensure_period_open(&self, ctx: &EntityContext, date: NaiveDate) -> Result<(), PostingError> {
        let period = self.store.reporting_period(ctx.entity_id, date.year())?;
        ensure_open(period.as_ref(), date).map_err(|err| {
            warn!(entity_id = %ctx.entity_id, year = err.year, "Rejected: reporting period is closed");
            PostingError::from(err)
        })
    }
}
