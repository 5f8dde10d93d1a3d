//! Entities, currencies, accounts, rates and VAT.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};
use folio_shared::types::{AccountId, CurrencyId, EntityId};

use super::Ledger;
use crate::account::{Account, AccountType};
use crate::context::{Clock, Entity, EntityContext};
use crate::currency::{Currency, CurrencyError, ExchangeRate, select_rate};
use crate::ledger::PostingError;
use crate::store::LedgerStore;
use crate::transaction::Transaction;
use crate::vat::Vat;

impl<S: LedgerStore, C: Clock> Ledger<S, C> {
    /// Creates an entity together with its reporting currency.
    pub fn create_entity(
        &self,
        name: &str,
        currency_name: &str,
        currency_code: &str,
        decimal_places: u32,
    ) -> Result<(Entity, Currency), CurrencyError> {
        let entity_id = EntityId::new();
        let currency =
            Currency::new(entity_id, currency_name, currency_code).with_decimal_places(decimal_places);
        let entity = Entity {
            id: entity_id,
            name: name.to_string(),
            reporting_currency: currency.id,
        };
        self.store.insert_entity(entity.clone())?;
        self.store.insert_currency(currency.clone())?;
        info!(entity_id = %entity.id, currency = %currency.code, "Entity created");
        Ok((entity, currency))
    }

    /// Adds a currency.
    pub fn create_currency(
        &self,
        ctx: &EntityContext,
        name: &str,
        code: &str,
        decimal_places: u32,
    ) -> Result<Currency, CurrencyError> {
        let currency = Currency::new(ctx.entity_id, name, code).with_decimal_places(decimal_places);
        self.store.insert_currency(currency.clone())?;
        info!(entity_id = %ctx.entity_id, currency_id = %currency.id, code, "Currency created");
        Ok(currency)
    }

    /// Adds an account. The currency defaults to the reporting currency.
    pub fn create_account(
        &self,
        ctx: &EntityContext,
        name: &str,
        account_type: AccountType,
        currency_id: Option<CurrencyId>,
    ) -> Result<Account, PostingError> {
        let currency = self.live_currency(ctx, currency_id.unwrap_or(ctx.reporting_currency))?;
        let account = Account::new(ctx.entity_id, name, account_type, currency.id);
        self.store.insert_account(account.clone())?;
        info!(
            entity_id = %ctx.entity_id,
            account_id = %account.id,
            account_type = %account_type,
            "Account created"
        );
        Ok(account)
    }

    /// Records a rate for `currency_id` effective from `valid_from`.
    pub fn create_exchange_rate(
        &self,
        ctx: &EntityContext,
        currency_id: CurrencyId,
        rate: Decimal,
        valid_from: NaiveDate,
    ) -> Result<ExchangeRate, CurrencyError> {
        self.live_currency(ctx, currency_id)?;
        let exchange_rate = ExchangeRate::new(ctx.entity_id, currency_id, rate, valid_from, self.clock.now())?;
        self.store.insert_exchange_rate(exchange_rate.clone())?;
        info!(
            entity_id = %ctx.entity_id,
            currency_id = %currency_id,
            rate = %rate,
            valid_from = %valid_from,
            "Exchange rate created"
        );
        Ok(exchange_rate)
    }

    /// Adds a VAT rate posting to `account_id`.
    pub fn create_vat(
        &self,
        ctx: &EntityContext,
        name: &str,
        code: &str,
        rate: Decimal,
        account_id: AccountId,
    ) -> Result<Vat, PostingError> {
        let account = self.live_account(ctx, account_id)?;
        let vat = Vat::new(ctx.entity_id, name, code, rate, account.id)?;
        self.store.insert_vat(vat.clone())?;
        info!(entity_id = %ctx.entity_id, vat_id = %vat.id, rate = %rate, "VAT created");
        Ok(vat)
    }

    /// Loads an account.
    pub fn account(&self, ctx: &EntityContext, id: AccountId) -> Result<Account, PostingError> {
        self.live_account(ctx, id)
    }

    /// Rate in effect for `currency_id` on `date`.
    ///
    /// The reporting currency falls back to 1 when no rate is recorded.
    pub fn rate_for(
        &self,
        ctx: &EntityContext,
        currency_id: CurrencyId,
        date: NaiveDate,
    ) -> Result<Decimal, CurrencyError> {
        self.live_currency(ctx, currency_id)?;
        let rates = self.store.exchange_rates(ctx.entity_id, currency_id)?;
        if let Some(rate) = select_rate(&rates, currency_id, date) {
            debug!(currency_id = %currency_id, %date, rate = %rate.rate, "Exchange rate resolved");
            return Ok(rate.rate);
        }
        if currency_id == ctx.reporting_currency {
            return Ok(Decimal::ONE);
        }
        Err(CurrencyError::MissingExchangeRate {
            currency: currency_id,
            date,
        })
    }

    /// Rate used to post `transaction`: its pinned rate, or the dated lookup.
    pub(super) fn resolve_rate(&self, ctx: &EntityContext, transaction: &Transaction) -> Result<Decimal, PostingError> {
        let Some(rate_id) = transaction.exchange_rate_id else {
            return Ok(self.rate_for(ctx, transaction.currency_id, transaction.date)?);
        };
        let rate = self
            .store
            .exchange_rate(ctx.entity_id, rate_id)?
            .filter(ExchangeRate::is_active)
            .ok_or_else(|| PostingError::NotFound(rate_id.into()))?;
        if rate.currency_id != transaction.currency_id {
            return Err(CurrencyError::RateCurrencyMismatch {
                rate: rate_id,
                currency: transaction.currency_id,
            }
            .into());
        }
        Ok(rate.rate)
    }
}
