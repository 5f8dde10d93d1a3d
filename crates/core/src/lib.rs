//! Core business logic for Folio.
//!
//! This crate holds the bookkeeping engine with no web or database
//! dependencies. Persistence is reached only through the [`LedgerStore`]
//! trait, so the same rules run against any backend.
//!
//! # Modules
//!
//! - `account` - Chart of accounts and account types
//! - `transaction` - Transaction types, line items and queries
//! - `ledger` - Double-entry posting and balances
//! - `currency` - Currencies, exchange rates and rounding
//! - `period` - Reporting periods and the closed-period gate
//! - `clearance` - Assignment of payments against invoices
//! - `recycle` - Soft delete, restore and destroy
//! - `service` - The [`Ledger`] facade tying the above to a store

pub mod account;
pub mod clearance;
pub mod context;
pub mod currency;
pub mod ledger;
pub mod lock;
pub mod period;
pub mod recycle;
pub mod service;
pub mod store;
pub mod transaction;
pub mod vat;

pub use context::{Clock, Entity, EntityContext, FixedClock, SystemClock};
pub use service::Ledger;
pub use store::{LedgerStore, StoreError};
