//! Double-entry posting.
//!
//! The posting engine turns a validated transaction into balanced ledger
//! rows. It is pure: resolving accounts, periods and rates, and writing the
//! rows, is the job of the `Ledger` facade.

pub mod balance;
pub mod entry;
pub mod error;
pub mod posting;
pub mod validation;

#[cfg(test)]
mod posting_props;

pub use balance::AccountBalance;
pub use entry::{EntryType, LedgerEntry};
pub use error::PostingError;
pub use posting::{PostingContext, PostingEngine};
pub use validation::{LedgerValidationError, validate_entries};
