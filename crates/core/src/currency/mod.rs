//! Currencies, exchange rates and Banker's Rounding conversion.

pub mod error;
pub mod exchange;
pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use error::CurrencyError;
pub use exchange::{ExchangeRate, select_rate};
pub use service::CurrencyService;
pub use types::Currency;
