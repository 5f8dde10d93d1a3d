//! Transaction headers, line items and the type catalogue.

pub mod error;
pub mod kind;
pub mod model;
pub mod number;
pub mod query;

pub use error::ValidationError;
pub use kind::{Capability, TransactionType, TypeDescriptor};
pub use model::{LineItem, LineItemInput, NewTransaction, Transaction, TransactionUpdate};
pub use number::TransactionNumber;
pub use query::TransactionQuery;
