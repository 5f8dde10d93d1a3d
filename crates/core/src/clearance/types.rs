//! Clearance records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use folio_shared::types::{ClearanceId, EntityId, TransactionId};

/// Allocation of part of a settling transaction against another transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clearance {
    /// Unique identifier.
    pub id: ClearanceId,
    /// Owning entity.
    pub entity_id: EntityId,
    /// The settling transaction (receipt, payment, credit note...).
    pub clearing_transaction_id: TransactionId,
    /// The transaction whose balance is reduced (invoice, bill...).
    pub cleared_transaction_id: TransactionId,
    /// Amount allocated, in the shared transaction currency.
    pub line_item_amount: Decimal,
    /// When the allocation was made.
    pub created_at: DateTime<Utc>,
}

impl Clearance {
    /// Creates a new clearance.
    #[must_use]
    pub fn new(
        entity_id: EntityId,
        clearing_transaction_id: TransactionId,
        cleared_transaction_id: TransactionId,
        line_item_amount: Decimal,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ClearanceId::new(),
            entity_id,
            clearing_transaction_id,
            cleared_transaction_id,
            line_item_amount,
            created_at,
        }
    }
}
