//! Typed record identifiers.
//!
//! Every id wraps a UUID v7, so ids of one kind sort in creation order. The
//! lock registry and the ledger row ordering both rely on that `Ord`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares one newtype per `Name => "doc"` pair.
macro_rules! typed_ids {
    ($($name:ident => $doc:expr),* $(,)?) => {
        $(
            #[doc = $doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(pub Uuid);

            impl $name {
                /// Fresh time-ordered id.
                #[must_use]
                pub fn new() -> Self {
                    Self(Uuid::now_v7())
                }

                /// Wraps an existing UUID.
                #[must_use]
                pub const fn from_uuid(uuid: Uuid) -> Self {
                    Self(uuid)
                }

                /// The wrapped UUID.
                #[must_use]
                pub const fn into_inner(self) -> Uuid {
                    self.0
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl From<$name> for Uuid {
                fn from(id: $name) -> Self {
                    id.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    std::fmt::Display::fmt(&self.0, f)
                }
            }

            impl std::str::FromStr for $name {
                type Err = uuid::Error;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Uuid::parse_str(s).map(Self)
                }
            }
        )*
    };
}

typed_ids! {
    EntityId => "A reporting entity (tenant).",
    AccountId => "A chart of accounts entry.",
    CurrencyId => "A currency record.",
    ExchangeRateId => "An exchange rate.",
    ReportingPeriodId => "A reporting period.",
    VatId => "A VAT rate.",
    TransactionId => "A transaction.",
    LineItemId => "A transaction line item.",
    LedgerEntryId => "A ledger row.",
    ClearanceId => "A clearance allocation.",
    RecycledObjectId => "A recycle bin entry.",
}
