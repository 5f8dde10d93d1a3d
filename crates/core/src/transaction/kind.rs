//! The closed set of transaction types and their constant rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::AccountType;
use crate::account::AccountType::{
    Bank, CurrentAsset, DirectExpense, Inventory, NonCurrentAsset, OperatingExpense,
    OperatingRevenue, OtherExpense, OverheadExpense, Payable, Receivable,
};

/// Behaviour a transaction type opts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Records a sale of goods or services.
    Sells,
    /// Records a purchase.
    Buys,
    /// Can be settled by other transactions.
    Clearable,
    /// Can settle other transactions.
    Assignable,
    /// Returned by `fetch`.
    Fetchable,
}

/// Constant rules for one transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Human name used in error messages.
    pub label: &'static str,
    /// Transaction number prefix.
    pub prefix: &'static str,
    /// True if the main account is credited.
    pub credited: bool,
    /// Only journals may flip the credited side.
    pub credit_overridable: bool,
    /// Allowed main account types. `None` accepts any.
    pub main_account_types: Option<&'static [AccountType]>,
    /// Allowed line item account types. `None` accepts any.
    pub line_item_account_types: Option<&'static [AccountType]>,
    /// Opted-in behaviour.
    pub capabilities: &'static [Capability],
}

const PURCHASABLE: &[AccountType] = &[
    OperatingExpense,
    DirectExpense,
    OverheadExpense,
    OtherExpense,
    NonCurrentAsset,
    CurrentAsset,
    Inventory,
];

const CASH_SALE: TypeDescriptor = TypeDescriptor {
    label: "Cash Sale",
    prefix: "CS",
    credited: false,
    credit_overridable: false,
    main_account_types: Some(&[Bank]),
    line_item_account_types: Some(&[OperatingRevenue]),
    capabilities: &[Capability::Sells, Capability::Fetchable],
};

const CLIENT_INVOICE: TypeDescriptor = TypeDescriptor {
    label: "Client Invoice",
    prefix: "IN",
    credited: false,
    credit_overridable: false,
    main_account_types: Some(&[Receivable]),
    line_item_account_types: Some(&[OperatingRevenue]),
    capabilities: &[Capability::Sells, Capability::Clearable, Capability::Fetchable],
};

const CREDIT_NOTE: TypeDescriptor = TypeDescriptor {
    label: "Credit Note",
    prefix: "CN",
    credited: true,
    credit_overridable: false,
    main_account_types: Some(&[Receivable]),
    line_item_account_types: Some(&[OperatingRevenue]),
    capabilities: &[Capability::Sells, Capability::Assignable, Capability::Fetchable],
};

const CLIENT_RECEIPT: TypeDescriptor = TypeDescriptor {
    label: "Client Receipt",
    prefix: "RC",
    credited: true,
    credit_overridable: false,
    main_account_types: Some(&[Receivable]),
    line_item_account_types: Some(&[Bank]),
    capabilities: &[Capability::Assignable, Capability::Fetchable],
};

const CASH_PURCHASE: TypeDescriptor = TypeDescriptor {
    label: "Cash Purchase",
    prefix: "CP",
    credited: true,
    credit_overridable: false,
    main_account_types: Some(&[Bank]),
    line_item_account_types: Some(PURCHASABLE),
    capabilities: &[Capability::Buys, Capability::Fetchable],
};

const SUPPLIER_BILL: TypeDescriptor = TypeDescriptor {
    label: "Supplier Bill",
    prefix: "BL",
    credited: true,
    credit_overridable: false,
    main_account_types: Some(&[Payable]),
    line_item_account_types: Some(PURCHASABLE),
    capabilities: &[Capability::Buys, Capability::Clearable, Capability::Fetchable],
};

const DEBIT_NOTE: TypeDescriptor = TypeDescriptor {
    label: "Debit Note",
    prefix: "DN",
    credited: false,
    credit_overridable: false,
    main_account_types: Some(&[Payable]),
    line_item_account_types: Some(PURCHASABLE),
    capabilities: &[Capability::Buys, Capability::Assignable, Capability::Fetchable],
};

const SUPPLIER_PAYMENT: TypeDescriptor = TypeDescriptor {
    label: "Supplier Payment",
    prefix: "PY",
    credited: false,
    credit_overridable: false,
    main_account_types: Some(&[Payable]),
    line_item_account_types: Some(&[Bank]),
    capabilities: &[Capability::Assignable, Capability::Fetchable],
};

const CONTRA_ENTRY: TypeDescriptor = TypeDescriptor {
    label: "Contra Entry",
    prefix: "CE",
    credited: false,
    credit_overridable: false,
    main_account_types: Some(&[Bank]),
    line_item_account_types: Some(&[Bank]),
    capabilities: &[Capability::Fetchable],
};

const JOURNAL_ENTRY: TypeDescriptor = TypeDescriptor {
    label: "Journal Entry",
    prefix: "JN",
    credited: true,
    credit_overridable: true,
    main_account_types: None,
    line_item_account_types: None,
    capabilities: &[Capability::Clearable, Capability::Assignable, Capability::Fetchable],
};

/// Kind of business transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Sale paid on the spot.
    CashSale,
    /// Sale on credit.
    ClientInvoice,
    /// Reverses part of a client invoice.
    CreditNote,
    /// Money received from a client.
    ClientReceipt,
    /// Purchase paid on the spot.
    CashPurchase,
    /// Purchase on credit.
    SupplierBill,
    /// Reverses part of a supplier bill.
    DebitNote,
    /// Money paid to a supplier.
    SupplierPayment,
    /// Transfer between bank accounts.
    ContraEntry,
    /// Manual adjustment between any accounts.
    JournalEntry,
}

impl TransactionType {
    /// Every transaction type.
    pub const ALL: [Self; 10] = [
        Self::CashSale,
        Self::ClientInvoice,
        Self::CreditNote,
        Self::ClientReceipt,
        Self::CashPurchase,
        Self::SupplierBill,
        Self::DebitNote,
        Self::SupplierPayment,
        Self::ContraEntry,
        Self::JournalEntry,
    ];

    /// The constant rules for this type.
    #[must_use]
    pub const fn descriptor(self) -> &'static TypeDescriptor {
        match self {
            Self::CashSale => &CASH_SALE,
            Self::ClientInvoice => &CLIENT_INVOICE,
            Self::CreditNote => &CREDIT_NOTE,
            Self::ClientReceipt => &CLIENT_RECEIPT,
            Self::CashPurchase => &CASH_PURCHASE,
            Self::SupplierBill => &SUPPLIER_BILL,
            Self::DebitNote => &DEBIT_NOTE,
            Self::SupplierPayment => &SUPPLIER_PAYMENT,
            Self::ContraEntry => &CONTRA_ENTRY,
            Self::JournalEntry => &JOURNAL_ENTRY,
        }
    }

    /// Transaction number prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        self.descriptor().prefix
    }

    /// Default credited flag.
    #[must_use]
    pub const fn credited(self) -> bool {
        self.descriptor().credited
    }

    /// Returns true if the type opts into `capability`.
    #[must_use]
    pub fn has(self, capability: Capability) -> bool {
        self.descriptor().capabilities.contains(&capability)
    }

    /// Returns true if `account_type` may be the main account.
    #[must_use]
    pub fn accepts_main_account(self, account_type: AccountType) -> bool {
        self.descriptor()
            .main_account_types
            .is_none_or(|allowed| allowed.contains(&account_type))
    }

    /// Returns true if `account_type` may be a line item account.
    #[must_use]
    pub fn accepts_line_item_account(self, account_type: AccountType) -> bool {
        self.descriptor()
            .line_item_account_types
            .is_none_or(|allowed| allowed.contains(&account_type))
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_prefixes_are_unique() {
        let mut prefixes: Vec<_> = TransactionType::ALL.iter().map(|t| t.prefix()).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), TransactionType::ALL.len());
    }

    #[rstest]
    #[case(TransactionType::CashSale, "CS", false)]
    #[case(TransactionType::ClientInvoice, "IN", false)]
    #[case(TransactionType::CreditNote, "CN", true)]
    #[case(TransactionType::ClientReceipt, "RC", true)]
    #[case(TransactionType::CashPurchase, "CP", true)]
    #[case(TransactionType::SupplierBill, "BL", true)]
    #[case(TransactionType::DebitNote, "DN", false)]
    #[case(TransactionType::SupplierPayment, "PY", false)]
    #[case(TransactionType::ContraEntry, "CE", false)]
    #[case(TransactionType::JournalEntry, "JN", true)]
    fn test_descriptor(#[case] kind: TransactionType, #[case] prefix: &str, #[case] credited: bool) {
        assert_eq!(kind.prefix(), prefix);
        assert_eq!(kind.credited(), credited);
        assert!(kind.has(Capability::Fetchable));
    }

    #[test]
    fn test_only_journal_is_overridable() {
        for kind in TransactionType::ALL {
            assert_eq!(
                kind.descriptor().credit_overridable,
                kind == TransactionType::JournalEntry
            );
        }
    }

    #[test]
    fn test_account_constraints() {
        assert!(TransactionType::CreditNote.accepts_main_account(AccountType::Receivable));
        assert!(!TransactionType::CreditNote.accepts_main_account(AccountType::Bank));
        assert!(!TransactionType::CreditNote.accepts_line_item_account(AccountType::Reconciliation));
        assert!(TransactionType::SupplierBill.accepts_line_item_account(AccountType::Inventory));
        assert!(!TransactionType::SupplierBill.accepts_line_item_account(AccountType::OperatingRevenue));
        for account_type in AccountType::ALL {
            assert!(TransactionType::JournalEntry.accepts_main_account(account_type));
            assert!(TransactionType::JournalEntry.accepts_line_item_account(account_type));
        }
    }

    #[test]
    fn test_settlement_capabilities() {
        assert!(TransactionType::ClientInvoice.has(Capability::Clearable));
        assert!(!TransactionType::ClientInvoice.has(Capability::Assignable));
        assert!(TransactionType::ClientReceipt.has(Capability::Assignable));
        assert!(!TransactionType::CashSale.has(Capability::Clearable));
    }

    #[test]
    fn test_display_label() {
        assert_eq!(TransactionType::CreditNote.to_string(), "Credit Note");
    }
}
