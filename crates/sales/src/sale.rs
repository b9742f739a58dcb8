use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopledger_core::{DomainError, DomainResult, SaleId};

/// A completed sale, as recorded in the ledger.
///
/// Immutable once created; the only producer is the sale recorder, which
/// commits the record together with the matching stock decrement. Monetary
/// fields are minor units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub item_name: String,
    pub quantity: i64,
    /// Total sale amount for this record.
    pub amount: u64,
    /// Portion of the amount still receivable.
    pub receivable: u64,
    /// Tax charged on this sale.
    pub tax: u64,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Human-readable confirmation returned to the caller on success.
    pub fn confirmation(&self) -> String {
        format!(
            "Sale of {} {} made successfully.",
            self.quantity, self.item_name
        )
    }
}

/// A sale request that has not been committed yet.
///
/// Carries exactly the caller-supplied fields; [`SaleDraft::into_sale`] is
/// the validation gate between the wire and the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDraft {
    pub item_name: String,
    pub quantity: i64,
    pub amount: u64,
    pub receivable: u64,
    pub tax: u64,
}

impl SaleDraft {
    pub fn into_sale(self, id: SaleId, created_at: DateTime<Utc>) -> DomainResult<Sale> {
        if self.item_name.trim().is_empty() {
            return Err(DomainError::validation("items_name cannot be empty"));
        }
        if self.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        Ok(Sale {
            id,
            item_name: self.item_name,
            quantity: self.quantity,
            amount: self.amount,
            receivable: self.receivable,
            tax: self.tax,
            created_at,
        })
    }
}
