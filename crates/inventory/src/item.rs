use serde::{Deserialize, Serialize};

use shopledger_core::{DomainError, DomainResult};

/// Current on-hand stock for a single named item.
///
/// The name is the unique key; the quantity is never negative. Both are
/// enforced at construction, and [`StockItem::reserve`] is the only way to
/// take stock out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    name: String,
    quantity: i64,
}

impl StockItem {
    pub fn new(name: impl Into<String>, quantity: i64) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        Ok(Self { name, quantity })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Decide a stock reservation: the decremented item on success.
    ///
    /// Pure decision logic; callers own making the swap atomic against
    /// concurrent reservations of the same item.
    pub fn reserve(&self, quantity: i64) -> DomainResult<StockItem> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if self.quantity < quantity {
            return Err(DomainError::conflict("Not enough stock available."));
        }
        Ok(Self {
            name: self.name.clone(),
            quantity: self.quantity - quantity,
        })
    }
}
