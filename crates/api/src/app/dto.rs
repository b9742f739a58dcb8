use serde::Deserialize;

use shopledger_inventory::StockItem;
use shopledger_sales::{Sale, SaleDraft};

// -------------------------
// Request DTOs
// -------------------------

/// Wire format of the sale endpoint. Field names follow the public API
/// (`items_name`, `receivable_amt`, `tax_amount`); monetary values are minor
/// units.
#[derive(Debug, Deserialize)]
pub struct RecordSaleRequest {
    pub items_name: String,
    pub quantity: i64,
    pub amount: u64,
    pub receivable_amt: u64,
    pub tax_amount: u64,
}

impl RecordSaleRequest {
    pub fn into_draft(self) -> SaleDraft {
        SaleDraft {
            item_name: self.items_name,
            quantity: self.quantity,
            amount: self.amount,
            receivable: self.receivable_amt,
            tax: self.tax_amount,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub quantity: i64,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn sale_to_json(sale: &Sale) -> serde_json::Value {
    serde_json::json!({
        "id": sale.id.to_string(),
        "items_name": sale.item_name,
        "quantity": sale.quantity,
        "amount": sale.amount,
        "receivable_amt": sale.receivable,
        "tax_amount": sale.tax,
        "created_at": sale.created_at.to_rfc3339(),
    })
}

pub fn item_to_json(item: &StockItem) -> serde_json::Value {
    serde_json::json!({
        "name": item.name(),
        "quantity": item.quantity(),
    })
}
