//! The record-sale pipeline.
//!
//! Orchestrates the one operation with a cross-entity invariant: validate
//! the draft, then hand the store a single atomic commit (stock decrement +
//! ledger append). There are no retries; any failure leaves all state
//! unchanged.

use chrono::Utc;

use shopledger_core::{DomainError, SaleId};
use shopledger_sales::{Sale, SaleDraft};

use crate::store::{ShopStore, StoreError};

/// Failure of the record-sale pipeline, mapped to HTTP at the API layer.
#[derive(Debug)]
pub enum RecordError {
    /// The draft failed validation (deterministic).
    Validation(String),
    /// The named stock item does not exist.
    UnknownItem(String),
    /// The item exists but cannot cover the requested quantity.
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },
    /// The storage backend failed.
    Store(StoreError),
}

impl From<StoreError> for RecordError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UnknownItem(name) => RecordError::UnknownItem(name),
            StoreError::InsufficientStock {
                item,
                available,
                requested,
            } => RecordError::InsufficientStock {
                item,
                available,
                requested,
            },
            other => RecordError::Store(other),
        }
    }
}

/// Proof of a committed sale, plus what the shelf looks like afterwards.
#[derive(Debug, Clone)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub remaining_stock: i64,
}

impl SaleReceipt {
    pub fn confirmation(&self) -> String {
        self.sale.confirmation()
    }
}

#[derive(Debug, Clone)]
pub struct SaleRecorder<S> {
    store: S,
}

impl<S> SaleRecorder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: ShopStore> SaleRecorder<S> {
    /// Record a sale: validate, then atomically decrement stock and append
    /// to the ledger.
    pub async fn record(&self, draft: SaleDraft) -> Result<SaleReceipt, RecordError> {
        let sale = draft
            .into_sale(SaleId::new(), Utc::now())
            .map_err(|e| match e {
                DomainError::Validation(msg) => RecordError::Validation(msg),
                other => RecordError::Validation(other.to_string()),
            })?;

        let stock = self.store.commit_sale(&sale).await?;

        tracing::info!(
            item = %sale.item_name,
            quantity = sale.quantity,
            remaining = stock.quantity(),
            "sale recorded"
        );
        Ok(SaleReceipt {
            sale,
            remaining_stock: stock.quantity(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shopledger_inventory::StockItem;

    use crate::store::InMemoryShopStore;

    use super::*;

    fn draft(item_name: &str, quantity: i64) -> SaleDraft {
        SaleDraft {
            item_name: item_name.to_string(),
            quantity,
            amount: 400,
            receivable: 380,
            tax: 20,
        }
    }

    async fn store_with_widget(quantity: i64) -> Arc<InMemoryShopStore> {
        let store = Arc::new(InMemoryShopStore::new());
        store
            .insert_item(StockItem::new("Widget", quantity).unwrap())
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn record_decrements_stock_and_appends_to_ledger() {
        let store = store_with_widget(10).await;
        let recorder = SaleRecorder::new(store.clone());

        let receipt = recorder.record(draft("Widget", 4)).await.unwrap();

        assert_eq!(receipt.remaining_stock, 6);
        assert_eq!(receipt.confirmation(), "Sale of 4 Widget made successfully.");
        assert_eq!(store.get_item("Widget").await.unwrap().unwrap().quantity(), 6);
        let ledger = store.list_sales().await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].quantity, 4);
        assert_eq!(ledger[0].item_name, "Widget");
    }

    #[tokio::test]
    async fn oversell_is_rejected_and_leaves_state_unchanged() {
        let store = store_with_widget(10).await;
        let recorder = SaleRecorder::new(store.clone());

        let err = recorder.record(draft("Widget", 20)).await.unwrap_err();

        match err {
            RecordError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 10);
                assert_eq!(requested, 20);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(store.get_item("Widget").await.unwrap().unwrap().quantity(), 10);
        assert!(store.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_item_is_rejected_without_mutation() {
        let store = Arc::new(InMemoryShopStore::new());
        let recorder = SaleRecorder::new(store.clone());

        let err = recorder.record(draft("Widget", 1)).await.unwrap_err();

        assert!(matches!(err, RecordError::UnknownItem(name) if name == "Widget"));
        assert!(store.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_store() {
        let store = store_with_widget(10).await;
        let recorder = SaleRecorder::new(store.clone());

        let err = recorder.record(draft("Widget", 0)).await.unwrap_err();
        assert!(matches!(err, RecordError::Validation(_)));

        let err = recorder.record(draft("  ", 1)).await.unwrap_err();
        assert!(matches!(err, RecordError::Validation(_)));

        assert_eq!(store.get_item("Widget").await.unwrap().unwrap().quantity(), 10);
        assert!(store.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_sales_never_drive_stock_negative() {
        let store = store_with_widget(12).await;
        let recorder = Arc::new(SaleRecorder::new(store.clone()));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let recorder = recorder.clone();
            handles.push(tokio::spawn(async move {
                recorder.record(draft("Widget", 1)).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(RecordError::InsufficientStock { .. }) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(successes, 12);
        assert_eq!(store.get_item("Widget").await.unwrap().unwrap().quantity(), 0);
        assert_eq!(store.list_sales().await.unwrap().len(), 12);
    }
}
