//! Storage seam for stock and the sales ledger.
//!
//! The trait is deliberately narrow: plain create/read per key, plus one
//! composite operation, [`ShopStore::commit_sale`], because the stock
//! decrement and the ledger append must land together. Pushing that
//! atomicity into the store lets each backend use its native mechanism (a
//! write lock in memory, a transaction in Postgres) instead of leaking
//! locking into callers.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shopledger_inventory::StockItem;
use shopledger_sales::Sale;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryShopStore;
pub use postgres::PostgresShopStore;

/// Storage failure, including the two rejections `commit_sale` can decide.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no stock item named {0:?}")]
    UnknownItem(String),

    #[error("not enough stock of {item:?}: {available} available, {requested} requested")]
    InsufficientStock {
        item: String,
        available: i64,
        requested: i64,
    },

    #[error("stock item {0:?} already exists")]
    DuplicateItem(String),

    #[error("store backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ShopStore: Send + Sync {
    /// Create a stock item. Fails with `DuplicateItem` if the name is taken.
    async fn insert_item(&self, item: StockItem) -> Result<(), StoreError>;

    async fn get_item(&self, name: &str) -> Result<Option<StockItem>, StoreError>;

    /// All stock items, ordered by name.
    async fn list_items(&self) -> Result<Vec<StockItem>, StoreError>;

    /// Atomically check stock for `sale.item_name`, decrement it by
    /// `sale.quantity`, and append the sale to the ledger.
    ///
    /// Returns the updated stock item. On `UnknownItem` or
    /// `InsufficientStock` nothing is written; concurrent commits for the
    /// same item serialize, so stock can never go negative.
    async fn commit_sale(&self, sale: &Sale) -> Result<StockItem, StoreError>;

    /// The full ledger in insertion order.
    async fn list_sales(&self) -> Result<Vec<Sale>, StoreError>;
}

#[async_trait]
impl<S> ShopStore for Arc<S>
where
    S: ShopStore + ?Sized,
{
    async fn insert_item(&self, item: StockItem) -> Result<(), StoreError> {
        (**self).insert_item(item).await
    }

    async fn get_item(&self, name: &str) -> Result<Option<StockItem>, StoreError> {
        (**self).get_item(name).await
    }

    async fn list_items(&self) -> Result<Vec<StockItem>, StoreError> {
        (**self).list_items().await
    }

    async fn commit_sale(&self, sale: &Sale) -> Result<StockItem, StoreError> {
        (**self).commit_sale(sale).await
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, StoreError> {
        (**self).list_sales().await
    }
}
