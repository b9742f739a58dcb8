use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};

use async_trait::async_trait;

use shopledger_inventory::StockItem;
use shopledger_sales::Sale;

use super::{ShopStore, StoreError};

#[derive(Debug, Default)]
struct ShopState {
    items: HashMap<String, StockItem>,
    sales: Vec<Sale>,
}

/// In-memory store for dev and tests.
///
/// One lock over the whole state: `commit_sale` holds the write guard across
/// check, decrement, and append, which is what keeps concurrent sales of the
/// same item from driving stock negative.
#[derive(Debug, Default)]
pub struct InMemoryShopStore {
    inner: RwLock<ShopState>,
}

impl InMemoryShopStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ShopState>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("shop state lock poisoned".to_string()))
    }
}

#[async_trait]
impl ShopStore for InMemoryShopStore {
    async fn insert_item(&self, item: StockItem) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.items.contains_key(item.name()) {
            return Err(StoreError::DuplicateItem(item.name().to_string()));
        }
        state.items.insert(item.name().to_string(), item);
        Ok(())
    }

    async fn get_item(&self, name: &str) -> Result<Option<StockItem>, StoreError> {
        let state = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("shop state lock poisoned".to_string()))?;
        Ok(state.items.get(name).cloned())
    }

    async fn list_items(&self) -> Result<Vec<StockItem>, StoreError> {
        let state = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("shop state lock poisoned".to_string()))?;
        let mut items: Vec<StockItem> = state.items.values().cloned().collect();
        items.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(items)
    }

    async fn commit_sale(&self, sale: &Sale) -> Result<StockItem, StoreError> {
        let mut state = self.write()?;

        let item = state
            .items
            .get(&sale.item_name)
            .ok_or_else(|| StoreError::UnknownItem(sale.item_name.clone()))?;
        if item.quantity() < sale.quantity {
            return Err(StoreError::InsufficientStock {
                item: sale.item_name.clone(),
                available: item.quantity(),
                requested: sale.quantity,
            });
        }
        let updated = item
            .reserve(sale.quantity)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        state.items.insert(sale.item_name.clone(), updated.clone());
        state.sales.push(sale.clone());
        Ok(updated)
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, StoreError> {
        let state = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("shop state lock poisoned".to_string()))?;
        Ok(state.sales.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use shopledger_core::SaleId;

    use super::*;

    fn sale(item_name: &str, quantity: i64) -> Sale {
        Sale {
            id: SaleId::new(),
            item_name: item_name.to_string(),
            quantity,
            amount: 100,
            receivable: 100,
            tax: 5,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_names() {
        let store = InMemoryShopStore::new();
        store
            .insert_item(StockItem::new("Widget", 10).unwrap())
            .await
            .unwrap();
        let err = store
            .insert_item(StockItem::new("Widget", 3).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateItem(_)));
    }

    #[tokio::test]
    async fn commit_sale_decrements_and_appends() {
        let store = InMemoryShopStore::new();
        store
            .insert_item(StockItem::new("Widget", 10).unwrap())
            .await
            .unwrap();

        let updated = store.commit_sale(&sale("Widget", 4)).await.unwrap();

        assert_eq!(updated.quantity(), 6);
        assert_eq!(store.get_item("Widget").await.unwrap().unwrap().quantity(), 6);
        assert_eq!(store.list_sales().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn commit_sale_rejects_unknown_items_without_writing() {
        let store = InMemoryShopStore::new();
        let err = store.commit_sale(&sale("Widget", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownItem(_)));
        assert!(store.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn commit_sale_rejects_oversell_without_writing() {
        let store = InMemoryShopStore::new();
        store
            .insert_item(StockItem::new("Widget", 10).unwrap())
            .await
            .unwrap();

        let err = store.commit_sale(&sale("Widget", 20)).await.unwrap_err();

        match err {
            StoreError::InsufficientStock {
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
    async fn sales_are_listed_in_insertion_order() {
        let store = InMemoryShopStore::new();
        store
            .insert_item(StockItem::new("Widget", 10).unwrap())
            .await
            .unwrap();

        let first = sale("Widget", 1);
        let second = sale("Widget", 2);
        store.commit_sale(&first).await.unwrap();
        store.commit_sale(&second).await.unwrap();

        let ledger = store.list_sales().await.unwrap();
        assert_eq!(ledger, vec![first, second]);
    }
}
