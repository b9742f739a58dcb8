//! Postgres-backed store.
//!
//! The commit path is a single transaction with a conditional decrement:
//! `UPDATE ... SET quantity = quantity - $n WHERE quantity >= $n`. The WHERE
//! clause is the stock check, so two concurrent sales cannot both pass it;
//! whichever transaction loses either sees the reduced quantity or fails the
//! check. The `CHECK (quantity >= 0)` constraint backs the same invariant at
//! the schema level.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use shopledger_core::SaleId;
use shopledger_inventory::StockItem;
use shopledger_sales::Sale;

use super::{ShopStore, StoreError};

#[derive(Debug, Clone)]
pub struct PostgresShopStore {
    pool: PgPool,
}

impl PostgresShopStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stock_items (
                name TEXT PRIMARY KEY,
                quantity BIGINT NOT NULL CHECK (quantity >= 0)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sales (
                id UUID PRIMARY KEY,
                item_name TEXT NOT NULL,
                quantity BIGINT NOT NULL CHECK (quantity > 0),
                amount BIGINT NOT NULL,
                receivable BIGINT NOT NULL,
                tax BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }
}

#[async_trait]
impl ShopStore for PostgresShopStore {
    async fn insert_item(&self, item: StockItem) -> Result<(), StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO stock_items (name, quantity) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING",
        )
        .bind(item.name())
        .bind(item.quantity())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_item", e))?;

        if inserted.rows_affected() == 0 {
            return Err(StoreError::DuplicateItem(item.name().to_string()));
        }
        Ok(())
    }

    async fn get_item(&self, name: &str) -> Result<Option<StockItem>, StoreError> {
        let row = sqlx::query("SELECT name, quantity FROM stock_items WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_item", e))?;

        row.map(|r| row_to_item(&r)).transpose()
    }

    async fn list_items(&self) -> Result<Vec<StockItem>, StoreError> {
        let rows = sqlx::query("SELECT name, quantity FROM stock_items ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_items", e))?;

        rows.iter().map(row_to_item).collect()
    }

    async fn commit_sale(&self, sale: &Sale) -> Result<StockItem, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("commit_sale/begin", e))?;

        let updated = sqlx::query(
            r#"
            UPDATE stock_items
            SET quantity = quantity - $2
            WHERE name = $1 AND quantity >= $2
            RETURNING name, quantity
            "#,
        )
        .bind(&sale.item_name)
        .bind(sale.quantity)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("commit_sale/update", e))?;

        let Some(row) = updated else {
            // Distinguish a missing item from insufficient stock; the
            // transaction is dropped (rolled back) either way.
            let existing = sqlx::query("SELECT quantity FROM stock_items WHERE name = $1")
                .bind(&sale.item_name)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("commit_sale/check", e))?;
            return Err(match existing {
                None => StoreError::UnknownItem(sale.item_name.clone()),
                Some(row) => StoreError::InsufficientStock {
                    item: sale.item_name.clone(),
                    available: row.get("quantity"),
                    requested: sale.quantity,
                },
            });
        };

        sqlx::query(
            r#"
            INSERT INTO sales (id, item_name, quantity, amount, receivable, tax, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(sale.id.as_uuid())
        .bind(&sale.item_name)
        .bind(sale.quantity)
        .bind(money_to_db(sale.amount)?)
        .bind(money_to_db(sale.receivable)?)
        .bind(money_to_db(sale.tax)?)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("commit_sale/insert", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_sale/commit", e))?;

        row_to_item(&row)
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, item_name, quantity, amount, receivable, tax, created_at
            FROM sales
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_sales", e))?;

        Ok(rows
            .iter()
            .map(|row| Sale {
                id: SaleId::from_uuid(row.get::<Uuid, _>("id")),
                item_name: row.get("item_name"),
                quantity: row.get("quantity"),
                amount: row.get::<i64, _>("amount") as u64,
                receivable: row.get::<i64, _>("receivable") as u64,
                tax: row.get::<i64, _>("tax") as u64,
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

fn row_to_item(row: &sqlx::postgres::PgRow) -> Result<StockItem, StoreError> {
    StockItem::new(row.get::<String, _>("name"), row.get::<i64, _>("quantity"))
        .map_err(|e| StoreError::Backend(format!("corrupt stock row: {e}")))
}

fn money_to_db(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::Backend("monetary value exceeds BIGINT".to_string()))
}

fn map_sqlx_error(operation: &str, error: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("{operation}: {error}"))
}
