//! Infrastructure layer: storage adapters and the record-sale pipeline.

pub mod sale_recorder;
pub mod store;

pub use sale_recorder::{RecordError, SaleReceipt, SaleRecorder};
pub use store::{InMemoryShopStore, PostgresShopStore, ShopStore, StoreError};
