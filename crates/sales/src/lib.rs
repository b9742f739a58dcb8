//! Sales domain module.
//!
//! This crate contains business rules for the sales ledger, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod sale;
pub mod stats;

pub use sale::{Sale, SaleDraft};
pub use stats::{
    count_items_sold, popular_items, summarize, SalesSummary, DEFAULT_POPULARITY_THRESHOLD,
};
