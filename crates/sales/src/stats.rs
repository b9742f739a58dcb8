//! Read-only aggregation over the sales ledger.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::sale::Sale;

/// Number of sale records above which an item counts as popular.
pub const DEFAULT_POPULARITY_THRESHOLD: u64 = 3;

/// Aggregate totals over the whole ledger. All zero when the ledger is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub num_of_sells: u64,
    pub total_sales_amount: u64,
    pub total_receivable_amt: u64,
    pub total_tax_amount: u64,
}

pub fn summarize<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> SalesSummary {
    let mut summary = SalesSummary::default();
    for sale in sales {
        summary.num_of_sells += 1;
        summary.total_sales_amount += sale.amount;
        summary.total_receivable_amt += sale.receivable;
        summary.total_tax_amount += sale.tax;
    }
    summary
}

/// Count sale records per item name.
///
/// One increment per record, not per quantity sold: five units in one sale
/// count once.
pub fn count_items_sold<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for sale in sales {
        *counts.entry(sale.item_name.clone()).or_insert(0) += 1;
    }
    counts
}

/// Items whose sale count strictly exceeds `threshold`.
pub fn popular_items(counts: &BTreeMap<String, u64>, threshold: u64) -> Vec<String> {
    counts
        .iter()
        .filter(|&(_, &count)| count > threshold)
        .map(|(name, _)| name.clone())
        .collect()
}
