//! Aggregate counters for the dashboard cards.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::product::ProductRecord;

/// Snapshot-wide counters. Spans every owner: the dashboard is shared, only
/// the product listing is owner-scoped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    /// Rows in the products table.
    pub total_products: u64,
    /// Rows whose `validade` falls within the next 30 days (inclusive).
    /// Already-expired rows count too; the card warns about anything at or
    /// past the edge.
    pub expiring_soon: u64,
    /// Sum of `quantidade` over all rows.
    pub total_quantity: u64,
    /// Rows created in the last 7 days (inclusive boundary).
    pub recent_products: u64,
}

impl InventoryStats {
    /// Compute the counters over a full snapshot, relative to `now`.
    pub fn summarize<'a, I>(rows: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a ProductRecord>,
    {
        let expiry_cutoff = now.date_naive() + Duration::days(30);
        let recency_cutoff = now - Duration::days(7);

        let mut stats = Self::default();
        for record in rows {
            stats.total_products += 1;
            stats.total_quantity += u64::from(record.quantidade);
            if record.validade <= expiry_cutoff {
                stats.expiring_soon += 1;
            }
            if record.created_at >= recency_cutoff {
                stats.recent_products += 1;
            }
        }
        stats
    }
}
