use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use restock_core::ProductId;

/// Append-only sale history entry.
///
/// Name and unit price are denormalized snapshots taken at sale time; the row
/// is created exactly once per committed line item and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity_sold: u64,
    /// Unit price snapshot in smallest currency unit (e.g., cents).
    pub unit_price: u64,
    pub sold_at: DateTime<Utc>,
}
