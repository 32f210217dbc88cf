//! Admin summary figures.

use serde::Serialize;

use store_manager_core::Price;

/// Aggregates shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of products in the catalog.
    pub total_products: i64,
    /// Sum of every product's sale price. Not weighted by stock quantity.
    pub stock_value: Price,
    /// Sales recorded during the current UTC day.
    pub sales_today: i64,
}
