//! Sale ledger entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use store_manager_core::{Price, SaleId};

/// A recorded checkout. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub sold_at: DateTime<Utc>,
    /// Sum of the unit sale prices of every checked-out product.
    pub total: Price,
}
