use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A catalog row. Read-only from this system's point of view.
///
/// The three price columns are tiered unit prices for 50/100/200-unit
/// purchase bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub product_type: String,
    pub size: String,
    pub color: String,
    pub category: String,
    pub description: String,
    pub stock: i64,
    pub price: i64,
    pub price_100: i64,
    pub price_200: i64,
    pub available: bool,
}

/// Optional filters for fuzzy catalog queries. Field spellings accept both
/// the LLM's camelCase arguments and the REST surface's snake_case params.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilters {
    /// Free-text search term; when it is the only thing present the caller
    /// routes to `search_by_text` instead.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(rename = "type", default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(alias = "minPrice", default)]
    pub min_price: Option<f64>,
    #[serde(alias = "maxPrice", default)]
    pub max_price: Option<f64>,
    #[serde(alias = "minStock", default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl ProductFilters {
    /// True when no structured filter is set (`q` does not count).
    pub fn is_unfiltered(&self) -> bool {
        self.product_type.is_none()
            && self.size.is_none()
            && self.color.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_stock.is_none()
            && self.available.is_none()
    }
}

// ---------------------------------------------------------------------------
// Carts
// ---------------------------------------------------------------------------

/// An item reference as callers send it: qty = 0 means "remove this product".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemInput {
    pub product_id: i64,
    pub qty: i64,
}

/// The canonical read shape for a cart: items with nested product details
/// plus derived totals. Returned by every cart mutation.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub id: i64,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<CartItemView>,
    /// Σ price × qty across items; 0 for an empty cart.
    pub total: i64,
    pub item_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: i64,
    pub product_id: i64,
    pub qty: i64,
    pub product: Product,
}

/// Outcome of a session-keyed cart deletion. Deletion is "ensure absent":
/// a missing cart still yields a receipt.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteReceipt {
    pub message: String,
    pub session_id: String,
}
