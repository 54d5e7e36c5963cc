//! Filtered and fuzzy queries against the `products` table.
//!
//! Text fields match as case-insensitive substrings; the `type` field
//! additionally expands through [`crate::normalize::variants`] and matches
//! when ANY variant matches. Numeric bounds are inclusive.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::{CommerceError, Result};
use crate::normalize::variants;
use crate::types::{Product, ProductFilters};

const SELECT_PRODUCTS: &str = "SELECT id, type, size, color, category, description, \
     stock, price, price_100, price_200, available FROM products";

/// Columns accepted by the exact-equality filter surface. Anything else is
/// rejected before it can reach the SQL text.
const EXACT_FILTER_COLUMNS: &[&str] = &[
    "id",
    "type",
    "size",
    "color",
    "category",
    "stock",
    "price",
    "price_100",
    "price_200",
    "available",
];

#[async_trait]
pub trait CatalogQueries: Send + Sync {
    /// Fuzzy multi-field query. All present filters must hold (conjunction);
    /// results sorted by (type, price) ascending. No filters ⇒ full catalog.
    async fn get_products(&self, filters: &ProductFilters) -> Result<Vec<Product>>;

    /// Point lookup; absence is not an error.
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>>;

    /// Batch point lookup, order unspecified.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>>;

    /// Variant-expanded search across type, description and category.
    async fn search_by_text(&self, query: &str) -> Result<Vec<Product>>;

    /// Exact-equality lookup, AND across fields. Distinct from the fuzzy
    /// `get_products`; field names are validated against an allow-list.
    async fn find_by_filters(&self, filters: &[(String, String)]) -> Result<Vec<Product>>;
}

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogQueries for PgCatalog {
    async fn get_products(&self, filters: &ProductFilters) -> Result<Vec<Product>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_PRODUCTS);
        let mut first = true;

        if let Some(ref product_type) = filters.product_type {
            push_clause_start(&mut qb, &mut first);
            qb.push("(");
            for (i, variant) in variants(product_type).iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push("type ILIKE ").push_bind(format!("%{variant}%"));
            }
            qb.push(")");
        }

        for (column, value) in [
            ("size", &filters.size),
            ("color", &filters.color),
            ("category", &filters.category),
        ] {
            if let Some(value) = value {
                push_clause_start(&mut qb, &mut first);
                qb.push(column)
                    .push(" ILIKE ")
                    .push_bind(format!("%{value}%"));
            }
        }

        if let Some(min_price) = filters.min_price {
            push_clause_start(&mut qb, &mut first);
            qb.push("price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filters.max_price {
            push_clause_start(&mut qb, &mut first);
            qb.push("price <= ").push_bind(max_price);
        }
        if let Some(min_stock) = filters.min_stock {
            push_clause_start(&mut qb, &mut first);
            qb.push("stock >= ").push_bind(min_stock);
        }
        if let Some(available) = filters.available {
            push_clause_start(&mut qb, &mut first);
            qb.push("available = ").push_bind(available);
        }

        qb.push(" ORDER BY type ASC, price ASC");

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCTS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>> {
        let products =
            sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCTS} WHERE id = ANY($1)"))
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(products)
    }

    async fn search_by_text(&self, query: &str) -> Result<Vec<Product>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_PRODUCTS);
        qb.push(" WHERE ");

        for (i, variant) in variants(query).iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            let pattern = format!("%{variant}%");
            qb.push("(type ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR category ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY type ASC");

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }

    async fn find_by_filters(&self, filters: &[(String, String)]) -> Result<Vec<Product>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_PRODUCTS);
        let mut first = true;

        for (field, value) in filters {
            if !EXACT_FILTER_COLUMNS.contains(&field.as_str()) {
                return Err(CommerceError::Validation(format!(
                    "unknown filter field: {field}"
                )));
            }
            push_clause_start(&mut qb, &mut first);
            // Compare as text so string-encoded numbers and booleans work.
            qb.push(format!("{field}::text = ")).push_bind(value.clone());
        }

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;
        Ok(products)
    }
}

fn push_clause_start(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool) {
    if *first {
        qb.push(" WHERE ");
        *first = false;
    } else {
        qb.push(" AND ");
    }
}
