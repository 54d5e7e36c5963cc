//! Cart lifecycle keyed by a session identifier (e.g. a phone number).
//!
//! At most one cart exists per session. Items are unique on
//! (cart_id, product_id); the store's ON CONFLICT upsert owns that race.
//! The create-vs-update decision is deliberately NOT made here — callers
//! check `get_cart` first and pick the operation (see `chat.rs`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;

use crate::error::{CommerceError, Result};
use crate::types::{CartItemInput, CartItemView, CartView, DeleteReceipt, Product};

#[async_trait]
pub trait CartLifecycle: Send + Sync {
    /// Read-only lookup; never creates.
    async fn get_cart(&self, session_id: &str) -> Result<Option<CartView>>;

    /// Create a cart with its initial items. Empty item lists are rejected.
    /// If any item insert fails the partially-built cart is deleted before
    /// the error propagates — there is no partial-success state.
    async fn create_cart(&self, session_id: &str, items: &[CartItemInput]) -> Result<CartView>;

    /// Apply item changes to an existing cart: qty = 0 removes the product's
    /// row if present (absence is fine), qty > 0 upserts it. `updated_at` is
    /// bumped unconditionally. Fails with NotFound when the session has no
    /// cart. A failed upsert mid-loop leaves earlier upserts committed —
    /// inherited behavior, kept as-is.
    async fn update_cart(&self, session_id: &str, items: &[CartItemInput]) -> Result<CartView>;

    /// Ensure no cart exists for the session. Absence reports success.
    async fn delete_cart_by_session(&self, session_id: &str) -> Result<DeleteReceipt>;

    /// Canonical read shape: items with nested products plus derived totals.
    async fn find_one(&self, cart_id: i64) -> Result<CartView>;
}

#[derive(Clone)]
pub struct PgCarts {
    pool: PgPool,
}

impl PgCarts {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn cart_id_for_session(&self, session_id: &str) -> Result<Option<i64>> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT id FROM carts WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id,)| id))
    }

    async fn insert_item(&self, cart_id: i64, item: &CartItemInput) -> Result<()> {
        sqlx::query("INSERT INTO cart_items (cart_id, product_id, qty) VALUES ($1, $2, $3)")
            .bind(cart_id)
            .bind(item.product_id)
            .bind(item.qty)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Remove a cart and its items. Items go first because of the FK.
    async fn delete_cart_rows(&self, cart_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CartLifecycle for PgCarts {
    async fn get_cart(&self, session_id: &str) -> Result<Option<CartView>> {
        match self.cart_id_for_session(session_id).await? {
            Some(cart_id) => Ok(Some(self.find_one(cart_id).await?)),
            None => Ok(None),
        }
    }

    async fn create_cart(&self, session_id: &str, items: &[CartItemInput]) -> Result<CartView> {
        if items.is_empty() {
            return Err(CommerceError::Validation(
                "Cart must contain at least one item".into(),
            ));
        }
        if let Some(item) = items.iter().find(|i| i.qty <= 0) {
            return Err(CommerceError::Validation(format!(
                "qty must be positive, got {} for product {}",
                item.qty, item.product_id
            )));
        }

        let (cart_id,) = sqlx::query_as::<_, (i64,)>(
            "INSERT INTO carts (session_id, created_at, updated_at) \
             VALUES ($1, now(), now()) RETURNING id",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await?;

        for item in items {
            if let Err(e) = self.insert_item(cart_id, item).await {
                // Compensating rollback: no partially-built carts.
                if let Err(del) = self.delete_cart_rows(cart_id).await {
                    warn!(cart_id, error = %del, "Rollback of partial cart failed");
                }
                return Err(e);
            }
        }

        self.find_one(cart_id).await
    }

    async fn update_cart(&self, session_id: &str, items: &[CartItemInput]) -> Result<CartView> {
        let cart_id = self
            .cart_id_for_session(session_id)
            .await?
            .ok_or_else(|| CommerceError::NotFound(format!("Cart {session_id} not found")))?;

        sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;

        for item in items {
            if item.qty < 0 {
                return Err(CommerceError::Validation(format!(
                    "qty must be non-negative, got {} for product {}",
                    item.qty, item.product_id
                )));
            }

            if item.qty == 0 {
                // Deletion signal. Idempotent: a missing row is not an error.
                sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
                    .bind(cart_id)
                    .bind(item.product_id)
                    .execute(&self.pool)
                    .await?;
            } else {
                sqlx::query(
                    "INSERT INTO cart_items (cart_id, product_id, qty) VALUES ($1, $2, $3) \
                     ON CONFLICT (cart_id, product_id) DO UPDATE SET qty = EXCLUDED.qty",
                )
                .bind(cart_id)
                .bind(item.product_id)
                .bind(item.qty)
                .execute(&self.pool)
                .await?;
            }
        }

        self.find_one(cart_id).await
    }

    async fn delete_cart_by_session(&self, session_id: &str) -> Result<DeleteReceipt> {
        if let Some(cart_id) = self.cart_id_for_session(session_id).await? {
            self.delete_cart_rows(cart_id).await?;
        }

        Ok(DeleteReceipt {
            message: "Carrito eliminado".into(),
            session_id: session_id.to_string(),
        })
    }

    async fn find_one(&self, cart_id: i64) -> Result<CartView> {
        let cart = sqlx::query_as::<_, (i64, String, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT id, session_id, created_at, updated_at FROM carts WHERE id = $1",
        )
        .bind(cart_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CommerceError::NotFound(format!("Cart {cart_id} not found")))?;

        #[allow(clippy::type_complexity)]
        let rows = sqlx::query_as::<
            _,
            (
                i64,
                i64,
                i64,
                String,
                String,
                String,
                String,
                String,
                i64,
                i64,
                i64,
                i64,
                bool,
            ),
        >(
            "SELECT ci.id, ci.product_id, ci.qty, \
                    p.type, p.size, p.color, p.category, p.description, \
                    p.stock, p.price, p.price_100, p.price_200, p.available \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.cart_id = $1 \
             ORDER BY ci.id",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        let items: Vec<CartItemView> = rows
            .into_iter()
            .map(
                |(
                    id,
                    product_id,
                    qty,
                    product_type,
                    size,
                    color,
                    category,
                    description,
                    stock,
                    price,
                    price_100,
                    price_200,
                    available,
                )| CartItemView {
                    id,
                    product_id,
                    qty,
                    product: Product {
                        id: product_id,
                        product_type,
                        size,
                        color,
                        category,
                        description,
                        stock,
                        price,
                        price_100,
                        price_200,
                        available,
                    },
                },
            )
            .collect();

        let total = items.iter().map(|i| i.product.price * i.qty).sum();
        let item_count = items.len();

        Ok(CartView {
            id: cart.0,
            session_id: cart.1,
            created_at: cart.2,
            updated_at: cart.3,
            items,
            total,
            item_count,
        })
    }
}
