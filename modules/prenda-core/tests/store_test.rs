//! Integration tests for the Postgres catalog and cart stores.
//!
//! Requires DATABASE_TEST_URL to point at a scratch database; tests are
//! skipped silently when it is unset.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use prenda_core::cart::{CartLifecycle, PgCarts};
use prenda_core::catalog::{CatalogQueries, PgCatalog};
use prenda_core::types::{CartItemInput, ProductFilters};
use prenda_core::CommerceError;

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect to test database");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id BIGSERIAL PRIMARY KEY,
            type TEXT NOT NULL,
            size TEXT NOT NULL,
            color TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            stock BIGINT NOT NULL DEFAULT 0,
            price BIGINT NOT NULL DEFAULT 0,
            price_100 BIGINT NOT NULL DEFAULT 0,
            price_200 BIGINT NOT NULL DEFAULT 0,
            available BOOLEAN NOT NULL DEFAULT true
        )",
    )
    .execute(&pool)
    .await
    .expect("create products table");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS carts (
            id BIGSERIAL PRIMARY KEY,
            session_id TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(&pool)
    .await
    .expect("create carts table");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS cart_items (
            id BIGSERIAL PRIMARY KEY,
            cart_id BIGINT NOT NULL REFERENCES carts(id),
            product_id BIGINT NOT NULL REFERENCES products(id),
            qty BIGINT NOT NULL,
            UNIQUE (cart_id, product_id)
        )",
    )
    .execute(&pool)
    .await
    .expect("create cart_items table");

    sqlx::query("TRUNCATE cart_items, carts, products RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("truncate tables");

    Some(pool)
}

async fn seed_product(
    pool: &PgPool,
    product_type: &str,
    size: &str,
    color: &str,
    category: &str,
    price: i64,
    stock: i64,
    available: bool,
) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO products (type, size, color, category, description, stock, \
                               price, price_100, price_200, available) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
    )
    .bind(product_type)
    .bind(size)
    .bind(color)
    .bind(category)
    .bind(format!("{product_type} {color} de prueba"))
    .bind(stock)
    .bind(price)
    .bind(price - 2)
    .bind(price - 4)
    .bind(available)
    .fetch_one(pool)
    .await
    .expect("seed product");
    id
}

async fn seed_catalog(pool: &PgPool) -> Vec<i64> {
    let mut ids = Vec::new();
    ids.push(seed_product(pool, "Camiseta", "M", "Azul", "casual", 25, 40, true).await);
    ids.push(seed_product(pool, "Camiseta", "L", "Rojo", "deportivo", 22, 0, false).await);
    ids.push(seed_product(pool, "Pantalón", "32", "Negro", "formal", 60, 15, true).await);
    ids.push(seed_product(pool, "pantalones", "34", "Azul", "casual", 55, 8, true).await);
    ids.push(seed_product(pool, "Sudadera", "M", "Gris", "casual", 45, 20, true).await);
    ids
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_products_matches_accented_and_plural_type_variants() {
    let Some(pool) = test_pool().await else {
        return;
    };
    seed_catalog(&pool).await;
    let catalog = PgCatalog::new(pool);

    // Unaccented singular input finds both "Pantalón" and "pantalones".
    let filters = ProductFilters {
        product_type: Some("pantalon".into()),
        ..Default::default()
    };
    let products = catalog.get_products(&filters).await.unwrap();
    assert_eq!(products.len(), 2);
    assert!(products
        .iter()
        .all(|p| p.product_type.to_lowercase().starts_with("pantal")));
}

#[tokio::test]
async fn get_products_applies_all_filters_conjunctively_and_sorts() {
    let Some(pool) = test_pool().await else {
        return;
    };
    seed_catalog(&pool).await;
    let catalog = PgCatalog::new(pool);

    let filters = ProductFilters {
        category: Some("casual".into()),
        available: Some(true),
        ..Default::default()
    };
    let products = catalog.get_products(&filters).await.unwrap();
    assert_eq!(products.len(), 3);

    // (type, price) ascending.
    let keys: Vec<_> = products
        .iter()
        .map(|p| (p.product_type.clone(), p.price))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[tokio::test]
async fn get_products_price_bounds_are_inclusive() {
    let Some(pool) = test_pool().await else {
        return;
    };
    seed_catalog(&pool).await;
    let catalog = PgCatalog::new(pool);

    let filters = ProductFilters {
        min_price: Some(25.0),
        max_price: Some(55.0),
        ..Default::default()
    };
    let products = catalog.get_products(&filters).await.unwrap();
    let prices: Vec<_> = products.iter().map(|p| p.price).collect();
    assert!(prices.contains(&25));
    assert!(prices.contains(&55));
    assert!(prices.iter().all(|&p| (25..=55).contains(&p)));
}

#[tokio::test]
async fn get_products_with_no_match_returns_empty() {
    let Some(pool) = test_pool().await else {
        return;
    };
    seed_catalog(&pool).await;
    let catalog = PgCatalog::new(pool);

    let filters = ProductFilters {
        color: Some("fucsia".into()),
        ..Default::default()
    };
    assert!(catalog.get_products(&filters).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_by_text_scans_type_description_and_category() {
    let Some(pool) = test_pool().await else {
        return;
    };
    seed_catalog(&pool).await;
    let catalog = PgCatalog::new(pool);

    // "deportivo" only appears in a category.
    let by_category = catalog.search_by_text("deportivo").await.unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].category, "deportivo");

    // Variant expansion reaches the accented type through the plural input.
    let by_type = catalog.search_by_text("camisetas").await.unwrap();
    assert_eq!(by_type.len(), 2);
}

#[tokio::test]
async fn find_by_id_and_by_ids() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let ids = seed_catalog(&pool).await;
    let catalog = PgCatalog::new(pool);

    let product = catalog.find_by_id(ids[0]).await.unwrap().unwrap();
    assert_eq!(product.id, ids[0]);
    assert!(catalog.find_by_id(999_999).await.unwrap().is_none());

    let batch = catalog.find_by_ids(&[ids[0], ids[2]]).await.unwrap();
    assert_eq!(batch.len(), 2);
}

#[tokio::test]
async fn find_by_filters_matches_exactly_and_rejects_unknown_fields() {
    let Some(pool) = test_pool().await else {
        return;
    };
    seed_catalog(&pool).await;
    let catalog = PgCatalog::new(pool);

    let products = catalog
        .find_by_filters(&[
            ("type".to_string(), "Camiseta".to_string()),
            ("available".to_string(), "true".to_string()),
        ])
        .await
        .unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].color, "Azul");

    let err = catalog
        .find_by_filters(&[("description; DROP TABLE products".to_string(), "x".to_string())])
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Carts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_cart_rejects_empty_item_list() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let carts = PgCarts::new(pool);

    let err = carts.create_cart("s1", &[]).await.unwrap_err();
    assert!(matches!(err, CommerceError::Validation(_)));
}

#[tokio::test]
async fn create_cart_computes_totals_over_joined_products() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let ids = seed_catalog(&pool).await;
    let carts = PgCarts::new(pool);

    let cart = carts
        .create_cart(
            "s1",
            &[
                CartItemInput {
                    product_id: ids[0],
                    qty: 2,
                },
                CartItemInput {
                    product_id: ids[2],
                    qty: 1,
                },
            ],
        )
        .await
        .unwrap();

    assert_eq!(cart.session_id, "s1");
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.total, 25 * 2 + 60);
    assert_eq!(cart.items[0].product.id, ids[0]);
}

#[tokio::test]
async fn create_cart_rolls_back_on_unknown_product() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let ids = seed_catalog(&pool).await;
    let carts = PgCarts::new(pool.clone());

    let err = carts
        .create_cart(
            "s1",
            &[
                CartItemInput {
                    product_id: ids[0],
                    qty: 1,
                },
                CartItemInput {
                    product_id: 999_999, // FK violation
                    qty: 1,
                },
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::Database(_)));

    // No partially-built cart survives.
    assert!(carts.get_cart("s1").await.unwrap().is_none());
    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM cart_items")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn update_cart_requires_an_existing_cart() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let carts = PgCarts::new(pool);

    let err = carts
        .update_cart(
            "missing",
            &[CartItemInput {
                product_id: 1,
                qty: 1,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::NotFound(_)));
}

#[tokio::test]
async fn update_cart_upserts_and_removes_on_zero_qty() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let ids = seed_catalog(&pool).await;
    let carts = PgCarts::new(pool);

    carts
        .create_cart(
            "s1",
            &[CartItemInput {
                product_id: ids[0],
                qty: 2,
            }],
        )
        .await
        .unwrap();

    // Upsert replaces qty rather than adding a second row.
    let cart = carts
        .update_cart(
            "s1",
            &[CartItemInput {
                product_id: ids[0],
                qty: 5,
            }],
        )
        .await
        .unwrap();
    assert_eq!(cart.item_count, 1);
    assert_eq!(cart.items[0].qty, 5);
    assert_eq!(cart.total, 25 * 5);

    // qty = 0 removes the line; repeating it stays successful.
    let cart = carts
        .update_cart(
            "s1",
            &[CartItemInput {
                product_id: ids[0],
                qty: 0,
            }],
        )
        .await
        .unwrap();
    assert_eq!(cart.item_count, 0);
    assert_eq!(cart.total, 0);

    let cart = carts
        .update_cart(
            "s1",
            &[CartItemInput {
                product_id: ids[0],
                qty: 0,
            }],
        )
        .await
        .unwrap();
    assert_eq!(cart.item_count, 0);
}

#[tokio::test]
async fn update_cart_bumps_updated_at() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let ids = seed_catalog(&pool).await;
    let carts = PgCarts::new(pool);

    let created = carts
        .create_cart(
            "s1",
            &[CartItemInput {
                product_id: ids[0],
                qty: 1,
            }],
        )
        .await
        .unwrap();

    let updated = carts
        .update_cart(
            "s1",
            &[CartItemInput {
                product_id: ids[2],
                qty: 1,
            }],
        )
        .await
        .unwrap();

    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.item_count, 2);
}

#[tokio::test]
async fn delete_cart_by_session_is_idempotent() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let ids = seed_catalog(&pool).await;
    let carts = PgCarts::new(pool);

    carts
        .create_cart(
            "s1",
            &[CartItemInput {
                product_id: ids[0],
                qty: 1,
            }],
        )
        .await
        .unwrap();

    let receipt = carts.delete_cart_by_session("s1").await.unwrap();
    assert_eq!(receipt.session_id, "s1");
    assert!(carts.get_cart("s1").await.unwrap().is_none());

    // Second delete of the same (now absent) cart still reports success.
    let receipt = carts.delete_cart_by_session("s1").await.unwrap();
    assert_eq!(receipt.message, "Carrito eliminado");
}

#[tokio::test]
async fn get_cart_returns_none_for_unknown_session() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let carts = PgCarts::new(pool);
    assert!(carts.get_cart("nobody").await.unwrap().is_none());
}
