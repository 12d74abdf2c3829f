//! `PostgreSQL` repository tests.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `CART_API_DATABASE_URL` (or `DATABASE_URL`). Migrations are applied on
//! connect; every test works on freshly named rows so runs don't collide.
//!
//! Run with:
//! ```bash
//! cargo test -p shopping-cart-integration-tests --test postgres_repositories -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use shopping_cart_api::db::{
    self, CartRepository, CustomerRepository, OrderRepository, PgCartRepository,
    PgCustomerRepository, PgOrderRepository, PgProductRepository, ProductRepository,
    RepositoryError,
};
use shopping_cart_api::models::NewProduct;
use shopping_cart_core::{CartItemId, CustomerId, ProductId, Quantity, UserName};

async fn pool() -> PgPool {
    let url = std::env::var("CART_API_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CART_API_DATABASE_URL or DATABASE_URL must be set");

    let pool = db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("../api/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// A user name no other test run has used, e.g. `pg-3f9a1c2b7d4e`.
fn unique_name() -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(12).collect();
    format!("pg-{suffix}")
}

async fn customer(pool: &PgPool, name: &str) -> CustomerId {
    PgCustomerRepository::new(pool.clone())
        .save(&UserName::parse(name).unwrap(), "hash")
        .await
        .unwrap()
}

async fn product(pool: &PgPool, name: &str) -> ProductId {
    PgProductRepository::new(pool.clone())
        .save(&NewProduct {
            name: name.to_string(),
            price: 1_000,
            image_url: format!("https://img.example/{name}.png"),
        })
        .await
        .unwrap()
}

// ============================================================================
// Customers
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_user_name_lookups_ignore_case() {
    let pool = pool().await;
    let customers = PgCustomerRepository::new(pool.clone());
    let name = unique_name();
    let id = customer(&pool, &name).await;
    let shouted = name.to_uppercase();

    assert_eq!(customers.find_id_by_user_name(&shouted).await.unwrap(), Some(id));
    assert!(customers.exists_by_user_name(&shouted).await.unwrap());

    let found = customers.find_by_user_name(&shouted).await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.user_name.as_str(), name);

    assert!(!customers.exists_by_user_name(&unique_name()).await.unwrap());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_duplicate_user_name_is_conflict() {
    let pool = pool().await;
    let customers = PgCustomerRepository::new(pool.clone());
    let name = unique_name();
    customer(&pool, &name).await;

    let result = customers
        .save(&UserName::parse(&name.to_uppercase()).unwrap(), "hash")
        .await;

    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_update_and_delete_customer() {
    let pool = pool().await;
    let customers = PgCustomerRepository::new(pool.clone());
    let name = unique_name();
    let id = customer(&pool, &name).await;

    let recased = UserName::parse(&name.to_uppercase()).unwrap();
    let updated = customers.update(id, &recased, "new-hash").await.unwrap();
    assert_eq!(updated.user_name, recased);
    assert_eq!(updated.password_hash, "new-hash");

    assert!(customers.delete(id).await.unwrap());
    assert!(customers.find_by_id(id).await.unwrap().is_none());
    assert!(matches!(
        customers.update(id, &recased, "hash").await,
        Err(RepositoryError::NotFound)
    ));
}

// ============================================================================
// Carts
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_add_same_product_accumulates_quantity() {
    let pool = pool().await;
    let carts = PgCartRepository::new(pool.clone());
    let owner = customer(&pool, &unique_name()).await;
    let chicken = product(&pool, "치킨").await;

    let first = carts
        .add(owner, chicken, Quantity::new(2).unwrap())
        .await
        .unwrap();
    let second = carts
        .add(owner, chicken, Quantity::new(3).unwrap())
        .await
        .unwrap();

    assert_eq!(first, second);
    let lines = carts.list(owner).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity.get(), 5);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_add_unknown_product_is_not_found() {
    let pool = pool().await;
    let carts = PgCartRepository::new(pool.clone());
    let owner = customer(&pool, &unique_name()).await;

    let result = carts.add(owner, ProductId::new(i64::MAX), Quantity::ONE).await;

    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_quantity_overflow_is_conflict() {
    let pool = pool().await;
    let carts = PgCartRepository::new(pool.clone());
    let owner = customer(&pool, &unique_name()).await;
    let chicken = product(&pool, "치킨").await;
    carts
        .add(owner, chicken, Quantity::new(i32::MAX).unwrap())
        .await
        .unwrap();

    let result = carts.add(owner, chicken, Quantity::ONE).await;

    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_cart_rows_are_scoped_to_owner() {
    let pool = pool().await;
    let carts = PgCartRepository::new(pool.clone());
    let owner = customer(&pool, &unique_name()).await;
    let stranger = customer(&pool, &unique_name()).await;
    let item = carts
        .add(owner, product(&pool, "피자").await, Quantity::ONE)
        .await
        .unwrap();

    assert!(carts.find(stranger, item).await.unwrap().is_none());
    assert!(!carts.update_quantity(stranger, item, Quantity::ONE).await.unwrap());
    assert!(!carts.delete(stranger, item).await.unwrap());
    assert!(carts.find(owner, item).await.unwrap().is_some());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_deleting_customer_cascades_to_cart() {
    let pool = pool().await;
    let carts = PgCartRepository::new(pool.clone());
    let owner = customer(&pool, &unique_name()).await;
    carts
        .add(owner, product(&pool, "치킨").await, Quantity::ONE)
        .await
        .unwrap();

    assert!(PgCustomerRepository::new(pool.clone()).delete(owner).await.unwrap());

    assert!(carts.list(owner).await.unwrap().is_empty());
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_partial_checkout_rolls_back() {
    let pool = pool().await;
    let carts = PgCartRepository::new(pool.clone());
    let orders = PgOrderRepository::new(pool.clone());
    let owner = customer(&pool, &unique_name()).await;
    let stranger = customer(&pool, &unique_name()).await;
    let mine = carts
        .add(owner, product(&pool, "치킨").await, Quantity::ONE)
        .await
        .unwrap();
    let theirs = carts
        .add(stranger, product(&pool, "피자").await, Quantity::ONE)
        .await
        .unwrap();

    let result = orders.checkout(owner, &[mine, theirs]).await;

    assert!(matches!(result, Err(RepositoryError::NotFound)));
    assert_eq!(carts.list(owner).await.unwrap().len(), 1);
    assert_eq!(carts.list(stranger).await.unwrap().len(), 1);
    assert!(orders.list(owner).await.unwrap().is_empty());

    let missing = orders
        .checkout(owner, &[mine, CartItemId::new(i64::MAX)])
        .await;
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
    assert_eq!(carts.list(owner).await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_checkout_snapshots_lines_in_cart_item_order() {
    let pool = pool().await;
    let carts = PgCartRepository::new(pool.clone());
    let orders = PgOrderRepository::new(pool.clone());
    let owner = customer(&pool, &unique_name()).await;
    let chicken = product(&pool, "치킨").await;
    let pizza = product(&pool, "피자").await;
    let first = carts
        .add(owner, chicken, Quantity::new(2).unwrap())
        .await
        .unwrap();
    let second = carts.add(owner, pizza, Quantity::ONE).await.unwrap();

    let order_id = orders.checkout(owner, &[second, first]).await.unwrap();

    let order = orders.find(owner, order_id).await.unwrap().unwrap();
    let products: Vec<_> = order.details.iter().map(|d| d.product_id).collect();
    assert_eq!(products, vec![chicken, pizza]);
    assert_eq!(order.details[0].quantity.get(), 2);
    assert!(carts.list(owner).await.unwrap().is_empty());

    // Order history survives the product leaving the catalog
    assert!(PgProductRepository::new(pool.clone()).delete(chicken).await.unwrap());
    let order = orders.find(owner, order_id).await.unwrap().unwrap();
    assert_eq!(order.details.len(), 2);
    assert_eq!(order.details[0].name, "치킨");
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_orders_are_scoped_to_owner() {
    let pool = pool().await;
    let carts = PgCartRepository::new(pool.clone());
    let orders = PgOrderRepository::new(pool.clone());
    let owner = customer(&pool, &unique_name()).await;
    let stranger = customer(&pool, &unique_name()).await;
    let item = carts
        .add(owner, product(&pool, "치킨").await, Quantity::ONE)
        .await
        .unwrap();
    let order_id = orders.checkout(owner, &[item]).await.unwrap();

    assert!(orders.find(stranger, order_id).await.unwrap().is_none());
    assert!(orders.list(stranger).await.unwrap().is_empty());
    assert_eq!(orders.list(owner).await.unwrap().len(), 1);
}
