//! Seed the product catalog.
//!
//! Without `--file`, inserts a small built-in catalog. With `--file`, reads
//! a JSON array of `{"name", "price", "imageUrl"}` objects. Every product
//! goes through `ProductService`, so the API's validation applies.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use shopping_cart_api::db::PgProductRepository;
use shopping_cart_api::services::ProductService;

use super::connect;

/// One product to insert.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedProduct {
    pub name: String,
    pub price: i32,
    pub image_url: String,
}

/// The catalog inserted when no file is given.
fn default_catalog() -> Vec<SeedProduct> {
    [
        ("치킨", 10_000, "https://cdn.shopping-cart.dev/images/chicken.png"),
        ("피자", 20_000, "https://cdn.shopping-cart.dev/images/pizza.png"),
        ("떡볶이", 6_000, "https://cdn.shopping-cart.dev/images/tteokbokki.png"),
        ("김밥", 3_500, "https://cdn.shopping-cart.dev/images/gimbap.png"),
        ("라면", 4_000, "https://cdn.shopping-cart.dev/images/ramen.png"),
    ]
    .into_iter()
    .map(|(name, price, image_url)| SeedProduct {
        name: name.to_string(),
        price,
        image_url: image_url.to_string(),
    })
    .collect()
}

/// Parse a JSON product list.
fn parse_catalog(content: &str) -> Result<Vec<SeedProduct>, serde_json::Error> {
    serde_json::from_str(content)
}

/// Insert products from `file`, or the default catalog.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the database is
/// unreachable, or a product fails validation.
pub async fn products(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading products from file");
            let content = tokio::fs::read_to_string(path).await?;
            parse_catalog(&content)?
        }
        None => default_catalog(),
    };

    info!(products = catalog.len(), "Parsed catalog");

    let pool = connect().await?;
    let repository = PgProductRepository::new(pool);
    let service = ProductService::new(&repository);

    for product in &catalog {
        let id = service
            .create(&product.name, product.price, &product.image_url)
            .await?;
        info!(product_id = %id, name = %product.name, "Inserted product");
    }

    info!(inserted = catalog.len(), "Seeding complete");
    Ok(())
}
