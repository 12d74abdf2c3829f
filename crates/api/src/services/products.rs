//! Product catalog.

use thiserror::Error;

use shopping_cart_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::{NewProduct, Product};

/// Longest product name the catalog stores, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Longest image URL the catalog stores, in characters.
pub const MAX_IMAGE_URL_LENGTH: usize = 1024;

/// Errors that can occur while managing products.
#[derive(Debug, Error)]
pub enum ProductError {
    /// Product name is blank.
    #[error("상품 이름은 비어 있을 수 없습니다.")]
    InvalidName,

    /// Product name exceeds [`MAX_NAME_LENGTH`].
    #[error("상품 이름은 255자 이하여야 합니다.")]
    NameTooLong,

    /// Image URL exceeds [`MAX_IMAGE_URL_LENGTH`].
    #[error("상품 이미지 주소는 1024자 이하여야 합니다.")]
    ImageUrlTooLong,

    /// Price is negative.
    #[error("상품 가격은 0원 이상이어야 합니다.")]
    InvalidPrice,

    /// No product with this ID.
    #[error("존재하지 않는 상품입니다.")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Product service.
pub struct ProductService<'a> {
    products: &'a dyn ProductRepository,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(products: &'a dyn ProductRepository) -> Self {
        Self { products }
    }

    /// All products, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Repository` if the store fails.
    pub async fn list(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.products.list().await?)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the product doesn't exist.
    pub async fn find(&self, id: ProductId) -> Result<Product, ProductError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::InvalidName` for a blank name,
    /// `ProductError::InvalidPrice` for a negative price, and
    /// `ProductError::NameTooLong` or `ProductError::ImageUrlTooLong` when a
    /// field doesn't fit its column.
    pub async fn create(
        &self,
        name: &str,
        price: i32,
        image_url: &str,
    ) -> Result<ProductId, ProductError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProductError::InvalidName);
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ProductError::NameTooLong);
        }
        if image_url.chars().count() > MAX_IMAGE_URL_LENGTH {
            return Err(ProductError::ImageUrlTooLong);
        }
        if price < 0 {
            return Err(ProductError::InvalidPrice);
        }

        let product = NewProduct {
            name: name.to_string(),
            price,
            image_url: image_url.to_string(),
        };

        Ok(self.products.save(&product).await?)
    }

    /// Remove a product. Cart lines holding it go with it.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), ProductError> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(ProductError::NotFound)
        }
    }
}
