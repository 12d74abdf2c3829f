//! In-memory implementation of every repository.
//!
//! Mirrors the `PostgreSQL` schema closely enough for the HTTP layer to
//! behave identically: case-insensitive unique user names, one cart line per
//! (customer, product), cascading deletes, and all-or-nothing checkout.
//! A single `RwLock` over all tables makes each operation atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use shopping_cart_core::{CartItemId, CustomerId, OrderId, ProductId, Quantity, UserName};

use super::{
    CartRepository, CustomerRepository, OrderRepository, ProductRepository, RepositoryError,
};
use crate::models::{CartItem, Customer, NewProduct, Order, OrderDetail, Product};

#[derive(Debug, Clone, Copy)]
struct CartRow {
    customer_id: CustomerId,
    product_id: ProductId,
    quantity: Quantity,
}

#[derive(Default)]
struct Tables {
    customers: BTreeMap<CustomerId, Customer>,
    products: BTreeMap<ProductId, Product>,
    cart_items: BTreeMap<CartItemId, CartRow>,
    orders: BTreeMap<OrderId, Order>,
    last_id: i64,
}

impl Tables {
    /// Next surrogate key. Shared across tables, like a single sequence.
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn customer_named(&self, user_name: &str) -> Option<&Customer> {
        self.customers
            .values()
            .find(|customer| customer.user_name.matches(user_name))
    }

    fn cart_item(&self, id: CartItemId, row: &CartRow) -> Result<CartItem, RepositoryError> {
        let product = self.products.get(&row.product_id).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("cart item {id} references missing product"))
        })?;

        Ok(CartItem {
            id,
            customer_id: row.customer_id,
            product: product.clone(),
            quantity: row.quantity,
        })
    }

    fn owned_cart_row(&self, customer_id: CustomerId, id: CartItemId) -> Option<&CartRow> {
        self.cart_items
            .get(&id)
            .filter(|row| row.customer_id == customer_id)
    }
}

/// Process-local store backing all four repository traits.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn save(
        &self,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<CustomerId, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.customer_named(user_name.as_str()).is_some() {
            return Err(RepositoryError::Conflict(
                "user name already exists".to_owned(),
            ));
        }

        let id = CustomerId::new(tables.next_id());
        tables.customers.insert(
            id,
            Customer {
                id,
                user_name: user_name.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(id)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.tables.read().await.customers.get(&id).cloned())
    }

    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.tables.read().await.customer_named(user_name).cloned())
    }

    async fn find_id_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<CustomerId>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .customer_named(user_name)
            .map(|customer| customer.id))
    }

    async fn exists_by_user_name(&self, user_name: &str) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.customer_named(user_name).is_some())
    }

    async fn update(
        &self,
        id: CustomerId,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<Customer, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .customer_named(user_name.as_str())
            .is_some_and(|other| other.id != id)
        {
            return Err(RepositoryError::Conflict(
                "user name already exists".to_owned(),
            ));
        }

        let customer = tables
            .customers
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        customer.user_name = user_name.clone();
        password_hash.clone_into(&mut customer.password_hash);
        Ok(customer.clone())
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.customers.remove(&id).is_none() {
            return Ok(false);
        }
        tables.cart_items.retain(|_, row| row.customer_id != id);
        tables.orders.retain(|_, order| order.customer_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn save(&self, product: &NewProduct) -> Result<ProductId, RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = ProductId::new(tables.next_id());
        tables.products.insert(
            id,
            Product {
                id,
                name: product.name.clone(),
                price: product.price,
                image_url: product.image_url.clone(),
            },
        );
        Ok(id)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.products.remove(&id).is_none() {
            return Ok(false);
        }
        tables.cart_items.retain(|_, row| row.product_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn list(&self, customer_id: CustomerId) -> Result<Vec<CartItem>, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .cart_items
            .iter()
            .filter(|(_, row)| row.customer_id == customer_id)
            .map(|(id, row)| tables.cart_item(*id, row))
            .collect()
    }

    async fn find(
        &self,
        customer_id: CustomerId,
        id: CartItemId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .owned_cart_row(customer_id, id)
            .map(|row| tables.cart_item(id, row))
            .transpose()
    }

    async fn add(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<CartItemId, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.customers.contains_key(&customer_id)
            || !tables.products.contains_key(&product_id)
        {
            return Err(RepositoryError::NotFound);
        }

        let existing = tables
            .cart_items
            .iter_mut()
            .find(|(_, row)| row.customer_id == customer_id && row.product_id == product_id);

        if let Some((id, row)) = existing {
            row.quantity = row.quantity.checked_add(quantity).map_err(|_| {
                RepositoryError::Conflict("cart quantity value out of range".to_owned())
            })?;
            return Ok(*id);
        }

        let id = CartItemId::new(tables.next_id());
        tables.cart_items.insert(
            id,
            CartRow {
                customer_id,
                product_id,
                quantity,
            },
        );
        Ok(id)
    }

    async fn update_quantity(
        &self,
        customer_id: CustomerId,
        id: CartItemId,
        quantity: Quantity,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.cart_items.get_mut(&id) {
            Some(row) if row.customer_id == customer_id => {
                row.quantity = quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(
        &self,
        customer_id: CustomerId,
        id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.owned_cart_row(customer_id, id).is_none() {
            return Ok(false);
        }
        tables.cart_items.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn checkout(
        &self,
        customer_id: CustomerId,
        cart_item_ids: &[CartItemId],
    ) -> Result<OrderId, RepositoryError> {
        let mut tables = self.tables.write().await;

        // Details follow cart item ID order
        let mut ids = cart_item_ids.to_vec();
        ids.sort_unstable();

        // Validate everything before mutating anything
        let mut details = Vec::with_capacity(ids.len());
        for id in &ids {
            let row = tables
                .owned_cart_row(customer_id, *id)
                .ok_or(RepositoryError::NotFound)?;
            let item = tables.cart_item(*id, row)?;
            details.push(OrderDetail {
                product_id: item.product.id,
                name: item.product.name,
                price: item.product.price,
                image_url: item.product.image_url,
                quantity: item.quantity,
            });
        }

        for id in &ids {
            tables.cart_items.remove(id);
        }

        let id = OrderId::new(tables.next_id());
        tables.orders.insert(
            id,
            Order {
                id,
                customer_id,
                ordered_at: Utc::now(),
                details,
            },
        );
        Ok(id)
    }

    async fn list(&self, customer_id: CustomerId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .orders
            .values()
            .filter(|order| order.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn find(
        &self,
        customer_id: CustomerId,
        id: OrderId,
    ) -> Result<Option<Order>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .orders
            .get(&id)
            .filter(|order| order.customer_id == customer_id)
            .cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn seeded_customers() -> MemoryStore {
        let store = MemoryStore::new();
        for name in ["puterism", "tanney-102", "gwangyeol-im"] {
            CustomerRepository::save(&store, &UserName::parse(name).unwrap(), "hash")
                .await
                .unwrap();
        }
        store
    }

    async fn product(store: &MemoryStore, name: &str) -> ProductId {
        ProductRepository::save(
            store,
            &NewProduct {
                name: name.to_string(),
                price: 1_000,
                image_url: format!("https://img.example/{name}.png"),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_id_by_user_name() {
        let store = seeded_customers().await;

        let id = store.find_id_by_user_name("puterism").await.unwrap();

        assert_eq!(id, Some(CustomerId::new(1)));
    }

    #[tokio::test]
    async fn test_find_id_by_user_name_ignores_case() {
        let store = seeded_customers().await;

        let id = store.find_id_by_user_name("gwangyeol-iM").await.unwrap();

        assert_eq!(id, Some(CustomerId::new(3)));
    }

    #[tokio::test]
    async fn test_exists_by_user_name_ignores_case() {
        let store = seeded_customers().await;

        assert!(store.exists_by_user_name("puterisM").await.unwrap());
        assert!(!store.exists_by_user_name("tiki").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_in_other_case() {
        let store = seeded_customers().await;

        let result =
            CustomerRepository::save(&store, &UserName::parse("PUTERISM").unwrap(), "hash").await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let store = seeded_customers().await;

        let customer = CustomerRepository::find_by_id(&store, CustomerId::new(1))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(customer.id, CustomerId::new(1));
        assert_eq!(customer.user_name.as_str(), "puterism");
        assert_eq!(customer.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_update_allows_recasing_own_name() {
        let store = seeded_customers().await;
        let name = UserName::parse("PuterisM").unwrap();

        let updated = store
            .update(CustomerId::new(1), &name, "new-hash")
            .await
            .unwrap();

        assert_eq!(updated.user_name.as_str(), "PuterisM");
        assert_eq!(updated.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn test_update_rejects_another_customers_name() {
        let store = seeded_customers().await;
        let name = UserName::parse("Tanney-102").unwrap();

        let result = store.update(CustomerId::new(1), &name, "hash").await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_add_same_product_accumulates_quantity() {
        let store = seeded_customers().await;
        let customer = CustomerId::new(1);
        let chicken = product(&store, "chicken").await;

        let first = store
            .add(customer, chicken, Quantity::new(2).unwrap())
            .await
            .unwrap();
        let second = store.add(customer, chicken, Quantity::ONE).await.unwrap();

        assert_eq!(first, second);
        let items = CartRepository::list(&store, customer).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity.get(), 3);
        assert_eq!(items[0].product.name, "chicken");
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_not_found() {
        let store = seeded_customers().await;

        let result = store
            .add(CustomerId::new(1), ProductId::new(999), Quantity::ONE)
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_cart_rows_are_scoped_to_owner() {
        let store = seeded_customers().await;
        let owner = CustomerId::new(1);
        let stranger = CustomerId::new(2);
        let chicken = product(&store, "chicken").await;
        let item = store.add(owner, chicken, Quantity::ONE).await.unwrap();

        assert!(CartRepository::find(&store, stranger, item).await.unwrap().is_none());
        assert!(!store
            .update_quantity(stranger, item, Quantity::ONE)
            .await
            .unwrap());
        assert!(!CartRepository::delete(&store, stranger, item).await.unwrap());
        assert!(CartRepository::find(&store, owner, item).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_deleting_customer_cascades_to_cart() {
        let store = seeded_customers().await;
        let customer = CustomerId::new(1);
        let chicken = product(&store, "chicken").await;
        store.add(customer, chicken, Quantity::ONE).await.unwrap();

        assert!(CustomerRepository::delete(&store, customer).await.unwrap());

        assert!(CartRepository::list(&store, customer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_product_cascades_to_cart() {
        let store = seeded_customers().await;
        let customer = CustomerId::new(1);
        let chicken = product(&store, "chicken").await;
        store.add(customer, chicken, Quantity::ONE).await.unwrap();

        assert!(ProductRepository::delete(&store, chicken).await.unwrap());

        assert!(CartRepository::list(&store, customer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_is_all_or_nothing() {
        let store = seeded_customers().await;
        let customer = CustomerId::new(1);
        let chicken = product(&store, "chicken").await;
        let item = store.add(customer, chicken, Quantity::ONE).await.unwrap();

        let result = store
            .checkout(customer, &[item, CartItemId::new(999)])
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert_eq!(CartRepository::list(&store, customer).await.unwrap().len(), 1);
        assert!(OrderRepository::list(&store, customer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_moves_lines_into_order() {
        let store = seeded_customers().await;
        let customer = CustomerId::new(1);
        let chicken = product(&store, "chicken").await;
        let pizza = product(&store, "pizza").await;
        let first = store
            .add(customer, chicken, Quantity::new(2).unwrap())
            .await
            .unwrap();
        store.add(customer, pizza, Quantity::ONE).await.unwrap();

        let order_id = store.checkout(customer, &[first]).await.unwrap();

        let order = OrderRepository::find(&store, customer, order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.details.len(), 1);
        assert_eq!(order.details[0].product_id, chicken);
        assert_eq!(order.details[0].quantity.get(), 2);

        let remaining = CartRepository::list(&store, customer).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].product.id, pizza);
    }

    #[tokio::test]
    async fn test_checkout_details_follow_cart_item_order() {
        let store = seeded_customers().await;
        let customer = CustomerId::new(1);
        let chicken = product(&store, "chicken").await;
        let pizza = product(&store, "pizza").await;
        let first = store.add(customer, chicken, Quantity::ONE).await.unwrap();
        let second = store.add(customer, pizza, Quantity::ONE).await.unwrap();

        let order_id = store.checkout(customer, &[second, first]).await.unwrap();

        let order = OrderRepository::find(&store, customer, order_id)
            .await
            .unwrap()
            .unwrap();
        let products: Vec<_> = order.details.iter().map(|d| d.product_id).collect();
        assert_eq!(products, vec![chicken, pizza]);
    }
}
