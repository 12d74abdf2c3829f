//! Customer management commands.

use tracing::info;

use shopping_cart_api::db::PgCustomerRepository;
use shopping_cart_api::services::CustomerService;

use super::connect;

/// Register a customer with the same validation as `POST /api/customers`.
///
/// # Errors
///
/// Returns an error if the database is unreachable, the name or password is
/// invalid, or the name is already taken.
pub async fn create(user_name: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let repository = PgCustomerRepository::new(pool);

    let id = CustomerService::new(&repository)
        .create(user_name, password)
        .await?;

    info!(customer_id = %id, user_name, "Customer created");
    Ok(())
}
