//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::{CartRepository, CustomerRepository, OrderRepository, ProductRepository, Repositories};
use crate::services::JwtTokenProvider;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the token provider, and the repositories.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    tokens: JwtTokenProvider,
    repositories: Repositories,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `repositories` - Storage the services run against
    #[must_use]
    pub fn new(config: ApiConfig, repositories: Repositories) -> Self {
        let tokens = JwtTokenProvider::new(&config.jwt_secret, config.jwt_validity);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                tokens,
                repositories,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the token provider.
    #[must_use]
    pub fn tokens(&self) -> &JwtTokenProvider {
        &self.inner.tokens
    }

    /// Get a reference to the repository set.
    #[must_use]
    pub fn repositories(&self) -> &Repositories {
        &self.inner.repositories
    }

    #[must_use]
    pub fn customers(&self) -> &dyn CustomerRepository {
        self.inner.repositories.customers.as_ref()
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductRepository {
        self.inner.repositories.products.as_ref()
    }

    #[must_use]
    pub fn carts(&self) -> &dyn CartRepository {
        self.inner.repositories.carts.as_ref()
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderRepository {
        self.inner.repositories.orders.as_ref()
    }
}
