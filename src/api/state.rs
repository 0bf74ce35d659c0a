//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{
    AddressService, AuthService, DemandService, ProductService, ServiceContainer, Services,
    StoreService, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub address_service: Arc<dyn AddressService>,
    pub store_service: Arc<dyn StoreService>,
    pub product_service: Arc<dyn ProductService>,
    pub demand_service: Arc<dyn DemandService>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Build every service from the database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> AppResult<Self> {
        let container = Services::from_connection(database.get_connection(), config)?;
        Ok(Self::from_container(&container, database))
    }

    /// Take the services out of any container (mocked ones in tests).
    pub fn from_container(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            address_service: container.addresses(),
            store_service: container.stores(),
            product_service: container.products(),
            demand_service: container.demands(),
            database,
        }
    }
}
