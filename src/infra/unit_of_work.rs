//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository so services depend on one
//! abstraction instead of five.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    AddressRepository, AddressStore, DemandRepository, DemandStore, ProductRepository,
    ProductStore, StoreRepository, StoreStore, UserRepository, UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn addresses(&self) -> Arc<dyn AddressRepository>;

    fn stores(&self) -> Arc<dyn StoreRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn demands(&self) -> Arc<dyn DemandRepository>;
}

/// Concrete implementation of UnitOfWork
#[derive(Clone)]
pub struct Persistence {
    users: Arc<dyn UserRepository>,
    addresses: Arc<dyn AddressRepository>,
    stores: Arc<dyn StoreRepository>,
    products: Arc<dyn ProductRepository>,
    demands: Arc<dyn DemandRepository>,
}

impl Persistence {
    /// SeaORM-backed repositories sharing one connection pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            addresses: Arc::new(AddressStore::new(db.clone())),
            stores: Arc::new(StoreStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            demands: Arc::new(DemandStore::new(db)),
        }
    }

    /// Assemble from arbitrary repository implementations (mocks in tests)
    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        addresses: Arc<dyn AddressRepository>,
        stores: Arc<dyn StoreRepository>,
        products: Arc<dyn ProductRepository>,
        demands: Arc<dyn DemandRepository>,
    ) -> Self {
        Self {
            users,
            addresses,
            stores,
            products,
            demands,
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn addresses(&self) -> Arc<dyn AddressRepository> {
        self.addresses.clone()
    }

    fn stores(&self) -> Arc<dyn StoreRepository> {
        self.stores.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }

    fn demands(&self) -> Arc<dyn DemandRepository> {
        self.demands.clone()
    }
}
