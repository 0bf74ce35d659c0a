//! Service wiring and small concurrency helpers used by the managers.

use std::future::Future;
use std::sync::Arc;

use super::{
    AddressService, AuthService, DemandService, ProductService, StoreService, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::clients::http_client;
use crate::infra::{
    GcsClient, NominatimClient, ObjectStorage, Persistence, ReceitaWsClient, ViaCepClient,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Hands out the services the HTTP layer depends on.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn addresses(&self) -> Arc<dyn AddressService>;

    fn stores(&self) -> Arc<dyn StoreService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn demands(&self) -> Arc<dyn DemandService>;
}

/// Production wiring over Postgres and the real HTTP clients
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    address_service: Arc<dyn AddressService>,
    store_service: Arc<dyn StoreService>,
    product_service: Arc<dyn ProductService>,
    demand_service: Arc<dyn DemandService>,
}

impl Services {
    /// Wire every service to the database and the third-party HTTP clients.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> AppResult<Self> {
        use super::{
            AddressManager, Authenticator, DemandManager, ProductManager, StoreManager,
            UserManager,
        };

        let http = http_client(&config)?;
        let postal_codes = Arc::new(ViaCepClient::new(http.clone(), &config.viacep_base_url));
        let geocoder = Arc::new(NominatimClient::new(
            http.clone(),
            &config.nominatim_base_url,
            &config.nominatim_user_agent,
        ));
        let registry = Arc::new(ReceitaWsClient::new(http.clone(), &config.receitaws_base_url));
        let storage: Arc<dyn ObjectStorage> = Arc::new(GcsClient::new(http, &config.storage)?);

        let uow = Arc::new(Persistence::new(db));

        Ok(Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone(), storage.clone())),
            address_service: Arc::new(AddressManager::new(uow.clone(), postal_codes, geocoder)),
            store_service: Arc::new(StoreManager::new(uow.clone(), registry, storage.clone())),
            product_service: Arc::new(ProductManager::new(uow.clone(), storage.clone())),
            demand_service: Arc::new(DemandManager::new(uow, storage)),
        })
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn addresses(&self) -> Arc<dyn AddressService> {
        self.address_service.clone()
    }

    fn stores(&self) -> Arc<dyn StoreService> {
        self.store_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn demands(&self) -> Arc<dyn DemandService> {
        self.demand_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute three independent async operations in parallel.
    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    /// Execute a collection of homogeneous async operations in parallel.
    ///
    /// Results are returned in the same order as the input futures; the
    /// first error wins.
    ///
    /// # Example
    /// ```ignore
    /// let urls = parallel::join_all(
    ///     blobs.iter().map(|b| storage.signed_url(BUCKET_PRODUCT_IMAGES, b)).collect(),
    /// ).await?;
    /// ```
    pub async fn join_all<F, T>(futures: Vec<F>) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
    {
        let results = futures::future::join_all(futures).await;
        results.into_iter().collect()
    }
}
